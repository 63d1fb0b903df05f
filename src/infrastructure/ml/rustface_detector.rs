use super::traits::FaceDetector;
use crate::domain::face::entity::FaceBox;
use image::DynamicImage;
use std::path::Path;
use std::str::FromStr;

/// Detector parameter preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionModel {
    /// Coarse pyramid and window step. Fast, misses some small faces.
    #[default]
    Hog,
    /// Dense pyramid and window step. Slower, more accurate.
    Cnn,
}

impl DetectionModel {
    fn pyramid_scale_factor(self) -> f32 {
        match self {
            Self::Hog => 0.8,
            Self::Cnn => 0.9,
        }
    }

    fn window_step(self) -> u32 {
        match self {
            Self::Hog => 4,
            Self::Cnn => 2,
        }
    }
}

impl FromStr for DetectionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hog" | "fast" => Ok(Self::Hog),
            "cnn" | "accurate" => Ok(Self::Cnn),
            other => Err(format!("unknown detection model '{}' (expected hog or cnn)", other)),
        }
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
pub struct RustfaceDetector {
    model: Option<rustface::Model>,
    preset: DetectionModel,
    min_face_size: u32,
}

impl RustfaceDetector {
    /// Loads the SeetaFace model from `model_path`.
    ///
    /// A missing model file is not fatal: the detector starts unloaded and
    /// every detection fails until the service is restarted with a model.
    pub fn new(model_path: &str, preset: DetectionModel, min_face_size: u32) -> anyhow::Result<Self> {
        if !Path::new(model_path).exists() {
            tracing::warn!(
                "Face detector model not found at {}. Detection requests will fail.",
                model_path
            );
            return Ok(Self {
                model: None,
                preset,
                min_face_size,
            });
        }

        let file = std::fs::File::open(model_path)?;
        let model = rustface::read_model(std::io::BufReader::new(file))
            .map_err(|e| anyhow::anyhow!("failed to load SeetaFace model {}: {}", model_path, e))?;

        tracing::info!(?preset, min_face_size, "Face detector loaded from {}", model_path);
        Ok(Self {
            model: Some(model),
            preset,
            min_face_size,
        })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<FaceBox>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("face detector model is not loaded"))?;

        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(self.preset.pyramid_scale_factor());
        let step = self.preset.window_step();
        detector.set_slide_window_step(step, step);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                FaceBox::from_rect_clamped(bbox.x(), bbox.y(), bbox.width(), bbox.height(), width, height)
            })
            .collect())
    }

    fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}
