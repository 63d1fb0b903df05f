use super::traits::{FaceDetector, FaceEncoder, FaceService};
use crate::domain::face::entity::{FaceBox, FaceEncoding};
use anyhow::Context;
use async_trait::async_trait;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-process face service: decodes the stored image and runs the
/// detector/encoder on the blocking thread pool.
#[derive(Clone)]
pub struct LocalFaceService {
    detector: Arc<dyn FaceDetector>,
    encoder: Arc<dyn FaceEncoder>,
}

impl LocalFaceService {
    pub fn new(detector: Arc<dyn FaceDetector>, encoder: Arc<dyn FaceEncoder>) -> Self {
        Self { detector, encoder }
    }
}

/// Decodes the image at `path`, sniffing the format from content rather than the suffix.
pub fn load_image(path: &Path) -> anyhow::Result<DynamicImage> {
    let image = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(image)
}

async fn run_blocking<T, F>(task: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .context("face backend task failed")?
}

#[async_trait]
impl FaceService for LocalFaceService {
    async fn detect(&self, image: &Path) -> anyhow::Result<Vec<FaceBox>> {
        let detector = self.detector.clone();
        let path: PathBuf = image.to_path_buf();
        run_blocking(move || {
            let decoded = load_image(&path)?;
            detector.detect(&decoded)
        })
        .await
    }

    async fn encode(&self, image: &Path, boxes: &[FaceBox]) -> anyhow::Result<Vec<FaceEncoding>> {
        if boxes.is_empty() {
            return Ok(Vec::new());
        }

        let encoder = self.encoder.clone();
        let path: PathBuf = image.to_path_buf();
        let boxes = boxes.to_vec();
        run_blocking(move || {
            let decoded = load_image(&path)?.to_rgb8();
            encoder.encode(&decoded, &boxes)
        })
        .await
    }

    fn detector_ready(&self) -> bool {
        self.detector.is_loaded()
    }

    fn encoder_ready(&self) -> bool {
        self.encoder.is_loaded()
    }
}
