use super::traits::FaceEncoder;
use crate::domain::face::entity::{FaceBox, FaceEncoding};
use image::{RgbImage, imageops::FilterType};
use ndarray::{Array, IxDyn};
use ort::{session::Session, value::Value};
use std::path::Path;
use std::sync::Mutex;

/// Face embedding model run through ONNX Runtime.
///
/// Each face box is cropped, resized to a square `input_size` crop and fed as a
/// `[1, 3, H, W]` tensor scaled to `0..1`. The output vector is L2-normalized.
pub struct OnnxFaceEncoder {
    // run() needs &mut Session
    session: Option<Mutex<Session>>,
    input_size: u32,
}

impl OnnxFaceEncoder {
    pub fn new(model_path: &str, input_size: u32) -> anyhow::Result<Self> {
        if input_size == 0 {
            anyhow::bail!("face encoder input size must be > 0");
        }

        if !Path::new(model_path).exists() {
            tracing::warn!(
                "Face encoder model not found at {}. Encoding requests will fail.",
                model_path
            );
            return Ok(Self {
                session: None,
                input_size,
            });
        }

        let session = Session::builder()?.commit_from_file(model_path)?;
        tracing::info!(input_size, "Face encoder loaded from {}", model_path);

        Ok(Self {
            session: Some(Mutex::new(session)),
            input_size,
        })
    }

    fn preprocess_face(&self, image: &RgbImage, face: &FaceBox) -> anyhow::Result<Array<f32, IxDyn>> {
        if face.width() == 0 || face.height() == 0 {
            anyhow::bail!("empty face box {:?}", face);
        }

        let crop = image::imageops::crop_imm(image, face.left, face.top, face.width(), face.height())
            .to_image();
        let resized =
            image::imageops::resize(&crop, self.input_size, self.input_size, FilterType::Triangle);

        let size = self.input_size as usize;
        let mut array = Array::zeros(IxDyn(&[1, 3, size, size]));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            array[[0, 0, y, x]] = pixel[0] as f32 / 255.0;
            array[[0, 1, y, x]] = pixel[1] as f32 / 255.0;
            array[[0, 2, y, x]] = pixel[2] as f32 / 255.0;
        }

        Ok(array)
    }

    fn run(&self, session: &mut Session, input: Array<f32, IxDyn>) -> anyhow::Result<Vec<f32>> {
        // Shape + data conversion keeps us independent of ort's ndarray version
        let input_shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let input_data = input.into_raw_vec();
        let input_value = Value::from_array((input_shape, input_data))?;

        let outputs = session.run(ort::inputs![input_value])?;
        let (_, data) = outputs[0].try_extract_tensor::<f32>()?;

        if data.is_empty() {
            anyhow::bail!("face encoder produced an empty embedding");
        }
        Ok(l2_normalize(data.to_vec()))
    }
}

impl FaceEncoder for OnnxFaceEncoder {
    fn encode(&self, image: &RgbImage, boxes: &[FaceBox]) -> anyhow::Result<Vec<FaceEncoding>> {
        if boxes.is_empty() {
            return Ok(Vec::new());
        }

        let session_mutex = self
            .session
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("face encoder model is not loaded"))?;
        let mut session = session_mutex
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire session lock"))?;

        boxes
            .iter()
            .map(|face| {
                let input = self.preprocess_face(image, face)?;
                self.run(&mut session, input).map(FaceEncoding)
            })
            .collect()
    }

    fn is_loaded(&self) -> bool {
        self.session.is_some()
    }
}

fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}
