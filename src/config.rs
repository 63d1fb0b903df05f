//! Application configuration loading from environment variables.
//!
//! Every variable is optional; the defaults reproduce the documented HTTP
//! behaviour. A `.env` file is honoured through `dotenvy` in `main`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info,face_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 8000)
//! - `TEMP_DIR`: Directory for temporary image files (default: host temp dir)
//! - `MAX_UPLOAD_BYTES`: Per-file size ceiling (default: 5242880)
//! - `MAX_REQUEST_BYTES`: Whole multipart body limit (default: 52428800)
//! - `FACE_DETECTOR_MODEL_PATH`: SeetaFace model (default: "./models/seeta_fd_frontal_v1.0.bin")
//! - `FACE_DETECTION_MODEL`: "hog" (fast) or "cnn" (accurate) (default: "hog")
//! - `FACE_MIN_SIZE`: Smallest face searched for, in pixels (default: 20)
//! - `FACE_ENCODER_MODEL_PATH`: ONNX embedding model (default: "./models/face_encoder.onnx")
//! - `FACE_ENCODER_INPUT_SIZE`: Square crop fed to the encoder (default: 150)

use crate::infrastructure::{
    ml::rustface_detector::DetectionModel, security::validation::DEFAULT_MAX_IMAGE_SIZE_BYTES,
};
use std::path::PathBuf;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Where uploaded images are written while being processed
    pub temp_dir: PathBuf,

    /// Files larger than this fail validation
    pub max_upload_bytes: usize,

    /// Upper bound on the whole request body
    pub max_request_bytes: usize,

    /// Path to the SeetaFace detection model
    pub detector_model_path: String,

    /// Detector parameter preset
    pub detection_model: DetectionModel,

    /// Minimum face size in pixels passed to the detector
    pub min_face_size: u32,

    /// Path to the ONNX face embedding model
    pub encoder_model_path: String,

    /// Side length of the square face crop given to the encoder
    pub encoder_input_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            temp_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            max_request_bytes: 50 * 1024 * 1024,
            detector_model_path: "./models/seeta_fd_frontal_v1.0.bin".to_string(),
            detection_model: DetectionModel::Hog,
            min_face_size: 20,
            encoder_model_path: "./models/face_encoder.onnx".to_string(),
            encoder_input_size: 150,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            temp_dir: env_or("TEMP_DIR", defaults.temp_dir)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_request_bytes: env_or("MAX_REQUEST_BYTES", defaults.max_request_bytes)?,
            detector_model_path: env_or("FACE_DETECTOR_MODEL_PATH", defaults.detector_model_path)?,
            detection_model: env_or("FACE_DETECTION_MODEL", defaults.detection_model)?,
            min_face_size: env_or("FACE_MIN_SIZE", defaults.min_face_size)?,
            encoder_model_path: env_or("FACE_ENCODER_MODEL_PATH", defaults.encoder_model_path)?,
            encoder_input_size: env_or("FACE_ENCODER_INPUT_SIZE", defaults.encoder_input_size)?,
        })
    }
}

/// Load an environment variable with a default value.
///
/// Returns the parsed environment variable if set, otherwise returns the default.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
