use crate::domain::face::entity::{FaceBox, FaceEncoding};
use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Face detection and encoding capability used by the batch pipeline.
///
/// Failures are opaque to callers; every error is a processing error.
#[async_trait]
pub trait FaceService: Send + Sync {
    /// Detect faces in the image stored at `image`. An empty result means no face.
    async fn detect(&self, image: &Path) -> anyhow::Result<Vec<FaceBox>>;

    /// Compute one encoding per box, in the order of `boxes`.
    async fn encode(&self, image: &Path, boxes: &[FaceBox]) -> anyhow::Result<Vec<FaceEncoding>>;

    /// Whether the detection backend is ready to serve requests.
    fn detector_ready(&self) -> bool {
        true
    }

    /// Whether the encoding backend is ready to serve requests.
    fn encoder_ready(&self) -> bool {
        true
    }
}

/// Synchronous detection backend over decoded pixels.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<FaceBox>>;

    fn is_loaded(&self) -> bool;
}

/// Synchronous encoding backend over decoded pixels.
pub trait FaceEncoder: Send + Sync {
    fn encode(&self, image: &RgbImage, boxes: &[FaceBox]) -> anyhow::Result<Vec<FaceEncoding>>;

    fn is_loaded(&self) -> bool;
}
