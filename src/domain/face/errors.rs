use thiserror::Error;

/// Why an uploaded file was rejected before any processing.
///
/// The display strings are part of the HTTP contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File must be an image.")]
    NotAnImage,
    #[error("Unsupported image format. Only JPEG and PNG are allowed.")]
    UnsupportedFormat,
    #[error("File size exceeds the limit of 5MB.")]
    TooLarge,
}

/// Outcome of a failed batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A file failed validation (client error).
    #[error("{source}")]
    Validation {
        filename: String,
        #[source]
        source: ValidationError,
    },

    /// No face was found (client error).
    #[error("No face detected.")]
    NoFaceDetected,

    /// Storage or face backend failure (server error).
    #[error("Processing error: {0}")]
    Processing(#[from] anyhow::Error),
}

impl BatchError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Processing(_))
    }
}
