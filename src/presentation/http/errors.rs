//! HTTP error handling and response conversion.
//!
//! Every error leaves the service as `{"error": <message>}`. Client errors carry
//! their specific message; server errors are flattened to a fixed message per
//! route while the full cause chain goes to the log.

use crate::domain::face::errors::{BatchError, ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// 500 message for `POST /detect-face`.
pub const DETECT_FAILURE_MESSAGE: &str = "Could not detect faces";

/// 500 message for `POST /encode-face`.
pub const ENCODE_FAILURE_MESSAGE: &str = "Could not generate face encodings";

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body (400).
    BadRequest(String),

    /// An uploaded file failed validation (400).
    Validation {
        filename: String,
        reason: ValidationError,
    },

    /// No face found in the batch (400).
    NoFaceDetected,

    /// Storage or face backend failure (500). `message` is what the client sees.
    Processing {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Validation { filename, reason } => {
                write!(f, "Validation error for '{}': {}", filename, reason)
            }
            Self::NoFaceDetected => write!(f, "No face detected"),
            Self::Processing { source, .. } => write!(f, "Processing error: {:#}", source),
        }
    }
}

impl AppError {
    /// Maps a pipeline failure to its HTTP form, using `failure_message` for server errors.
    pub fn from_batch(err: BatchError, failure_message: &'static str) -> Self {
        match err {
            BatchError::Validation { filename, source } => Self::Validation {
                filename,
                reason: source,
            },
            BatchError::NoFaceDetected => Self::NoFaceDetected,
            BatchError::Processing(source) => Self::Processing {
                message: failure_message,
                source,
            },
        }
    }

    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation { .. } | Self::NoFaceDetected => {
                StatusCode::BAD_REQUEST
            }
            Self::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Validation { reason, .. } => reason.to_string(),
            Self::NoFaceDetected => BatchError::NoFaceDetected.to_string(),
            Self::Processing { message, .. } => (*message).to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match &self {
            Self::Processing { source, .. } => {
                tracing::error!("error={}", self);
                source.chain().skip(1).for_each(|cause| {
                    tracing::error!(cause = %cause, "Error source");
                });
            }
            _ => tracing::warn!("error={}", self),
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
