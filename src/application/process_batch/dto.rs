use crate::domain::face::entity::{DetectionRecord, FaceEncoding, UploadedFile};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Detect,
    Encode,
}

/// How per-file failures affect the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// First validation failure or faceless file (detect) aborts the batch.
    #[default]
    FailFast,
    /// Rejected files are reported and processing continues.
    CollectErrors,
}

#[derive(Debug, Clone)]
pub struct ProcessBatchRequest {
    pub files: Vec<UploadedFile>,
    pub mode: BatchMode,
    pub policy: BatchPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Detections(Vec<DetectionRecord>),
    Encodings(Vec<FaceEncoding>),
}

impl BatchOutcome {
    pub fn empty(mode: BatchMode) -> Self {
        match mode {
            BatchMode::Detect => Self::Detections(Vec::new()),
            BatchMode::Encode => Self::Encodings(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Detections(records) => records.is_empty(),
            Self::Encodings(encodings) => encodings.is_empty(),
        }
    }
}

/// A file rejected under [`BatchPolicy::CollectErrors`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub failures: Vec<FileFailure>,
}
