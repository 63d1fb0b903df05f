use super::dto::{BatchMode, BatchOutcome, BatchPolicy, BatchReport, FileFailure, ProcessBatchRequest};
use crate::{
    domain::face::{
        entity::{DetectionRecord, UploadedFile},
        errors::BatchError,
    },
    infrastructure::{
        ml::traits::FaceService, security::validation::ValidationService,
        storage::traits::ImageStorage,
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Validates, stores, and runs face detection/encoding over an uploaded batch.
///
/// Files are handled strictly one after another in upload order. Each stored
/// temp image is released before the next file starts, and on every early
/// exit through the guard's `Drop`.
pub struct ProcessBatchUseCase {
    validator: ValidationService,
    storage: Arc<dyn ImageStorage>,
    faces: Arc<dyn FaceService>,
}

impl ProcessBatchUseCase {
    pub fn new(
        validator: ValidationService,
        storage: Arc<dyn ImageStorage>,
        faces: Arc<dyn FaceService>,
    ) -> Self {
        Self {
            validator,
            storage,
            faces,
        }
    }

    #[instrument(skip(self, request), fields(
        mode = ?request.mode,
        policy = ?request.policy,
        files = request.files.len()
    ))]
    pub async fn execute(&self, request: ProcessBatchRequest) -> Result<BatchReport, BatchError> {
        let ProcessBatchRequest {
            files,
            mode,
            policy,
        } = request;

        let mut outcome = BatchOutcome::empty(mode);
        let mut failures = Vec::new();

        for (index, file) in files.iter().enumerate() {
            debug!(index, filename = %file.filename, "processing file");

            if let Err(reason) = self.validator.validate(file) {
                match policy {
                    BatchPolicy::FailFast => {
                        return Err(BatchError::Validation {
                            filename: file.filename.clone(),
                            source: reason,
                        });
                    }
                    BatchPolicy::CollectErrors => {
                        failures.push(failure(file, reason.to_string()));
                        continue;
                    }
                }
            }

            let has_face = self.process_file(file, &mut outcome).await?;
            if !has_face {
                match (mode, policy) {
                    (BatchMode::Detect, BatchPolicy::FailFast) => {
                        warn!(index, filename = %file.filename, "no face detected, aborting batch");
                        return Err(BatchError::NoFaceDetected);
                    }
                    (_, BatchPolicy::CollectErrors) => {
                        failures.push(failure(file, BatchError::NoFaceDetected.to_string()));
                    }
                    (BatchMode::Encode, BatchPolicy::FailFast) => {}
                }
            }
        }

        if policy == BatchPolicy::FailFast && outcome.is_empty() {
            return Err(BatchError::NoFaceDetected);
        }

        info!(failures = failures.len(), "batch processed");
        Ok(BatchReport { outcome, failures })
    }

    /// Runs one validated file through storage and the face backend.
    ///
    /// Returns whether at least one face was found.
    async fn process_file(
        &self,
        file: &UploadedFile,
        outcome: &mut BatchOutcome,
    ) -> Result<bool, BatchError> {
        let image = self.storage.store(&file.data).await?;
        let boxes = self.faces.detect(image.path()).await?;
        debug!(faces = boxes.len(), filename = %file.filename, "detection finished");

        let has_face = !boxes.is_empty();
        match outcome {
            BatchOutcome::Encodings(encodings) => {
                let encoded = self.faces.encode(image.path(), &boxes).await?;
                encodings.extend(encoded);
            }
            BatchOutcome::Detections(records) => {
                if has_face {
                    records.push(DetectionRecord {
                        filename: file.filename.clone(),
                        boxes,
                    });
                }
            }
        }

        image.release();
        Ok(has_face)
    }
}

fn failure(file: &UploadedFile, error: String) -> FileFailure {
    FileFailure {
        filename: file.filename.clone(),
        error,
    }
}
