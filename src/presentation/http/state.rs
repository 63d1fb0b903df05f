use crate::{
    application::process_batch::use_case::ProcessBatchUseCase,
    config::Config,
    infrastructure::{
        ml::traits::FaceService,
        security::validation::{ValidationConfig, ValidationService},
        storage::traits::ImageStorage,
    },
};
use std::sync::Arc;

/// Immutable services shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub faces: Arc<dyn FaceService>,
    pub pipeline: Arc<ProcessBatchUseCase>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn ImageStorage>, faces: Arc<dyn FaceService>) -> Self {
        let validator = ValidationService::new(ValidationConfig {
            max_image_size_bytes: config.max_upload_bytes,
            ..ValidationConfig::default()
        });
        let pipeline = Arc::new(ProcessBatchUseCase::new(validator, storage, faces.clone()));

        Self {
            config,
            faces,
            pipeline,
        }
    }
}
