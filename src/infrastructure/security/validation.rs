use crate::domain::face::{entity::UploadedFile, errors::ValidationError};
use tracing::{debug, instrument};

/// Default per-file ceiling: 5 MiB.
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Configurable upload gate for image files.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Exact MIME types accepted for processing
    pub allowed_content_types: Vec<String>,

    /// Files strictly larger than this are rejected
    pub max_image_size_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
        }
    }
}

/// Metadata-only validation of uploaded images.
///
/// Checks run in a fixed order, so a malformed request always gets the
/// first matching reason: type prefix, exact format, then size.
#[derive(Debug, Clone, Default)]
pub struct ValidationService {
    config: ValidationConfig,
}

impl ValidationService {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates one uploaded file. Pure function of its metadata.
    #[instrument(skip(self, file), fields(filename = %file.filename, content_type = %file.content_type, size = file.size()))]
    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        self.validate_metadata(&file.content_type, file.size())
    }

    pub fn validate_metadata(&self, content_type: &str, size: usize) -> Result<(), ValidationError> {
        if !content_type.starts_with("image/") {
            debug!("rejected: not an image");
            return Err(ValidationError::NotAnImage);
        }

        if !self
            .config
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            debug!("rejected: unsupported format");
            return Err(ValidationError::UnsupportedFormat);
        }

        if size > self.config.max_image_size_bytes {
            debug!(limit = self.config.max_image_size_bytes, "rejected: too large");
            return Err(ValidationError::TooLarge);
        }

        Ok(())
    }
}
