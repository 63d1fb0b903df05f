use super::traits::ImageStorage;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Suffix given to every temp image, whatever the uploaded format.
pub const TEMP_IMAGE_SUFFIX: &str = ".jpg";

/// Scratch storage for uploaded images in a local directory.
#[derive(Debug, Clone)]
pub struct TempFileStore {
    dir: PathBuf,
}

impl TempFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn next_path(&self) -> PathBuf {
        self.dir
            .join(format!("face-{}{}", Uuid::now_v7().simple(), TEMP_IMAGE_SUFFIX))
    }
}

#[async_trait]
impl ImageStorage for TempFileStore {
    async fn store(&self, data: &[u8]) -> anyhow::Result<TempImage> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create temp dir {}", self.dir.display()))?;

        write_guarded(self.next_path(), data).await
    }
}

/// Writes `data` to `path` behind a guard, so a partly written file is
/// removed when the write fails.
async fn write_guarded(path: PathBuf, data: &[u8]) -> anyhow::Result<TempImage> {
    let image = TempImage { path };
    tokio::fs::write(image.path(), data)
        .await
        .with_context(|| format!("failed to write temp image {}", image.path().display()))?;

    tracing::debug!(path = %image.path().display(), bytes = data.len(), "temp image stored");
    Ok(image)
}

/// Scoped handle to a stored temp image.
///
/// The backing file is removed when the handle is released or dropped,
/// including on error paths and panics. Removal failures are only logged.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the backing file now.
    pub fn release(self) {
        drop(self);
    }
}

// Synchronous on purpose: Drop cannot await, and a single unlink does not stall the worker.
impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "temp image released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp image")
            }
        }
    }
}
