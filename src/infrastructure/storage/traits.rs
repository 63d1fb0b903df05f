use super::temp_file_store::TempImage;
use async_trait::async_trait;

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Writes `data` to a fresh uniquely named file and returns a guard that removes it on drop.
    async fn store(&self, data: &[u8]) -> anyhow::Result<TempImage>;
}
