use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

/// Content-addressed directory holding image and file payloads.
///
/// Names come from [`cache_file_name`](crate::clipboard::cache_file_name), so
/// writing identical content twice is a no-op.
#[async_trait]
pub trait PayloadCachePort: Send + Sync {
    async fn contains(&self, file_name: &str) -> Result<bool>;

    /// Returns `true` if the file was written, `false` if it already existed.
    async fn write_if_absent(&self, file_name: &str, bytes: &[u8]) -> Result<bool>;

    async fn read(&self, file_name: &str) -> Result<Vec<u8>>;

    /// Returns `false` when the file was already gone.
    async fn remove(&self, file_name: &str) -> Result<bool>;

    fn path_of(&self, file_name: &str) -> PathBuf;
}
