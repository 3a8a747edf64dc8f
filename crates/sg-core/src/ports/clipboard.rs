use anyhow::Result;
use async_trait::async_trait;

use crate::clipboard::ClipboardFormats;

/// A file found in a copied file list, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardFile {
    /// Name as it appeared in the list, used to derive the cache stem.
    pub name: String,
    /// MIME type guessed from the file, e.g. `image/jpeg`.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Read access to the OS clipboard.
///
/// Reads may block on the clipboard owner; implementations run them off the
/// async executor.
#[async_trait]
pub trait ClipboardReaderPort: Send + Sync {
    /// Current format descriptor. Cheap; used by the change detector.
    async fn formats(&self) -> Result<ClipboardFormats>;

    /// Whether this process wrote the current clipboard content.
    async fn is_local_owner(&self) -> Result<bool>;

    async fn read_text(&self) -> Result<Option<String>>;

    /// Image content as encoded bytes (PNG).
    async fn read_image(&self) -> Result<Option<Vec<u8>>>;

    async fn read_files(&self) -> Result<Vec<ClipboardFile>>;
}

/// Write access used when restoring a slot to the clipboard.
///
/// Writes are marked as self-originated so the detector skips them.
#[async_trait]
pub trait ClipboardWriterPort: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
    async fn write_image(&self, png_bytes: &[u8]) -> Result<()>;
}
