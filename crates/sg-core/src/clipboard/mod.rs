mod content;
mod error;
mod formats;
mod hash;

pub use content::{cache_file_name, CapturedItem, CapturedPayload, ContentKind};
pub use error::CaptureError;
pub use formats::{
    ClipboardFormats, SUPPORTED_FILE_FORMATS, SUPPORTED_IMAGE_FORMATS, SUPPORTED_TEXT_FORMATS,
};
pub use hash::ContentHash;
