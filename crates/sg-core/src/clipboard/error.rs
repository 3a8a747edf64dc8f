use thiserror::Error;

/// Why a capture produced no item.
///
/// None of these are fatal; the capture is discarded and the next copy
/// produces a fresh attempt.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("clipboard holds nothing to capture")]
    Empty,

    #[error("unsupported clipboard format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("capture superseded by a newer request")]
    Cancelled,

    #[error("clipboard read failed: {0}")]
    Read(String),

    #[error("failed to hash captured content: {0}")]
    Hash(String),
}
