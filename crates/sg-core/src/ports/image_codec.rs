use anyhow::Result;

/// Canonical encoding of an image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    pub bytes: Vec<u8>,
    /// Extension the bytes are encoded as, without the dot.
    pub extension: String,
}

/// Decodes arbitrary image bytes and re-encodes them deterministically.
///
/// Identical pixels always produce identical output bytes, so the hash of
/// the output is a stable content address.
pub trait ImageCodecPort: Send + Sync {
    /// Re-encodes as `preferred_extension` when supported, PNG otherwise.
    ///
    /// Fails when `bytes` cannot be decoded as an image.
    fn canonicalize(&self, bytes: &[u8], preferred_extension: &str) -> Result<CanonicalImage>;
}
