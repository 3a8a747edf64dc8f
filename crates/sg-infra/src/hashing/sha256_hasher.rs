use anyhow::Result;
use sg_core::ports::ContentHashPort;
use sg_core::ContentHash;
use sha2::{Digest, Sha256};

pub struct Sha256Hasher;

impl ContentHashPort for Sha256Hasher {
    fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentHash> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Ok(ContentHash::from_digest(&hasher.finalize()))
    }
}
