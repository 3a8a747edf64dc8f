use serde::{Deserialize, Serialize};
use std::fmt;

const HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of a clipboard payload.
///
/// Text is hashed over its UTF-8 bytes, images over their canonical PNG
/// encoding and files over their canonical bytes. Two payloads are the same
/// content exactly when their hashes are equal.
///
/// Produced by a [`ContentHashPort`](crate::ports::ContentHashPort); this type
/// only validates and carries the digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wraps a raw 32 byte digest.
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    /// Accepts a 64 character hex digest, normalizing to lowercase.
    pub fn from_hex(value: &str) -> Option<Self> {
        if value.len() == HEX_LEN && value.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(value.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Recovers the hash embedded in a cache file name.
    ///
    /// Cache names are either `{hash}.{ext}` or `{stem}_{hash}.{ext}`.
    pub fn find_in_file_name(file_name: &str) -> Option<Self> {
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => file_name,
        };
        let candidate = match stem.rsplit_once('_') {
            Some((_, tail)) => tail,
            None => stem,
        };
        Self::from_hex(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(text: &str) -> ContentHash {
        use sha2::{Digest, Sha256};
        ContentHash::from_digest(&Sha256::digest(text.as_bytes()))
    }

    #[test]
    fn formats_digest_as_lowercase_hex() {
        assert_eq!(
            hash_of("hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn recovers_hash_from_image_name() {
        let hash = hash_of("img");
        let name = format!("{}.png", hash);
        assert_eq!(ContentHash::find_in_file_name(&name), Some(hash));
    }

    #[test]
    fn recovers_hash_from_file_name_with_stem() {
        let hash = hash_of("doc");
        let name = format!("my_report_{}.jpeg", hash);
        assert_eq!(ContentHash::find_in_file_name(&name), Some(hash));
    }

    #[test]
    fn rejects_names_without_digest() {
        assert_eq!(ContentHash::find_in_file_name("photo.png"), None);
        assert_eq!(ContentHash::find_in_file_name("abcd1234.png"), None);
        assert_eq!(ContentHash::find_in_file_name(""), None);
        assert_eq!(ContentHash::from_hex("zz"), None);
    }

    #[test]
    fn from_hex_normalizes_case() {
        let upper = "A".repeat(64);
        assert_eq!(
            ContentHash::from_hex(&upper).map(|h| h.as_str().to_string()),
            Some("a".repeat(64))
        );
    }
}
