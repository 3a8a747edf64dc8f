use serde::{Deserialize, Serialize};

use super::ContentHash;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    File,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedPayload {
    Text(String),
    /// Canonical encoded bytes destined for the payload cache.
    Bytes(Vec<u8>),
}

/// One clipboard capture, ready for ingestion.
///
/// Consumed exactly once by slot insertion; never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedItem {
    pub kind: ContentKind,
    pub payload: CapturedPayload,
    pub content_hash: ContentHash,
    pub suggested_filename: Option<String>,
}

impl CapturedItem {
    pub fn text(text: String, content_hash: ContentHash) -> Self {
        Self {
            kind: ContentKind::Text,
            payload: CapturedPayload::Text(text),
            content_hash,
            suggested_filename: None,
        }
    }

    /// An image taken straight from the clipboard, stored as `{hash}.png`.
    pub fn image(png_bytes: Vec<u8>, content_hash: ContentHash) -> Self {
        let suggested_filename = Some(cache_file_name(None, &content_hash, "png"));
        Self {
            kind: ContentKind::Image,
            payload: CapturedPayload::Bytes(png_bytes),
            content_hash,
            suggested_filename,
        }
    }

    /// A copied file, stored as `{stem}_{hash}.{extension}`.
    pub fn file(
        original_name: &str,
        extension: &str,
        canonical_bytes: Vec<u8>,
        content_hash: ContentHash,
    ) -> Self {
        let stem = file_stem(original_name);
        let suggested_filename = Some(cache_file_name(Some(stem), &content_hash, extension));
        Self {
            kind: ContentKind::File,
            payload: CapturedPayload::Bytes(canonical_bytes),
            content_hash,
            suggested_filename,
        }
    }

    pub fn text_payload(&self) -> Option<&str> {
        match &self.payload {
            CapturedPayload::Text(text) => Some(text),
            CapturedPayload::Bytes(_) => None,
        }
    }

    pub fn bytes_payload(&self) -> Option<&[u8]> {
        match &self.payload {
            CapturedPayload::Bytes(bytes) => Some(bytes),
            CapturedPayload::Text(_) => None,
        }
    }
}

/// Content-addressed cache file name.
///
/// Identical content always maps to the same name, so a cache hit is a
/// simple existence check.
pub fn cache_file_name(stem: Option<&str>, hash: &ContentHash, extension: &str) -> String {
    match stem {
        Some(stem) if !stem.is_empty() => format!("{}_{}.{}", stem, hash, extension),
        _ => format!("{}.{}", hash, extension),
    }
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}
