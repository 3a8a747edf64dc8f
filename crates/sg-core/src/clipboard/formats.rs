use std::fmt;

use super::ContentKind;

pub const SUPPORTED_IMAGE_FORMATS: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/bmp",
    "image/gif",
    "image/webp",
    "image/tiff",
];

pub const SUPPORTED_FILE_FORMATS: &[&str] = &["text/uri-list", "x-special/gnome-copied-files"];

pub const SUPPORTED_TEXT_FORMATS: &[&str] = &[
    "text/plain",
    "text/plain;charset=utf-8",
    "UTF8_STRING",
    "STRING",
    "TEXT",
];

/// The clipboard's advertised format descriptor.
///
/// Compared as an opaque string by the change detector; a different
/// descriptor is authoritative evidence of a new clipboard owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClipboardFormats(String);

impl ClipboardFormats {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self(descriptor.into())
    }

    pub fn from_list<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = formats
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    fn contains_any(&self, supported: &[&str]) -> bool {
        self.iter()
            .any(|f| supported.iter().any(|s| s.eq_ignore_ascii_case(f)))
    }

    pub fn has_text(&self) -> bool {
        self.contains_any(SUPPORTED_TEXT_FORMATS)
    }

    pub fn has_image(&self) -> bool {
        self.contains_any(SUPPORTED_IMAGE_FORMATS)
    }

    pub fn has_files(&self) -> bool {
        self.contains_any(SUPPORTED_FILE_FORMATS)
    }

    /// Picks what to capture: image, then file list, then text.
    pub fn preferred_kind(&self) -> Option<ContentKind> {
        if self.has_image() {
            Some(ContentKind::Image)
        } else if self.has_files() {
            Some(ContentKind::File)
        } else if self.has_text() {
            Some(ContentKind::Text)
        } else {
            None
        }
    }
}

impl fmt::Display for ClipboardFormats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
