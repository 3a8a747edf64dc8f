use serde::{Deserialize, Serialize};

use crate::clipboard::{CapturedItem, CapturedPayload, ContentHash};
use crate::ports::ContentHashPort;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PinState {
    #[default]
    None,
    Pinned,
}

impl PinState {
    pub fn toggled(self) -> Self {
        match self {
            PinState::None => PinState::Pinned,
            PinState::Pinned => PinState::None,
        }
    }
}

/// Borrowed view of what a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotContent<'a> {
    Empty,
    Text(&'a str),
    File(&'a str),
}

/// One fixed position in the history array.
///
/// Holds either text or a cache file reference, never both. Fields are
/// private so that invariant and the `created_at` bookkeeping cannot be
/// bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    text: String,
    file_reference: String,
    pin_state: PinState,
    created_at: Option<i64>,
}

impl Slot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>, created_at: i64) -> Self {
        Self {
            text: text.into(),
            file_reference: String::new(),
            pin_state: PinState::None,
            created_at: Some(created_at),
        }
    }

    pub fn with_file(file_reference: impl Into<String>, created_at: i64) -> Self {
        Self {
            text: String::new(),
            file_reference: file_reference.into(),
            pin_state: PinState::None,
            created_at: Some(created_at),
        }
    }

    /// Builds the slot a captured item renders into.
    ///
    /// Byte payloads need a cache file name; items without one yield `None`.
    pub fn from_captured(item: &CapturedItem, created_at: i64) -> Option<Self> {
        match &item.payload {
            CapturedPayload::Text(text) if !text.is_empty() => {
                Some(Self::with_text(text.clone(), created_at))
            }
            CapturedPayload::Text(_) => None,
            CapturedPayload::Bytes(_) => item
                .suggested_filename
                .as_ref()
                .map(|name| Self::with_file(name.clone(), created_at)),
        }
    }

    /// Reassembles a slot from stored fields. Text wins if both are set.
    pub(crate) fn restore(
        text: String,
        file_reference: String,
        pin_state: PinState,
        created_at: Option<i64>,
    ) -> Self {
        let (text, file_reference) = if text.is_empty() {
            (text, file_reference)
        } else {
            (text, String::new())
        };
        let created_at = if text.is_empty() && file_reference.is_empty() {
            None
        } else {
            created_at
        };
        Self {
            text,
            file_reference,
            pin_state,
            created_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file_reference(&self) -> &str {
        &self.file_reference
    }

    pub fn pin_state(&self) -> PinState {
        self.pin_state
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.file_reference.is_empty()
    }

    pub fn is_pinned(&self) -> bool {
        self.pin_state == PinState::Pinned
    }

    pub fn content(&self) -> SlotContent<'_> {
        if !self.text.is_empty() {
            SlotContent::Text(&self.text)
        } else if !self.file_reference.is_empty() {
            SlotContent::File(&self.file_reference)
        } else {
            SlotContent::Empty
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self.content() {
            SlotContent::File(name) => Some(name),
            _ => None,
        }
    }

    /// Canonical hash of the slot's content, used for head dedup.
    ///
    /// Text is re-hashed; a file slot carries its hash in the cache file name.
    pub fn content_hash(&self, hasher: &dyn ContentHashPort) -> Option<ContentHash> {
        match self.content() {
            SlotContent::Empty => None,
            SlotContent::Text(text) => hasher.hash_bytes(text.as_bytes()).ok(),
            SlotContent::File(name) => ContentHash::find_in_file_name(name),
        }
    }

    /// Whether the occupant is older than `max_age_secs` at `now`.
    ///
    /// Slots without a timestamp never expire.
    pub fn is_older_than(&self, now: i64, max_age_secs: i64) -> bool {
        match self.created_at {
            Some(created_at) => now.saturating_sub(created_at) > max_age_secs,
            None => false,
        }
    }

    pub(crate) fn set_pin_state(&mut self, pin_state: PinState) {
        self.pin_state = pin_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::test_support::{hash_text, TestHasher};

    #[test]
    fn occupied_slots_carry_timestamp() {
        let slot = Slot::with_text("a", 10);
        assert_eq!(slot.created_at(), Some(10));
        assert!(!slot.is_empty());
        assert_eq!(slot.content(), SlotContent::Text("a"));
        assert!(Slot::empty().created_at().is_none());
    }

    #[test]
    fn restore_drops_file_when_text_present() {
        let slot = Slot::restore("t".into(), "f.png".into(), PinState::Pinned, Some(3));
        assert_eq!(slot.text(), "t");
        assert_eq!(slot.file_reference(), "");
        assert!(slot.is_pinned());
    }

    #[test]
    fn restore_clears_timestamp_of_empty_slot() {
        let slot = Slot::restore(String::new(), String::new(), PinState::None, Some(3));
        assert!(slot.created_at().is_none());
    }

    #[test]
    fn text_slot_hash_matches_hasher() {
        let slot = Slot::with_text("hello", 0);
        assert_eq!(slot.content_hash(&TestHasher), Some(hash_text("hello")));
    }

    #[test]
    fn file_slot_hash_comes_from_name() {
        let hash = hash_text("image bytes");
        let slot = Slot::with_file(format!("{}.png", hash), 0);
        assert_eq!(slot.content_hash(&TestHasher), Some(hash));
    }

    #[test]
    fn expiry_age_is_strictly_greater() {
        let slot = Slot::with_text("a", 100);
        assert!(!slot.is_older_than(400, 300));
        assert!(slot.is_older_than(401, 300));
        assert!(!slot.is_older_than(50, 300));
        assert!(!Slot::empty().is_older_than(i64::MAX, 0));
    }

    #[test]
    fn captured_empty_text_has_no_slot() {
        let item = CapturedItem::text(String::new(), hash_text(""));
        assert!(Slot::from_captured(&item, 1).is_none());
    }
}
