use thiserror::Error;

use super::{PinState, Slot, SlotArray};

/// Stored form of one slot: `[text, file_reference, pin_marker, created_at]`.
///
/// Entries written before timestamps existed have only the first three fields.
pub type PersistedSlot = Vec<String>;

pub const PINNED_MARKER: &str = "pinned";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistedSlotError {
    #[error("slot entry has {0} fields, expected 3 or 4")]
    FieldCount(usize),
}

impl Slot {
    pub fn to_persisted(&self) -> PersistedSlot {
        vec![
            self.text().to_string(),
            self.file_reference().to_string(),
            match self.pin_state() {
                PinState::Pinned => PINNED_MARKER.to_string(),
                PinState::None => String::new(),
            },
            self.created_at()
                .map(|ts| ts.to_string())
                .unwrap_or_default(),
        ]
    }

    /// Decodes a stored entry.
    ///
    /// A missing or unparseable timestamp decodes to `None`, which never
    /// expires.
    pub fn from_persisted(entry: &[String]) -> Result<Self, PersistedSlotError> {
        let (text, file_reference, marker, created_at) = match entry {
            [text, file, marker] => (text, file, marker, None),
            [text, file, marker, ts] => (text, file, marker, parse_timestamp(ts)),
            other => return Err(PersistedSlotError::FieldCount(other.len())),
        };
        let pin_state = if marker == PINNED_MARKER {
            PinState::Pinned
        } else {
            PinState::None
        };
        Ok(Slot::restore(
            text.clone(),
            file_reference.clone(),
            pin_state,
            created_at,
        ))
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite())
            .map(|secs| secs.trunc() as i64)
    })
}

impl SlotArray {
    pub fn to_persisted(&self) -> Vec<PersistedSlot> {
        self.slots().iter().map(Slot::to_persisted).collect()
    }

    /// Decodes stored entries, substituting an empty slot for each malformed
    /// one. Returns the array and the rejected entries by index.
    pub fn from_persisted(
        entries: &[PersistedSlot],
        min_count: usize,
    ) -> (Self, Vec<(usize, PersistedSlotError)>) {
        let mut rejected = Vec::new();
        let slots = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Slot::from_persisted(entry).unwrap_or_else(|err| {
                    rejected.push((index, err));
                    Slot::empty()
                })
            })
            .collect();
        (SlotArray::from_slots(slots, min_count), rejected)
    }
}
