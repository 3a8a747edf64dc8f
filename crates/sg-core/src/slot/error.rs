use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot index {index} out of range (slot count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot shrink to {requested} slots while {pinned} slots are pinned")]
    ResizeWouldDropPinned { requested: usize, pinned: usize },

    #[error("invalid slot count: {0}")]
    InvalidSlotCount(usize),
}
