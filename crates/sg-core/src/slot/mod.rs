//! Slot domain: the bounded, pin-aware history array.
//!
//! Every policy decision (insert placement, eviction, dedup against the
//! head, compaction, resize, clear, expiry) lives here as pure operations on
//! [`SlotArray`]. Persistence and cache-file cleanup are the caller's job;
//! operations return the slots they displaced so the caller knows which
//! cached files to delete.

mod array;
mod error;
mod model;
mod persisted;

pub use array::{InsertDecision, InsertOutcome, SlotArray};
pub use error::SlotError;
pub use model::{PinState, Slot, SlotContent};
pub use persisted::{PersistedSlot, PersistedSlotError, PINNED_MARKER};
