use anyhow::Result;
use async_trait::async_trait;

use crate::slot::PersistedSlot;

/// Durable storage for the slot array.
///
/// Replace-whole-value semantics: `save_slots` overwrites everything.
#[async_trait]
pub trait SlotRepositoryPort: Send + Sync {
    /// Returns an empty list when nothing was saved yet.
    async fn load_slots(&self) -> Result<Vec<PersistedSlot>>;
    async fn save_slots(&self, slots: &[PersistedSlot]) -> Result<()>;
}
