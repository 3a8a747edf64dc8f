use anyhow::Result;

use crate::slot::Slot;

/// Receives slot state for rendering. Called once per logical batch.
#[async_trait::async_trait]
pub trait SlotRendererPort: Send + Sync {
    async fn update_slots(&self, slots: &[Slot]) -> Result<()>;
    async fn refresh_grid(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotification {
    /// Nothing capturable on the clipboard.
    CopyFailed,
    /// A copied file could not be decoded.
    InvalidClipboardFormat { file_name: String },
    /// Every slot is pinned.
    NoFreeSlot,
}

#[async_trait::async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, notification: UserNotification) -> Result<()>;
}
