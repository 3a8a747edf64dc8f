use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use sg_core::ports::{NotifierPort, SlotRendererPort, UserNotification};
use sg_core::{Slot, SlotContent};

/// Renders the slot grid into the log, one line per occupied slot.
#[derive(Default)]
pub struct LogSlotRenderer;

impl LogSlotRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SlotRendererPort for LogSlotRenderer {
    async fn update_slots(&self, slots: &[Slot]) -> Result<()> {
        let occupied = slots.iter().filter(|slot| !slot.is_empty()).count();
        info!(slots = slots.len(), occupied, "Slots updated");
        for (index, slot) in slots.iter().enumerate() {
            let pinned = slot.is_pinned();
            match slot.content() {
                SlotContent::Empty => {}
                SlotContent::Text(text) => {
                    debug!(slot_index = index, pinned, preview = %preview(text), "Text slot")
                }
                SlotContent::File(name) => {
                    debug!(slot_index = index, pinned, file = name, "File slot")
                }
            }
        }
        Ok(())
    }

    async fn refresh_grid(&self) -> Result<()> {
        debug!("Slot grid refreshed");
        Ok(())
    }
}

const PREVIEW_CHARS: usize = 40;

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    let head = head.replace('\n', "⏎");
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Reports user notifications as warnings.
#[derive(Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifierPort for LogNotifier {
    async fn notify(&self, notification: UserNotification) -> Result<()> {
        match notification {
            UserNotification::CopyFailed => warn!("Copy failed: nothing capturable on the clipboard"),
            UserNotification::InvalidClipboardFormat { file_name } => {
                warn!(file = %file_name, "Invalid clipboard format")
            }
            UserNotification::NoFreeSlot => warn!("No free slot: every slot is pinned"),
        }
        Ok(())
    }
}
