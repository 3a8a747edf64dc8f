//! Use case for copying a slot back onto the system clipboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};

use sg_core::ports::{ClipboardWriterPort, ImageCodecPort, PayloadCachePort};
use sg_core::{SlotContent, SlotError};

use crate::store::SlotStore;

/// Writes a slot's text or cached image to the clipboard.
///
/// The clipboard adapter marks the write as self-originated, so the change
/// detector does not capture it again.
pub struct RestoreSlotToClipboard {
    store: Arc<SlotStore>,
    cache: Arc<dyn PayloadCachePort>,
    codec: Arc<dyn ImageCodecPort>,
    writer: Arc<dyn ClipboardWriterPort>,
}

impl RestoreSlotToClipboard {
    pub fn new(
        store: Arc<SlotStore>,
        cache: Arc<dyn PayloadCachePort>,
        codec: Arc<dyn ImageCodecPort>,
        writer: Arc<dyn ClipboardWriterPort>,
    ) -> Self {
        Self {
            store,
            cache,
            codec,
            writer,
        }
    }

    /// Returns `false` for an empty slot.
    pub async fn execute(&self, index: usize) -> Result<bool> {
        let span = info_span!("usecase.restore_slot_to_clipboard.execute", slot_index = index);
        async {
            let slot = match self.store.slot(index).await {
                Some(slot) => slot,
                None => {
                    let len = self.store.len().await;
                    return Err(SlotError::IndexOutOfRange { index, len }.into());
                }
            };

            match slot.content() {
                SlotContent::Empty => return Ok(false),
                SlotContent::Text(text) => self.writer.write_text(text).await?,
                SlotContent::File(name) => {
                    let bytes = self
                        .cache
                        .read(name)
                        .await
                        .with_context(|| format!("cached file {name} unavailable"))?;
                    let png = if name.ends_with(".png") {
                        bytes
                    } else {
                        self.codec.canonicalize(&bytes, "png")?.bytes
                    };
                    self.writer.write_image(&png).await?;
                }
            }
            info!("Slot restored to clipboard");
            Ok(true)
        }
        .instrument(span)
        .await
    }
}
