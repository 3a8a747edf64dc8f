//! Reaction to "the clipboard changed" from the platform detector.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info_span, warn, Instrument};

use sg_core::clipboard::CaptureError;
use sg_core::ports::{ClipboardChangeHandler, WatcherControlPort};

use super::CaptureClipboard;
use crate::queue::IngestionQueue;

/// Captures the clipboard and hands the item to the ingestion queue.
///
/// ```text
/// PlatformRuntime (detector fired)
///   → HandleClipboardChanged
///   → CaptureClipboard → IngestionQueue::add
///   → WatcherControlPort::done_processing
/// ```
///
/// `done_processing` is sent after every fired change, whatever the capture
/// outcome, so the detector always re-arms.
pub struct HandleClipboardChanged {
    capture: Arc<CaptureClipboard>,
    queue: IngestionQueue,
    watcher_control: Arc<dyn WatcherControlPort>,
}

impl HandleClipboardChanged {
    pub fn new(
        capture: Arc<CaptureClipboard>,
        queue: IngestionQueue,
        watcher_control: Arc<dyn WatcherControlPort>,
    ) -> Self {
        Self {
            capture,
            queue,
            watcher_control,
        }
    }
}

#[async_trait]
impl ClipboardChangeHandler for HandleClipboardChanged {
    async fn on_clipboard_changed(&self) -> Result<()> {
        let span = info_span!("usecase.handle_clipboard_changed.execute");
        async {
            match self.capture.execute().await {
                Ok(item) => {
                    if !self.queue.add(item) {
                        debug!("Capture repeats the last enqueued item");
                    }
                }
                Err(CaptureError::Cancelled) => debug!("Capture superseded"),
                Err(CaptureError::Empty) => debug!("Nothing to capture"),
                Err(err) => warn!(error = %err, "Clipboard capture failed"),
            }

            self.watcher_control.done_processing().await?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}
