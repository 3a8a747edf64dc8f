//! Use cases for starting and stopping clipboard monitoring.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use sg_core::ports::{WatcherControlError, WatcherControlPort};

#[derive(Debug, thiserror::Error)]
pub enum ClipboardWatcherError {
    #[error("Failed to start clipboard watcher: {0}")]
    StartFailed(String),

    #[error("Failed to stop clipboard watcher: {0}")]
    StopFailed(String),
}

/// Requests the change detector to start. Idempotent.
pub struct StartClipboardWatcher {
    watcher_control: Arc<dyn WatcherControlPort>,
}

impl StartClipboardWatcher {
    pub fn new(watcher_control: Arc<dyn WatcherControlPort>) -> Self {
        Self { watcher_control }
    }

    pub async fn execute(&self) -> Result<(), ClipboardWatcherError> {
        let span = info_span!("usecase.start_clipboard_watcher.execute");

        async {
            info!("Requesting clipboard watcher to start");
            self.watcher_control
                .start_watcher()
                .await
                .map_err(|err: WatcherControlError| {
                    ClipboardWatcherError::StartFailed(err.to_string())
                })
        }
        .instrument(span)
        .await
    }
}

/// Requests the change detector to stop, e.g. for incognito mode. Idempotent.
pub struct StopClipboardWatcher {
    watcher_control: Arc<dyn WatcherControlPort>,
}

impl StopClipboardWatcher {
    pub fn new(watcher_control: Arc<dyn WatcherControlPort>) -> Self {
        Self { watcher_control }
    }

    pub async fn execute(&self) -> Result<(), ClipboardWatcherError> {
        let span = info_span!("usecase.stop_clipboard_watcher.execute");

        async {
            info!("Requesting clipboard watcher to stop");
            self.watcher_control
                .stop_watcher()
                .await
                .map_err(|err| ClipboardWatcherError::StopFailed(err.to_string()))
        }
        .instrument(span)
        .await
    }
}
