use anyhow::{anyhow, Result};
use clipboard_rs::{ClipboardHandler, ClipboardWatcher, ClipboardWatcherContext, WatcherShutdown};
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::ipc::PlatformEvent;
use crate::runtime::event_bus::PlatformEventSender;

/// A push source of "clipboard may have changed" notifications.
pub trait ChangeSignalSource: Send {
    /// Starts forwarding notifications as [`PlatformEvent::ClipboardSignaled`].
    /// Subscribing twice is a no-op.
    fn subscribe(&mut self, events: PlatformEventSender) -> Result<()>;

    /// Stops forwarding. Idempotent.
    fn unsubscribe(&mut self);
}

struct SignalForwarder {
    events: PlatformEventSender,
}

impl ClipboardHandler for SignalForwarder {
    fn on_clipboard_change(&mut self) {
        match self.events.try_send(PlatformEvent::ClipboardSignaled) {
            Ok(()) => {}
            // A pending signal already covers this one.
            Err(TrySendError::Full(_)) => trace!("Clipboard signal coalesced"),
            Err(TrySendError::Closed(_)) => trace!("Platform runtime gone, dropping signal"),
        }
    }
}

/// OS change notifications via `clipboard-rs`'s watcher thread.
#[derive(Default)]
pub struct ClipboardRsSignalSource {
    shutdown: Option<WatcherShutdown>,
    join: Option<JoinHandle<()>>,
}

impl ClipboardRsSignalSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeSignalSource for ClipboardRsSignalSource {
    fn subscribe(&mut self, events: PlatformEventSender) -> Result<()> {
        if self.shutdown.is_some() {
            debug!("Clipboard signal source already subscribed");
            return Ok(());
        }

        let mut watcher_ctx = ClipboardWatcherContext::new()
            .map_err(|e| anyhow!("Failed to create watcher context: {}", e))?;
        let shutdown = watcher_ctx
            .add_handler(SignalForwarder { events })
            .get_shutdown_channel();

        let join = tokio::task::spawn_blocking(move || {
            info!("Clipboard OS watch started");
            watcher_ctx.start_watch();
            info!("Clipboard OS watch stopped");
        });

        self.shutdown = Some(shutdown);
        self.join = Some(join);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.stop();
        }
        // The watch thread exits on its own once stopped.
        self.join.take();
    }
}

impl Drop for ClipboardRsSignalSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
