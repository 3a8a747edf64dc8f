use sg_core::ports::watcher_control::{WatcherControlError, WatcherControlPort};
use tokio::sync::mpsc;

use crate::ipc::PlatformCommand;

/// Watcher control that forwards lifecycle commands to the platform runtime
/// over its in-process command channel.
///
/// Sending only enqueues the command; the runtime applies it on its own loop.
/// Once the runtime is gone every call fails with
/// [`WatcherControlError::ChannelClosed`].
///
/// # Examples
///
/// ```
/// use sg_core::ports::watcher_control::WatcherControlPort;
/// use sg_platform::adapters::InMemoryWatcherControl;
/// use sg_platform::ipc::PlatformCommand;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::channel(4);
/// let control = InMemoryWatcherControl::new(cmd_tx);
///
/// control.start_watcher().await.unwrap();
/// assert_eq!(cmd_rx.recv().await, Some(PlatformCommand::StartClipboardWatcher));
/// # }
/// ```
pub struct InMemoryWatcherControl {
    cmd_tx: mpsc::Sender<PlatformCommand>,
}

impl InMemoryWatcherControl {
    pub fn new(cmd_tx: mpsc::Sender<PlatformCommand>) -> Self {
        Self { cmd_tx }
    }

    async fn send(
        &self,
        command: PlatformCommand,
        on_error: fn(String) -> WatcherControlError,
    ) -> Result<(), WatcherControlError> {
        self.cmd_tx.send(command).await.map_err(|e| {
            if self.cmd_tx.is_closed() {
                WatcherControlError::ChannelClosed
            } else {
                on_error(e.to_string())
            }
        })
    }
}

#[async_trait::async_trait]
impl WatcherControlPort for InMemoryWatcherControl {
    async fn start_watcher(&self) -> Result<(), WatcherControlError> {
        self.send(
            PlatformCommand::StartClipboardWatcher,
            WatcherControlError::StartFailed,
        )
        .await
    }

    async fn stop_watcher(&self) -> Result<(), WatcherControlError> {
        self.send(
            PlatformCommand::StopClipboardWatcher,
            WatcherControlError::StopFailed,
        )
        .await
    }

    async fn done_processing(&self) -> Result<(), WatcherControlError> {
        self.send(PlatformCommand::DoneProcessing, WatcherControlError::DoneFailed)
            .await
    }
}
