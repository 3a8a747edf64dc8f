use async_trait::async_trait;

/// Lifecycle control for the clipboard change detector.
///
/// `start_watcher()` and `stop_watcher()` are idempotent.
#[async_trait]
pub trait WatcherControlPort: Send + Sync {
    async fn start_watcher(&self) -> Result<(), WatcherControlError>;

    async fn stop_watcher(&self) -> Result<(), WatcherControlError>;

    /// Signals that a fired change has been fully handled and the detector
    /// may re-arm. Call exactly once per fired change.
    async fn done_processing(&self) -> Result<(), WatcherControlError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WatcherControlError {
    #[error("failed to send start command: {0}")]
    StartFailed(String),

    #[error("failed to send stop command: {0}")]
    StopFailed(String),

    #[error("failed to send done-processing command: {0}")]
    DoneFailed(String),

    #[error("watcher channel closed")]
    ChannelClosed,
}
