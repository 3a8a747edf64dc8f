//! Clipboard change handler port
//!
//! The platform layer owns change detection and calls this when it fires.
//! The app layer implements it by running a capture.

use anyhow::Result;

/// Callback for "clipboard content changed".
///
/// Carries no payload: the detector never reads images or files, the
/// capture routine does. Implementations must eventually call
/// [`WatcherControlPort::done_processing`](crate::ports::WatcherControlPort::done_processing)
/// so the detector re-arms.
#[async_trait::async_trait]
pub trait ClipboardChangeHandler: Send + Sync {
    async fn on_clipboard_changed(&self) -> Result<()>;
}
