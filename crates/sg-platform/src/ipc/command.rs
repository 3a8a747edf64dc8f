#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    /// Capture a baseline, subscribe to OS notifications and start polling
    StartClipboardWatcher,
    /// Unsubscribe and stop polling
    StopClipboardWatcher,
    /// The consumer finished acting on the last fired change
    DoneProcessing,
    Shutdown,
}
