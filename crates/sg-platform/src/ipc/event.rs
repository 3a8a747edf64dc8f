/// Facts reported into the platform runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The OS says the clipboard may have changed.
    ClipboardSignaled,

    /// The OS notification source failed; polling continues.
    SignalSourceFailed { message: String },

    /// The change handler task died without signalling `DoneProcessing`.
    ChangeHandlerAborted,
}
