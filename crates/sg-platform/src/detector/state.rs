use sg_core::{ClipboardFormats, ContentHash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Idle,
    CapturingInitial,
    Armed,
    CheckingChange,
    /// A change fired and its consumer has not called `done_processing` yet.
    Suspended,
}

impl DetectorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorState::Idle => "idle",
            DetectorState::CapturingInitial => "capturing_initial",
            DetectorState::Armed => "armed",
            DetectorState::CheckingChange => "checking_change",
            DetectorState::Suspended => "suspended",
        }
    }
}

/// What caused a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    OsEvent,
    Poll,
    DoneProcessing,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::OsEvent => "os_event",
            TriggerSource::Poll => "poll",
            TriggerSource::DoneProcessing => "done_processing",
        }
    }
}

/// Observable monitor state, published after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorStatus {
    pub state: DetectorState,
    pub last_known_formats: ClipboardFormats,
    pub last_content_hash: Option<ContentHash>,
    pub is_monitoring: bool,
    pub is_processing: bool,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            state: DetectorState::Idle,
            last_known_formats: ClipboardFormats::default(),
            last_content_hash: None,
            is_monitoring: false,
            is_processing: false,
        }
    }
}
