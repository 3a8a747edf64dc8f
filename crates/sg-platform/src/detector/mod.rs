//! Clipboard change detection.
//!
//! ```text
//!  Idle --start--> CapturingInitial --baseline--> Armed
//!  Armed --trigger--> CheckingChange --unchanged--> Armed
//!                                   --changed----> Suspended
//!  Suspended --done_processing--> Armed (+ immediate re-check)
//!  any --stop--> Idle
//! ```

#[allow(clippy::module_inception)]
mod detector;
mod state;

pub use detector::{ChangeDetector, CheckOutcome};
pub use state::{DetectorState, MonitorStatus, TriggerSource};
