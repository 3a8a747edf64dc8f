//! Headless adapters for the UI-facing ports.

mod log_ui;

pub use log_ui::{LogNotifier, LogSlotRenderer};
