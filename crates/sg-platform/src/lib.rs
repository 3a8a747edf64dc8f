//! # sg-platform
//!
//! OS integration for Serigy: the system clipboard, its change
//! notifications, the change detector state machine and the runtime loop
//! that drives it.

pub mod adapters;
pub mod app_dirs;
pub mod clipboard;
pub mod detector;
pub mod ipc;
pub mod runtime;
