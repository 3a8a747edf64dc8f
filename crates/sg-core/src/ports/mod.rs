//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `sg-app` and the
//! adapters in `sg-infra` / `sg-platform`. The core only ever sees these
//! traits, so the slot policy can be exercised without a real clipboard,
//! filesystem or UI.
//!
//! ## Port Placement
//!
//! A trait belongs here when a use case depends on it and an outer layer
//! implements it. Helpers used by a single adapter stay in that adapter.

pub mod app_dirs;
pub mod clipboard;
mod clipboard_change_handler;
mod clock;
pub mod errors;
mod hash;
pub mod image_codec;
pub mod payload_cache;
pub mod settings;
pub mod slot_repository;
pub mod ui_port;
pub mod watcher_control;

#[cfg(test)]
mod tests;

pub use app_dirs::AppDirsPort;
pub use clipboard::{ClipboardFile, ClipboardReaderPort, ClipboardWriterPort};
pub use clipboard_change_handler::ClipboardChangeHandler;
pub use clock::*;
pub use errors::AppDirsError;
pub use hash::*;
pub use image_codec::{CanonicalImage, ImageCodecPort};
pub use payload_cache::PayloadCachePort;
pub use settings::{SettingsMigrationPort, SettingsPort};
pub use slot_repository::SlotRepositoryPort;
pub use ui_port::{NotifierPort, SlotRendererPort, UserNotification};
pub use watcher_control::{WatcherControlError, WatcherControlPort};
