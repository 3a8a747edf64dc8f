//! # sg-core
//!
//! Core domain models and slot policy for Serigy.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod clipboard;
pub mod config;
pub mod ports;
pub mod settings;
pub mod slot;

pub use clipboard::{CapturedItem, CapturedPayload, ClipboardFormats, ContentHash, ContentKind};
pub use config::AppConfig;
pub use settings::{AutoClearInterval, Settings, SettingsKey};
pub use slot::{InsertOutcome, PinState, Slot, SlotArray, SlotContent, SlotError};
