//! # Application Dependencies
//!
//! Dependency grouping for [`ClipboardEngine`](crate::ClipboardEngine)
//! construction. Not a builder: no defaults, no build steps, every port is
//! required.

use std::sync::Arc;

use sg_core::ports::*;

pub struct AppDeps {
    // Clipboard
    pub clipboard_reader: Arc<dyn ClipboardReaderPort>,
    pub clipboard_writer: Arc<dyn ClipboardWriterPort>,
    pub watcher_control: Arc<dyn WatcherControlPort>,

    // Storage
    pub slot_repo: Arc<dyn SlotRepositoryPort>,
    pub payload_cache: Arc<dyn PayloadCachePort>,
    pub settings: Arc<dyn SettingsPort>,

    // Content
    pub hasher: Arc<dyn ContentHashPort>,
    pub image_codec: Arc<dyn ImageCodecPort>,

    // UI
    pub renderer: Arc<dyn SlotRendererPort>,
    pub notifier: Arc<dyn NotifierPort>,

    // System
    pub clock: Arc<dyn ClockPort>,
}
