//! Assembles adapters, the platform runtime and the engine.
//!
//! ```text
//! LocalClipboard ─┬─ ChangeDetector ─ PlatformRuntime ◀─ InMemoryWatcherControl
//!                 │                        │ on_clipboard_changed
//!                 └──────────────── ClipboardEngine (sg-app)
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use sg_app::{AppDeps, ClipboardEngine};
use sg_core::app_dirs::AppDirs;
use sg_core::ports::{ContentHashPort, SettingsPort};
use sg_core::AppConfig;
use sg_infra::{
    CanonicalImageCodec, FileSettingsRepository, FileSlotRepository, FsPayloadCache,
    Sha256Hasher, SystemClock,
};
use sg_platform::adapters::InMemoryWatcherControl;
use sg_platform::clipboard::{ClipboardRsSignalSource, LocalClipboard};
use sg_platform::detector::{ChangeDetector, MonitorStatus};
use sg_platform::runtime::event_bus::PlatformCommandSender;
use sg_platform::runtime::PlatformRuntime;

use crate::adapters::{LogNotifier, LogSlotRenderer};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Everything the run loop needs once wiring is done.
pub struct WiredApp {
    pub engine: Arc<ClipboardEngine>,
    pub platform_commands: PlatformCommandSender,
    pub monitor_status: watch::Receiver<MonitorStatus>,
    pub platform_runtime: JoinHandle<()>,
}

/// Builds every adapter and spawns the platform runtime.
///
/// The engine is returned unstarted; monitoring begins with
/// [`ClipboardEngine::start`].
pub async fn wire_dependencies(config: &AppConfig, dirs: &AppDirs) -> Result<WiredApp> {
    let hasher: Arc<dyn ContentHashPort> = Arc::new(Sha256Hasher);
    let clipboard = Arc::new(LocalClipboard::new(hasher.clone())?);

    let settings = Arc::new(FileSettingsRepository::new(dirs.settings_path()));
    let initial_settings = settings
        .load()
        .await
        .context("failed to load settings")?;

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

    let deps = AppDeps {
        clipboard_reader: clipboard.clone(),
        clipboard_writer: clipboard.clone(),
        watcher_control: Arc::new(InMemoryWatcherControl::new(command_tx.clone())),
        slot_repo: Arc::new(FileSlotRepository::new(dirs.slots_path())),
        payload_cache: Arc::new(FsPayloadCache::new(dirs.payload_cache_dir())),
        settings,
        hasher: hasher.clone(),
        image_codec: Arc::new(CanonicalImageCodec::new()),
        renderer: Arc::new(LogSlotRenderer::new()),
        notifier: Arc::new(LogNotifier::new()),
        clock: Arc::new(SystemClock),
    };
    let engine = Arc::new(ClipboardEngine::new(deps, &initial_settings, config));

    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));
    let runtime = PlatformRuntime::new(
        ChangeDetector::new(clipboard, hasher),
        Box::new(ClipboardRsSignalSource::new()),
        event_tx,
        event_rx,
        command_rx,
        Some(engine.change_handler()),
    )
    .with_poll_interval(poll_interval);
    let monitor_status = runtime.status();
    let platform_runtime = tokio::spawn(runtime.run());

    info!(
        data_dir = %dirs.app_data_root.display(),
        cache_dir = %dirs.payload_cache_dir().display(),
        poll_ms = poll_interval.as_millis() as u64,
        "Dependencies wired"
    );

    Ok(WiredApp {
        engine,
        platform_commands: command_tx,
        monitor_status,
        platform_runtime,
    })
}
