//! Facade the outer layers drive the capture and history engine through.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sg_core::ports::{ClipboardChangeHandler, SettingsPort, WatcherControlError, WatcherControlPort};
use sg_core::{AppConfig, CapturedItem, Settings};

use crate::deps::AppDeps;
use crate::queue::IngestionQueue;
use crate::store::SlotStore;
use crate::sweeper::ExpirySweeper;
use crate::usecases::{
    ApplySettingsChange, CaptureClipboard, ClipboardWatcherError, ExecuteSlotCommand,
    HandleClipboardChanged, InsertCapturedItem, RestoreSlotToClipboard, SlotCommand,
    StartClipboardWatcher, StopClipboardWatcher,
};

struct Background {
    cancel: CancellationToken,
    settings_reactor: JoinHandle<()>,
}

/// Owns the slot store, ingestion queue and expiry sweeper, and wires them
/// to the ports in [`AppDeps`].
///
/// The platform runtime is driven through [`WatcherControlPort`]; register
/// [`change_handler`](Self::change_handler) with it so fired changes reach
/// the capture routine.
pub struct ClipboardEngine {
    settings: Arc<dyn SettingsPort>,
    store: Arc<SlotStore>,
    queue: IngestionQueue,
    capture: Arc<CaptureClipboard>,
    sweeper: Arc<ExpirySweeper>,
    watcher_control: Arc<dyn WatcherControlPort>,
    change_handler: Arc<HandleClipboardChanged>,
    start_watcher: StartClipboardWatcher,
    stop_watcher: StopClipboardWatcher,
    commands: ExecuteSlotCommand,
    settings_reactor: Arc<ApplySettingsChange>,
    background: Mutex<Option<Background>>,
}

impl ClipboardEngine {
    /// `settings` sizes the slot array before the persisted one is loaded.
    pub fn new(deps: AppDeps, settings: &Settings, config: &AppConfig) -> Self {
        let store = Arc::new(SlotStore::new(
            deps.slot_repo.clone(),
            deps.payload_cache.clone(),
            deps.hasher.clone(),
            deps.clock.clone(),
            deps.renderer.clone(),
            settings,
        ));

        let queue = IngestionQueue::new(Arc::new(InsertCapturedItem::new(
            store.clone(),
            deps.notifier.clone(),
        )));

        let capture = Arc::new(CaptureClipboard::new(
            deps.clipboard_reader.clone(),
            deps.hasher.clone(),
            deps.image_codec.clone(),
            deps.notifier.clone(),
        ));

        let change_handler = Arc::new(HandleClipboardChanged::new(
            capture.clone(),
            queue.clone(),
            deps.watcher_control.clone(),
        ));

        let sweeper = Arc::new(ExpirySweeper::new(
            store.clone(),
            deps.settings.clone(),
            Duration::from_secs(config.sweep_interval_secs.max(1)),
        ));

        let restore = RestoreSlotToClipboard::new(
            store.clone(),
            deps.payload_cache.clone(),
            deps.image_codec.clone(),
            deps.clipboard_writer.clone(),
        );
        let commands = ExecuteSlotCommand::new(
            store.clone(),
            restore,
            deps.settings.clone(),
            Duration::from_millis(config.removal_transition_ms),
        );

        let settings_reactor = Arc::new(ApplySettingsChange::new(
            deps.settings.clone(),
            store.clone(),
            sweeper.clone(),
            StartClipboardWatcher::new(deps.watcher_control.clone()),
            StopClipboardWatcher::new(deps.watcher_control.clone()),
        ));

        Self {
            settings: deps.settings,
            store,
            queue,
            capture,
            sweeper,
            start_watcher: StartClipboardWatcher::new(deps.watcher_control.clone()),
            stop_watcher: StopClipboardWatcher::new(deps.watcher_control.clone()),
            watcher_control: deps.watcher_control,
            change_handler,
            commands,
            settings_reactor,
            background: Mutex::new(None),
        }
    }

    /// Loads slots, resets incognito mode, starts the sweeper, the settings
    /// reactor and clipboard monitoring.
    pub async fn start(&self) -> Result<()> {
        let mut settings = self
            .settings
            .load()
            .await
            .context("failed to load settings")?;
        if settings.incognito_mode {
            info!("Resetting incognito mode on startup");
            settings.incognito_mode = false;
            self.settings.save(&settings).await?;
        }
        self.store.apply_settings(&settings).await;
        self.store.load().await?;

        self.sweeper.restart(settings.auto_clear_enabled).await;

        {
            let mut background = self.background.lock().await;
            if background.is_none() {
                let cancel = CancellationToken::new();
                let settings_reactor = self.settings_reactor.clone().spawn(cancel.clone());
                *background = Some(Background {
                    cancel,
                    settings_reactor,
                });
            }
        }

        self.start_monitoring().await?;
        info!("Clipboard engine started");
        Ok(())
    }

    /// Stops monitoring and background tasks, then waits for queued items.
    pub async fn shutdown(&self) {
        if let Err(err) = self.stop_monitoring().await {
            warn!(error = %err, "Failed to stop clipboard monitoring");
        }
        self.capture.cancel();
        self.sweeper.stop().await;

        if let Some(background) = self.background.lock().await.take() {
            background.cancel.cancel();
            if let Err(err) = background.settings_reactor.await {
                warn!(error = %err, "Settings reactor ended abnormally");
            }
        }

        self.queue.wait_idle().await;
        info!("Clipboard engine stopped");
    }

    /// Entry point for an already-captured item. Returns `false` when it
    /// repeats the last enqueued item.
    pub fn process_clipboard_item(&self, item: CapturedItem) -> bool {
        self.queue.add(item)
    }

    pub async fn start_monitoring(&self) -> Result<(), ClipboardWatcherError> {
        self.start_watcher.execute().await
    }

    pub async fn stop_monitoring(&self) -> Result<(), ClipboardWatcherError> {
        self.stop_watcher.execute().await
    }

    /// Re-arms the detector after a fired change was handled outside
    /// [`change_handler`](Self::change_handler).
    pub async fn done_processing(&self) -> Result<(), WatcherControlError> {
        self.watcher_control.done_processing().await
    }

    pub async fn execute(&self, command: SlotCommand) -> Result<()> {
        self.commands.execute(command).await
    }

    /// Handler to register with the platform runtime.
    pub fn change_handler(&self) -> Arc<dyn ClipboardChangeHandler> {
        self.change_handler.clone()
    }

    pub fn store(&self) -> &Arc<SlotStore> {
        &self.store
    }

    pub fn queue(&self) -> &IngestionQueue {
        &self.queue
    }

    pub fn sweeper(&self) -> &Arc<ExpirySweeper> {
        &self.sweeper
    }
}
