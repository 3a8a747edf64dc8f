use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use sg_core::ports::SettingsPort;
use sg_core::settings::SettingsChange;
use sg_core::SettingsKey;

use crate::store::SlotStore;
use crate::sweeper::ExpirySweeper;
use crate::usecases::{StartClipboardWatcher, StopClipboardWatcher};

const ALL_KEYS: [SettingsKey; 6] = [
    SettingsKey::NumberSlots,
    SettingsKey::AutoArrange,
    SettingsKey::AutoClearEnabled,
    SettingsKey::AutoClearInterval,
    SettingsKey::IncognitoMode,
    SettingsKey::SkipDuplicateCopy,
];

/// Applies a settings change to the running engine.
///
/// | key | reaction |
/// |-----|----------|
/// | `number_slots` | resize the slot array |
/// | `auto_clear_*` | restart or stop the expiry sweeper |
/// | `incognito_mode` | stop (on) or start (off) clipboard monitoring |
/// | `auto_arrange` | compact when turned on |
///
/// Each reaction runs even if an earlier one failed.
pub struct ApplySettingsChange {
    settings: Arc<dyn SettingsPort>,
    store: Arc<SlotStore>,
    sweeper: Arc<ExpirySweeper>,
    start_watcher: StartClipboardWatcher,
    stop_watcher: StopClipboardWatcher,
}

impl ApplySettingsChange {
    pub fn new(
        settings: Arc<dyn SettingsPort>,
        store: Arc<SlotStore>,
        sweeper: Arc<ExpirySweeper>,
        start_watcher: StartClipboardWatcher,
        stop_watcher: StopClipboardWatcher,
    ) -> Self {
        Self {
            settings,
            store,
            sweeper,
            start_watcher,
            stop_watcher,
        }
    }

    pub async fn execute(&self, change: &SettingsChange) -> Result<()> {
        let span = info_span!("usecase.apply_settings_change.execute", keys = ?change.keys);
        async {
            let settings = &change.settings;
            self.store.apply_settings(settings).await;
            let mut failures = Vec::new();

            if change.touches(SettingsKey::NumberSlots) {
                if let Err(err) = self.store.resize(settings.slot_count()).await {
                    failures.push(err.context("resize slots"));
                }
            }

            if change.touches(SettingsKey::AutoClearEnabled)
                || change.touches(SettingsKey::AutoClearInterval)
            {
                self.sweeper.restart(settings.auto_clear_enabled).await;
            }

            if change.touches(SettingsKey::IncognitoMode) {
                let result = if settings.incognito_mode {
                    info!("Incognito mode on, pausing clipboard monitoring");
                    self.stop_watcher.execute().await
                } else {
                    info!("Incognito mode off, resuming clipboard monitoring");
                    self.start_watcher.execute().await
                };
                if let Err(err) = result {
                    failures.push(anyhow::Error::new(err));
                }
            }

            if change.touches(SettingsKey::AutoArrange) && settings.auto_arrange {
                if let Err(err) = self.store.arrange().await {
                    failures.push(err.context("arrange slots"));
                }
            }

            for err in &failures {
                warn!(error = %format!("{err:#}"), "Settings reaction failed");
            }
            match failures.into_iter().next() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
        .instrument(span)
        .await
    }

    /// Applies every broadcast change until `cancel` fires.
    ///
    /// If the receiver lagged behind, settings are reloaded and treated as
    /// entirely changed.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let mut changes = self.settings.subscribe();
        tokio::spawn(async move {
            loop {
                let change = tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = changes.recv() => received,
                };

                let change = match change {
                    Ok(change) => change,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed settings changes, reapplying all");
                        match self.settings.load().await {
                            Ok(settings) => SettingsChange {
                                keys: ALL_KEYS.to_vec(),
                                settings,
                            },
                            Err(err) => {
                                warn!(error = %err, "Failed to reload settings");
                                continue;
                            }
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Settings channel closed");
                        break;
                    }
                };

                // Failures are already logged per reaction.
                let _ = self.execute(&change).await;
            }
        })
    }
}
