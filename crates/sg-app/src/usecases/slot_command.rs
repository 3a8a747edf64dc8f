//! Enum-keyed dispatch for user actions on slots.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info_span, warn, Instrument};

use sg_core::ports::SettingsPort;

use super::RestoreSlotToClipboard;
use crate::store::SlotStore;

/// Every action a collaborator can request on the slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCommand {
    Pin(usize),
    Unpin(usize),
    TogglePin(usize),
    Remove(usize),
    ClearUnpinned,
    Arrange,
    Restore(usize),
    ToggleIncognito,
}

impl SlotCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SlotCommand::Pin(_) => "pin",
            SlotCommand::Unpin(_) => "unpin",
            SlotCommand::TogglePin(_) => "toggle_pin",
            SlotCommand::Remove(_) => "remove",
            SlotCommand::ClearUnpinned => "clear_unpinned",
            SlotCommand::Arrange => "arrange",
            SlotCommand::Restore(_) => "restore",
            SlotCommand::ToggleIncognito => "toggle_incognito",
        }
    }
}

/// Runs [`SlotCommand`]s against the store.
///
/// A removal with auto-arrange on is completed after `removal_transition`,
/// so several quick removals compact once.
pub struct ExecuteSlotCommand {
    store: Arc<SlotStore>,
    restore: RestoreSlotToClipboard,
    settings: Arc<dyn SettingsPort>,
    removal_transition: Duration,
}

impl ExecuteSlotCommand {
    pub fn new(
        store: Arc<SlotStore>,
        restore: RestoreSlotToClipboard,
        settings: Arc<dyn SettingsPort>,
        removal_transition: Duration,
    ) -> Self {
        Self {
            store,
            restore,
            settings,
            removal_transition,
        }
    }

    pub async fn execute(&self, command: SlotCommand) -> Result<()> {
        let span = info_span!("usecase.slot_command.execute", command = command.name());
        async {
            match command {
                SlotCommand::Pin(index) => {
                    self.store.pin(index).await?;
                }
                SlotCommand::Unpin(index) => {
                    self.store.unpin(index).await?;
                }
                SlotCommand::TogglePin(index) => {
                    self.store.toggle_pin(index).await?;
                }
                SlotCommand::Remove(index) => {
                    if self.store.remove(index).await? {
                        self.schedule_removal_completion();
                    }
                }
                SlotCommand::ClearUnpinned => {
                    self.store.clear_unpinned().await?;
                }
                SlotCommand::Arrange => {
                    self.store.arrange().await?;
                }
                SlotCommand::Restore(index) => {
                    self.restore.execute(index).await?;
                }
                SlotCommand::ToggleIncognito => {
                    let mut settings = self
                        .settings
                        .load()
                        .await
                        .context("failed to load settings")?;
                    settings.incognito_mode = !settings.incognito_mode;
                    debug!(incognito = settings.incognito_mode, "Toggling incognito mode");
                    self.settings.save(&settings).await?;
                }
            }
            Ok(())
        }
        .instrument(span)
        .await
    }

    fn schedule_removal_completion(&self) {
        let store = Arc::clone(&self.store);
        let delay = self.removal_transition;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = store.complete_removal().await {
                warn!(error = %err, "Failed to arrange slots after removal");
            }
        });
    }
}
