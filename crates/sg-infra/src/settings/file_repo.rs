use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sg_core::ports::SettingsPort;
use sg_core::settings::model::{Settings, SettingsChange, CURRENT_SCHEMA_VERSION};
use tokio::fs;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::fs::atomic_write;
use crate::settings::migration::SettingsMigrator;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// JSON settings file with schema migration and change notifications.
pub struct FileSettingsRepository {
    path: PathBuf,
    last_known: Mutex<Option<Settings>>,
    changes: broadcast::Sender<SettingsChange>,
}

impl FileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            last_known: Mutex::new(None),
            changes,
        }
    }

    async fn read_from_disk(&self) -> Result<Option<Settings>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read settings failed: {}", self.path.display()))
            }
        };
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("parse settings failed: {}", self.path.display()))?;
        Ok(Some(settings))
    }

    async fn write(&self, settings: &Settings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("serialize settings failed")?;
        atomic_write(&self.path, content.as_bytes()).await
    }
}

#[async_trait]
impl SettingsPort for FileSettingsRepository {
    /// Missing file yields defaults; older schemas are migrated and re-saved.
    async fn load(&self) -> Result<Settings> {
        let settings = match self.read_from_disk().await? {
            Some(settings) => settings,
            None => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                Settings::default()
            }
        };

        let original_version = settings.schema_version;
        let migrated = SettingsMigrator::new().migrate_to_latest(settings);
        if original_version < CURRENT_SCHEMA_VERSION {
            info!(
                from_version = original_version,
                to_version = CURRENT_SCHEMA_VERSION,
                "Migrated settings schema"
            );
            self.write(&migrated).await?;
        }

        *self.last_known.lock().await = Some(migrated.clone());
        Ok(migrated)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let mut last_known = self.last_known.lock().await;
        let previous = match last_known.clone() {
            Some(previous) => previous,
            None => self.read_from_disk().await.ok().flatten().unwrap_or_default(),
        };

        self.write(settings).await?;
        *last_known = Some(settings.clone());

        let keys = previous.changed_keys(settings);
        if !keys.is_empty() {
            debug!(?keys, "Settings changed");
            // No receivers is fine.
            let _ = self.changes.send(SettingsChange {
                keys,
                settings: settings.clone(),
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
