use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::settings::model::{Settings, SettingsChange};

#[async_trait]
pub trait SettingsPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<Settings>;

    /// Persists and, if anything changed, notifies subscribers.
    async fn save(&self, settings: &Settings) -> anyhow::Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;
}

pub trait SettingsMigrationPort: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, settings: Settings) -> Settings;
}
