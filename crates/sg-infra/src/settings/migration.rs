use sg_core::ports::SettingsMigrationPort;
use sg_core::settings::model::{AutoClearInterval, Settings, CURRENT_SCHEMA_VERSION};
use tracing::warn;

/// Maps the free-form `auto_clear_minutes` of v1 onto a preset.
pub struct MigrationV1ToV2;

impl SettingsMigrationPort for MigrationV1ToV2 {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        2
    }

    fn migrate(&self, mut settings: Settings) -> Settings {
        if let Some(minutes) = settings.legacy_auto_clear_minutes.take() {
            settings.auto_clear_interval = AutoClearInterval::at_least_minutes(minutes);
        }
        settings.schema_version = self.to_version();
        settings
    }
}

pub struct SettingsMigrator {
    migrations: Vec<Box<dyn SettingsMigrationPort>>,
}

impl SettingsMigrator {
    pub fn new() -> Self {
        Self {
            migrations: vec![Box::new(MigrationV1ToV2)],
        }
    }

    pub fn migrate_to_latest(&self, mut settings: Settings) -> Settings {
        while settings.schema_version < CURRENT_SCHEMA_VERSION {
            let current = settings.schema_version;
            match self.migrations.iter().find(|m| m.from_version() == current) {
                Some(migration) => settings = migration.migrate(settings),
                None => {
                    warn!(
                        from_version = current,
                        "No settings migration registered, keeping values as read"
                    );
                    settings.schema_version = CURRENT_SCHEMA_VERSION;
                }
            }
        }
        settings
    }
}

impl Default for SettingsMigrator {
    fn default() -> Self {
        Self::new()
    }
}
