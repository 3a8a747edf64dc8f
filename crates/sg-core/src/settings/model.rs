use std::time::Duration;

use serde::{Deserialize, Serialize};

/// v1 stored the auto-clear period as a free `auto_clear_minutes` number;
/// v2 stores one of the [`AutoClearInterval`] presets.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

pub const MIN_SLOTS: u32 = 1;
pub const MAX_SLOTS: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AutoClearInterval {
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl AutoClearInterval {
    pub const ALL: [AutoClearInterval; 5] = [
        AutoClearInterval::FiveMinutes,
        AutoClearInterval::FifteenMinutes,
        AutoClearInterval::ThirtyMinutes,
        AutoClearInterval::OneHour,
        AutoClearInterval::OneDay,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            AutoClearInterval::FiveMinutes => 5,
            AutoClearInterval::FifteenMinutes => 15,
            AutoClearInterval::ThirtyMinutes => 30,
            AutoClearInterval::OneHour => 60,
            AutoClearInterval::OneDay => 24 * 60,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.minutes()) * 60)
    }

    /// Smallest preset at least `minutes` long, capped at one day.
    pub fn at_least_minutes(minutes: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|preset| preset.minutes() >= minutes)
            .unwrap_or(AutoClearInterval::OneDay)
    }
}

/// User-facing settings persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Files written before versioning was introduced are v1.
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
    pub number_slots: u32,
    pub auto_arrange: bool,
    pub auto_clear_enabled: bool,
    pub auto_clear_interval: AutoClearInterval,
    pub incognito_mode: bool,
    pub skip_duplicate_copy: bool,

    /// Only present in v1 files; consumed by migration.
    #[serde(rename = "auto_clear_minutes", skip_serializing_if = "Option::is_none")]
    pub legacy_auto_clear_minutes: Option<u32>,
}

fn legacy_schema_version() -> u32 {
    1
}

impl Settings {
    /// Configured slot count clamped to the accepted range.
    pub fn slot_count(&self) -> usize {
        self.number_slots.clamp(MIN_SLOTS, MAX_SLOTS) as usize
    }

    /// Keys whose values differ between `self` and `newer`.
    pub fn changed_keys(&self, newer: &Settings) -> Vec<SettingsKey> {
        let mut keys = Vec::new();
        if self.slot_count() != newer.slot_count() {
            keys.push(SettingsKey::NumberSlots);
        }
        if self.auto_arrange != newer.auto_arrange {
            keys.push(SettingsKey::AutoArrange);
        }
        if self.auto_clear_enabled != newer.auto_clear_enabled {
            keys.push(SettingsKey::AutoClearEnabled);
        }
        if self.auto_clear_interval != newer.auto_clear_interval {
            keys.push(SettingsKey::AutoClearInterval);
        }
        if self.incognito_mode != newer.incognito_mode {
            keys.push(SettingsKey::IncognitoMode);
        }
        if self.skip_duplicate_copy != newer.skip_duplicate_copy {
            keys.push(SettingsKey::SkipDuplicateCopy);
        }
        keys
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    NumberSlots,
    AutoArrange,
    AutoClearEnabled,
    AutoClearInterval,
    IncognitoMode,
    SkipDuplicateCopy,
}

/// Broadcast whenever saved settings differ from the previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub keys: Vec<SettingsKey>,
    pub settings: Settings,
}

impl SettingsChange {
    pub fn touches(&self, key: SettingsKey) -> bool {
        self.keys.contains(&key)
    }
}
