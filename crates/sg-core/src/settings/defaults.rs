use super::model::*;

pub const DEFAULT_SLOT_COUNT: u32 = 6;

impl Default for AutoClearInterval {
    fn default() -> Self {
        AutoClearInterval::ThirtyMinutes
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            number_slots: DEFAULT_SLOT_COUNT,
            auto_arrange: false,
            auto_clear_enabled: false,
            auto_clear_interval: AutoClearInterval::default(),
            incognito_mode: false,
            skip_duplicate_copy: true,
            legacy_auto_clear_minutes: None,
        }
    }
}
