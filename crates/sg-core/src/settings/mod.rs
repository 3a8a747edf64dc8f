pub mod defaults;
pub mod model;

pub use model::{
    AutoClearInterval, Settings, SettingsChange, SettingsKey, CURRENT_SCHEMA_VERSION, MAX_SLOTS,
    MIN_SLOTS,
};
