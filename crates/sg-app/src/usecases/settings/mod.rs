mod apply_settings_change;

pub use apply_settings_change::ApplySettingsChange;
