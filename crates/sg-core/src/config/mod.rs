//! Bootstrap configuration DTO.
//!
//! Maps the optional `config.toml` onto plain data. Absent keys fall back to
//! the documented defaults; values are taken as written, without range checks.

use std::path::PathBuf;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_REMOVAL_TRANSITION_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Fallback clipboard poll period
    pub poll_interval_ms: u64,

    /// Expiry sweep tick period
    pub sweep_interval_secs: u64,

    /// Delay between a slot removal and the compaction it may trigger
    pub removal_transition_ms: u64,

    /// Overrides the platform data directory (settings, slots, logs)
    pub data_dir: Option<PathBuf>,

    /// Overrides the platform cache directory (payload cache)
    pub cache_dir: Option<PathBuf>,

    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            removal_transition_ms: DEFAULT_REMOVAL_TRANSITION_MS,
            data_dir: None,
            cache_dir: None,
            log_to_file: true,
        }
    }
}

impl AppConfig {
    /// Reads `[monitor]`, `[history]`, `[storage]` and `[logging]` tables.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let int = |table: &str, key: &str, fallback: u64| -> u64 {
            toml_value
                .get(table)
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(fallback)
        };
        let path = |key: &str| -> Option<PathBuf> {
            toml_value
                .get("storage")
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        };

        Ok(Self {
            poll_interval_ms: int("monitor", "poll_interval_ms", defaults.poll_interval_ms),
            sweep_interval_secs: int("history", "sweep_interval_secs", defaults.sweep_interval_secs),
            removal_transition_ms: int(
                "history",
                "removal_transition_ms",
                defaults.removal_transition_ms,
            ),
            data_dir: path("data_dir"),
            cache_dir: path("cache_dir"),
            log_to_file: toml_value
                .get("logging")
                .and_then(|l| l.get("file"))
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.log_to_file),
        })
    }
}
