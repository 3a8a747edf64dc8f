//! # Configuration Loader
//!
//! Reads the optional `config.toml` into [`AppConfig`]. The file holds
//! bootstrap knobs only (poll period, sweep period, directory overrides);
//! user-facing settings live in `settings.json`.
//!
//! Lookup order:
//! 1. `$SERIGY_CONFIG`
//! 2. `<config dir>/serigy/config.toml`
//!
//! A missing file yields defaults. An unreadable or malformed one is an error.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sg_core::config::AppConfig;
use tracing::debug;

pub const CONFIG_ENV: &str = "SERIGY_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the bootstrap config is looked up.
pub fn default_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join("serigy").join(CONFIG_FILE_NAME)),
    }
}

/// Load configuration from a TOML file, or defaults when it does not exist.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))
        }
    };
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}
