use anyhow::Context;
use tracing::{debug, info};

use serigy_lib::bootstrap::{default_config_path, init_tracing_subscriber, load_config, run_app};
use sg_core::ports::AppDirsPort;
use sg_core::AppConfig;
use sg_platform::app_dirs::DirsAppDirsAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = default_config_path();
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    let dirs = DirsAppDirsAdapter::with_overrides(config.data_dir.clone(), config.cache_dir.clone())
        .get_app_dirs()
        .context("failed to resolve application directories")?;

    let logs_dir = config.log_to_file.then(|| dirs.logs_dir());
    init_tracing_subscriber(logs_dir.as_deref())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Serigy starting");
    debug!(
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = ?config_path,
        "System info"
    );

    run_app(config, dirs).await
}
