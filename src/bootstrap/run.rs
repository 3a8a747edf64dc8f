use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use sg_core::app_dirs::AppDirs;
use sg_core::AppConfig;
use sg_platform::ipc::PlatformCommand;

use super::wiring::wire_dependencies;

/// Runs the engine until Ctrl-C, then shuts down in order: monitoring,
/// background tasks, queued items, platform runtime.
pub async fn run_app(config: AppConfig, dirs: AppDirs) -> Result<()> {
    let app = wire_dependencies(&config, &dirs).await?;
    app.engine.start().await.context("failed to start clipboard engine")?;

    let mut status = app.monitor_status.clone();
    let status_log = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            debug!(state = current.state.as_str(), "Clipboard monitor state");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    app.engine.shutdown().await;
    if app
        .platform_commands
        .send(PlatformCommand::Shutdown)
        .await
        .is_err()
    {
        debug!("Platform runtime already stopped");
    }
    if let Err(err) = app.platform_runtime.await {
        warn!(error = %err, "Platform runtime ended abnormally");
    }
    status_log.abort();

    info!("Serigy stopped");
    Ok(())
}
