use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sg_core::ports::SettingsPort;

use crate::store::SlotStore;

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Auto-clear is off; the periodic task stops itself.
    Disabled,
    Expired(usize),
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Periodic auto-clear of old unpinned slots.
///
/// Settings are re-read on every tick, so the age threshold follows the
/// current preset without a restart.
pub struct ExpirySweeper {
    store: Arc<SlotStore>,
    settings: Arc<dyn SettingsPort>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl ExpirySweeper {
    pub fn new(store: Arc<SlotStore>, settings: Arc<dyn SettingsPort>, period: Duration) -> Self {
        Self {
            store,
            settings,
            period,
            running: Mutex::new(None),
        }
    }

    pub async fn run_once(&self) -> Result<SweepOutcome> {
        let settings = self
            .settings
            .load()
            .await
            .context("failed to load settings for expiry sweep")?;
        if !settings.auto_clear_enabled {
            return Ok(SweepOutcome::Disabled);
        }

        let max_age = settings.auto_clear_interval.as_duration();
        let expired = self.store.expire(max_age).await?;
        if expired > 0 {
            info!(
                expired,
                max_age_minutes = settings.auto_clear_interval.minutes(),
                "Auto-clear emptied expired slots"
            );
        }
        Ok(SweepOutcome::Expired(expired))
    }

    /// Starts the periodic task, replacing a running one.
    ///
    /// The first sweep happens one period after the call.
    pub async fn start(self: &Arc<Self>) {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            previous.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let sweeper = Arc::clone(self);
        let token = cancel.clone();
        let handle = tokio::spawn(async move { sweeper.run_periodic(token).await });
        *running = Some(Running { cancel, handle });
        info!(period_secs = self.period.as_secs(), "Expiry sweeper started");
    }

    pub async fn stop(&self) {
        if let Some(running) = self.running.lock().await.take() {
            running.cancel.cancel();
            info!("Expiry sweeper stopped");
        }
    }

    /// Starts or stops to match `auto_clear_enabled`.
    pub async fn restart(self: &Arc<Self>, auto_clear_enabled: bool) {
        if auto_clear_enabled {
            self.start().await;
        } else {
            self.stop().await;
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    async fn run_periodic(&self, cancel: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.run_once().await {
                Ok(SweepOutcome::Disabled) => {
                    info!("Auto-clear disabled, expiry sweeper stopping");
                    break;
                }
                Ok(SweepOutcome::Expired(count)) => debug!(count, "Expiry sweep finished"),
                Err(err) => warn!(error = %err, "Expiry sweep failed"),
            }
        }
    }
}
