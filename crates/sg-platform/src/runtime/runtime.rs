use std::sync::Arc;
use std::time::Duration;

use sg_core::ports::ClipboardChangeHandler;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::event_bus::{PlatformCommandReceiver, PlatformEventReceiver, PlatformEventSender};
use crate::clipboard::ChangeSignalSource;
use crate::detector::{ChangeDetector, CheckOutcome, MonitorStatus, TriggerSource};
use crate::ipc::{PlatformCommand, PlatformEvent};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Single-task owner of the change detector.
///
/// Commands, OS signals and poll ticks are all handled on this one loop, so
/// checks never overlap. A fired change is handed to the registered
/// [`ClipboardChangeHandler`] on its own task; the detector stays suspended
/// until a [`PlatformCommand::DoneProcessing`] arrives, or the handler task
/// panics.
pub struct PlatformRuntime {
    detector: ChangeDetector,
    signal_source: Box<dyn ChangeSignalSource>,
    event_tx: PlatformEventSender,
    event_rx: PlatformEventReceiver,
    command_rx: PlatformCommandReceiver,
    poll_interval: Duration,
    poll: Option<Interval>,
    clipboard_handler: Option<Arc<dyn ClipboardChangeHandler>>,
    status_tx: watch::Sender<MonitorStatus>,
    shutting_down: bool,
}

impl PlatformRuntime {
    pub fn new(
        detector: ChangeDetector,
        signal_source: Box<dyn ChangeSignalSource>,
        event_tx: PlatformEventSender,
        event_rx: PlatformEventReceiver,
        command_rx: PlatformCommandReceiver,
        clipboard_handler: Option<Arc<dyn ClipboardChangeHandler>>,
    ) -> Self {
        let (status_tx, _) = watch::channel(detector.status());
        Self {
            detector,
            signal_source,
            event_tx,
            event_rx,
            command_rx,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll: None,
            clipboard_handler,
            status_tx,
            shutting_down: false,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the clipboard change handler after construction.
    pub fn set_clipboard_handler(&mut self, handler: Arc<dyn ClipboardChangeHandler>) {
        self.clipboard_handler = Some(handler);
    }

    /// Subscribe to detector state, updated after every transition.
    pub fn status(&self) -> watch::Receiver<MonitorStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(mut self) {
        info!(poll_ms = self.poll_interval.as_millis() as u64, "Platform runtime started");
        while !self.shutting_down {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        debug!("Command channel closed");
                        self.shutting_down = true;
                    }
                },
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event).await;
                }
                _ = next_poll(&mut self.poll) => {
                    self.run_check(TriggerSource::Poll).await;
                }
            }
        }
        self.stop_watching();
        info!("Platform runtime stopped");
    }

    async fn handle_command(&mut self, cmd: PlatformCommand) {
        match cmd {
            PlatformCommand::StartClipboardWatcher => {
                debug!("StartClipboardWatcher command received");
                self.start_watching().await;
            }
            PlatformCommand::StopClipboardWatcher => {
                debug!("StopClipboardWatcher command received");
                self.stop_watching();
            }
            PlatformCommand::DoneProcessing => {
                let outcome = self.detector.done_processing().await;
                self.after_check(outcome);
            }
            PlatformCommand::Shutdown => {
                info!("Platform runtime shutting down");
                self.shutting_down = true;
            }
        }
    }

    async fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::ClipboardSignaled => {
                self.run_check(TriggerSource::OsEvent).await;
            }
            PlatformEvent::SignalSourceFailed { message } => {
                warn!(%message, "Clipboard notifications unavailable, relying on polling");
            }
            PlatformEvent::ChangeHandlerAborted => self.recover_aborted_handler().await,
        }
    }

    /// Treats an aborted handler as done so the detector leaves suspension.
    async fn recover_aborted_handler(&mut self) {
        warn!("Clipboard change handler aborted, re-arming detector");
        let outcome = self.detector.done_processing().await;
        self.after_check(outcome);
    }

    async fn start_watching(&mut self) {
        if !self.detector.start().await {
            debug!("Clipboard watcher already running, skipping start");
            return;
        }

        if let Err(err) = self.signal_source.subscribe(self.event_tx.clone()) {
            warn!(error = %err, "Failed to subscribe to clipboard notifications");
        }

        let mut poll = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.poll = Some(poll);

        self.publish_status();
        info!("Clipboard watcher started");
    }

    fn stop_watching(&mut self) {
        self.signal_source.unsubscribe();
        self.poll = None;
        if self.detector.stop() {
            info!("Clipboard watcher stopped");
        } else {
            debug!("Clipboard watcher already stopped");
        }
        self.publish_status();
    }

    async fn run_check(&mut self, source: TriggerSource) {
        let outcome = self.detector.check(source).await;
        // Signals that queued up during the check are covered by it.
        let mut handler_aborted = false;
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                PlatformEvent::ClipboardSignaled => {}
                PlatformEvent::SignalSourceFailed { message } => {
                    warn!(%message, "Clipboard notifications unavailable, relying on polling");
                }
                PlatformEvent::ChangeHandlerAborted => handler_aborted = true,
            }
        }
        self.after_check(outcome);
        if handler_aborted {
            self.recover_aborted_handler().await;
        }
    }

    fn after_check(&mut self, outcome: CheckOutcome) {
        if outcome == CheckOutcome::Fired {
            self.dispatch_change();
        }
        self.publish_status();
    }

    fn dispatch_change(&mut self) {
        let Some(handler) = self.clipboard_handler.clone() else {
            warn!("Clipboard changed but no handler registered");
            // Nobody will call done_processing.
            self.detector.rearm();
            return;
        };
        let events = self.event_tx.clone();
        tokio::spawn(async move {
            // Own task so a panicking handler cannot leave the detector suspended.
            match tokio::spawn(async move { handler.on_clipboard_changed().await }).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Failed to handle clipboard change"),
                Err(e) => {
                    error!(error = %e, "Clipboard change handler panicked");
                    if events.send(PlatformEvent::ChangeHandlerAborted).await.is_err() {
                        debug!("Runtime gone before handler abort could be reported");
                    }
                }
            }
        });
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(self.detector.status());
    }
}

async fn next_poll(poll: &mut Option<Interval>) {
    match poll {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
