use std::sync::Arc;

use sg_core::ports::{ClipboardReaderPort, ContentHashPort};
use sg_core::{ClipboardFormats, ContentHash};
use tracing::{debug, trace, warn};

use super::state::{DetectorState, MonitorStatus, TriggerSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Content changed; the detector is now suspended.
    Fired,
    Unchanged,
    /// The current content was written by this process.
    SelfOwned,
    /// Not armed (idle, suspended or already checking).
    Ignored,
    /// The clipboard could not be read.
    Failed,
}

#[derive(Debug, Clone, Default)]
struct Baseline {
    formats: ClipboardFormats,
    text_hash: Option<ContentHash>,
}

/// Format-first, hash-fallback change detector.
///
/// Cheap format descriptor comparison is authoritative; text is only read
/// and hashed when the descriptor is unchanged and advertises text. Images
/// and files are never read here.
///
/// Not internally synchronized: the owner drives it from a single task,
/// which is what guarantees at most one check in flight.
pub struct ChangeDetector {
    clipboard: Arc<dyn ClipboardReaderPort>,
    hasher: Arc<dyn ContentHashPort>,
    state: DetectorState,
    baseline: Baseline,
}

impl ChangeDetector {
    pub fn new(clipboard: Arc<dyn ClipboardReaderPort>, hasher: Arc<dyn ContentHashPort>) -> Self {
        Self {
            clipboard,
            hasher,
            state: DetectorState::Idle,
            baseline: Baseline::default(),
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            state: self.state,
            last_known_formats: self.baseline.formats.clone(),
            last_content_hash: self.baseline.text_hash.clone(),
            is_monitoring: self.state != DetectorState::Idle,
            is_processing: self.state == DetectorState::Suspended,
        }
    }

    /// Records the current clipboard as the baseline and arms.
    ///
    /// Returns `false` if already started.
    pub async fn start(&mut self) -> bool {
        if self.state != DetectorState::Idle {
            debug!(state = self.state.as_str(), "Detector already started");
            return false;
        }

        self.state = DetectorState::CapturingInitial;
        self.baseline = Baseline::default();
        match self.clipboard.formats().await {
            Ok(formats) => {
                let text_hash = self.text_hash(&formats).await;
                self.baseline = Baseline { formats, text_hash };
            }
            Err(err) => {
                warn!(error = %err, "Failed to capture initial clipboard baseline");
            }
        }
        self.state = DetectorState::Armed;
        debug!(formats = %self.baseline.formats, "Detector armed");
        true
    }

    /// Returns to `Idle` from any state. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if self.state == DetectorState::Idle {
            return false;
        }
        self.state = DetectorState::Idle;
        self.baseline = Baseline::default();
        debug!("Detector stopped");
        true
    }

    /// Evaluates one trigger. Only acts when armed.
    pub async fn check(&mut self, source: TriggerSource) -> CheckOutcome {
        if self.state != DetectorState::Armed {
            trace!(
                state = self.state.as_str(),
                source = source.as_str(),
                "Trigger collapsed"
            );
            return CheckOutcome::Ignored;
        }

        self.state = DetectorState::CheckingChange;
        let outcome = self.evaluate().await;
        self.state = if outcome == CheckOutcome::Fired {
            DetectorState::Suspended
        } else {
            DetectorState::Armed
        };

        if outcome == CheckOutcome::Fired {
            debug!(
                source = source.as_str(),
                formats = %self.baseline.formats,
                "Clipboard change detected"
            );
        }
        outcome
    }

    /// Re-arms after a fired change and immediately re-checks against the
    /// baseline recorded when it fired, so a copy made while the consumer
    /// was busy is not lost.
    pub async fn done_processing(&mut self) -> CheckOutcome {
        if self.state != DetectorState::Suspended {
            debug!(
                state = self.state.as_str(),
                "done_processing without a pending change"
            );
            return CheckOutcome::Ignored;
        }
        self.state = DetectorState::Armed;
        self.check(TriggerSource::DoneProcessing).await
    }

    /// Leaves suspension without re-checking.
    pub fn rearm(&mut self) -> bool {
        if self.state != DetectorState::Suspended {
            return false;
        }
        self.state = DetectorState::Armed;
        true
    }

    async fn evaluate(&mut self) -> CheckOutcome {
        match self.clipboard.is_local_owner().await {
            Ok(true) => {
                self.refresh_baseline().await;
                return CheckOutcome::SelfOwned;
            }
            Ok(false) => {}
            Err(err) => debug!(error = %err, "Clipboard owner check failed"),
        }

        let formats = match self.clipboard.formats().await {
            Ok(formats) => formats,
            Err(err) => {
                warn!(error = %err, "Failed to read clipboard formats");
                return CheckOutcome::Failed;
            }
        };

        if formats != self.baseline.formats {
            let text_hash = self.text_hash(&formats).await;
            let cleared = formats.is_empty();
            self.baseline = Baseline { formats, text_hash };
            // An emptied clipboard is not a copy.
            return if cleared {
                CheckOutcome::Unchanged
            } else {
                CheckOutcome::Fired
            };
        }

        if formats.has_text() {
            if let Some(hash) = self.text_hash(&formats).await {
                if self.baseline.text_hash.as_ref() != Some(&hash) {
                    self.baseline.text_hash = Some(hash);
                    return CheckOutcome::Fired;
                }
            }
        }

        CheckOutcome::Unchanged
    }

    async fn refresh_baseline(&mut self) {
        if let Ok(formats) = self.clipboard.formats().await {
            let text_hash = self.text_hash(&formats).await;
            self.baseline = Baseline { formats, text_hash };
        }
    }

    async fn text_hash(&self, formats: &ClipboardFormats) -> Option<ContentHash> {
        if !formats.has_text() {
            return None;
        }
        match self.clipboard.read_text().await {
            Ok(Some(text)) if !text.is_empty() => self.hasher.hash_bytes(text.as_bytes()).ok(),
            Ok(_) => None,
            Err(err) => {
                debug!(error = %err, "Failed to read clipboard text");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use sg_core::ports::ClipboardFile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeClipboardState {
        formats: Vec<&'static str>,
        text: Option<String>,
        self_owned: bool,
    }

    #[derive(Default)]
    struct FakeClipboard {
        state: Mutex<FakeClipboardState>,
        text_reads: AtomicUsize,
    }

    impl FakeClipboard {
        fn set_text(&self, text: &str) {
            let mut state = self.state.lock().unwrap();
            state.formats = vec!["text/plain", "UTF8_STRING"];
            state.text = Some(text.to_string());
            state.self_owned = false;
        }

        fn set_image(&self) {
            let mut state = self.state.lock().unwrap();
            state.formats = vec!["image/png"];
            state.text = None;
            state.self_owned = false;
        }

        fn set_self_owned(&self, owned: bool) {
            self.state.lock().unwrap().self_owned = owned;
        }
    }

    #[async_trait]
    impl ClipboardReaderPort for FakeClipboard {
        async fn formats(&self) -> Result<ClipboardFormats> {
            Ok(ClipboardFormats::from_list(self.state.lock().unwrap().formats.iter()))
        }

        async fn is_local_owner(&self) -> Result<bool> {
            Ok(self.state.lock().unwrap().self_owned)
        }

        async fn read_text(&self) -> Result<Option<String>> {
            self.text_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.state.lock().unwrap().text.clone())
        }

        async fn read_image(&self) -> Result<Option<Vec<u8>>> {
            panic!("detector must not read images");
        }

        async fn read_files(&self) -> Result<Vec<ClipboardFile>> {
            panic!("detector must not read files");
        }
    }

    struct ByteLenHasher;

    impl ContentHashPort for ByteLenHasher {
        fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentHash> {
            let mut digest = [0u8; 32];
            for (i, b) in bytes.iter().enumerate() {
                digest[i % 32] ^= b.wrapping_add(i as u8);
            }
            Ok(ContentHash::from_digest(&digest))
        }
    }

    fn detector_with(clipboard: Arc<FakeClipboard>) -> ChangeDetector {
        ChangeDetector::new(clipboard, Arc::new(ByteLenHasher))
    }

    #[tokio::test]
    async fn start_records_baseline_without_firing() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("already here");
        let mut detector = detector_with(clipboard.clone());

        assert!(detector.start().await);
        assert_eq!(detector.state(), DetectorState::Armed);
        assert!(detector.status().last_content_hash.is_some());
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Unchanged);
        assert!(!detector.start().await);
    }

    #[tokio::test]
    async fn format_change_fires_and_suspends() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("a");
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_image();
        assert_eq!(detector.check(TriggerSource::OsEvent).await, CheckOutcome::Fired);
        assert_eq!(detector.state(), DetectorState::Suspended);
        assert!(detector.status().is_processing);

        clipboard.set_text("b");
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Ignored);
        assert_eq!(detector.state(), DetectorState::Suspended);
    }

    #[tokio::test]
    async fn same_formats_compare_text_hash() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("first");
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_text("first");
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Unchanged);

        clipboard.set_text("second");
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Fired);
    }

    #[tokio::test]
    async fn image_only_clipboard_is_never_read() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_image();
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        for _ in 0..3 {
            assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Unchanged);
        }
        assert_eq!(clipboard.text_reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn self_owned_content_is_skipped_and_adopted() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("mine?");
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_image();
        clipboard.set_self_owned(true);
        assert_eq!(detector.check(TriggerSource::OsEvent).await, CheckOutcome::SelfOwned);
        assert_eq!(detector.state(), DetectorState::Armed);

        clipboard.set_self_owned(false);
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Unchanged);
    }

    #[tokio::test]
    async fn done_processing_rearms_when_nothing_new() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_text("x");
        assert_eq!(detector.check(TriggerSource::OsEvent).await, CheckOutcome::Fired);
        assert_eq!(detector.done_processing().await, CheckOutcome::Unchanged);
        assert_eq!(detector.state(), DetectorState::Armed);
    }

    #[tokio::test]
    async fn copy_during_processing_fires_again() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_text("one");
        assert_eq!(detector.check(TriggerSource::OsEvent).await, CheckOutcome::Fired);

        clipboard.set_text("two");
        assert_eq!(detector.done_processing().await, CheckOutcome::Fired);
        assert_eq!(detector.state(), DetectorState::Suspended);
    }

    #[tokio::test]
    async fn done_processing_outside_suspension_is_ignored() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut detector = detector_with(clipboard);
        assert_eq!(detector.done_processing().await, CheckOutcome::Ignored);
        detector.start().await;
        assert_eq!(detector.done_processing().await, CheckOutcome::Ignored);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_disarms() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("a");
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.set_text("b");
        detector.check(TriggerSource::Poll).await;
        assert!(detector.stop());
        assert!(!detector.stop());
        assert_eq!(detector.status(), MonitorStatus::default());

        clipboard.set_text("c");
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Ignored);
    }

    #[tokio::test]
    async fn cleared_clipboard_does_not_fire() {
        let clipboard = Arc::new(FakeClipboard::default());
        clipboard.set_text("a");
        let mut detector = detector_with(clipboard.clone());
        detector.start().await;

        clipboard.state.lock().unwrap().formats.clear();
        assert_eq!(detector.check(TriggerSource::Poll).await, CheckOutcome::Unchanged);
    }
}
