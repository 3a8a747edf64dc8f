//! In-memory port fakes shared by the unit tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::broadcast;

use sg_core::ports::{
    CanonicalImage, ClipboardWriterPort, ClockPort, ContentHashPort, ImageCodecPort, NotifierPort,
    PayloadCachePort, SettingsPort, SlotRendererPort, SlotRepositoryPort, UserNotification,
    WatcherControlError, WatcherControlPort,
};
use sg_core::settings::SettingsChange;
use sg_core::slot::PersistedSlot;
use sg_core::{CapturedItem, ContentHash, Settings, Slot};

use crate::store::SlotStore;

pub const T0: i64 = 1_700_000_000;

pub struct TestClock {
    secs: AtomicI64,
}

impl TestClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn now(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl ClockPort for TestClock {
    fn now_ms(&self) -> i64 {
        self.now() * 1000
    }
}

/// Digest = the first 32 input bytes, zero padded.
pub struct PrefixHasher;

impl ContentHashPort for PrefixHasher {
    fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentHash> {
        let mut digest = [0u8; 32];
        for (out, byte) in digest.iter_mut().zip(bytes) {
            *out = *byte;
        }
        Ok(ContentHash::from_digest(&digest))
    }
}

/// Accepts bytes starting with `IMG` and "re-encodes" them to upper case.
/// Only `png` and `jpeg` survive as extensions.
pub struct UppercaseCodec;

impl ImageCodecPort for UppercaseCodec {
    fn canonicalize(&self, bytes: &[u8], preferred_extension: &str) -> Result<CanonicalImage> {
        if !bytes.starts_with(b"IMG") {
            bail!("not an image");
        }
        let extension = match preferred_extension {
            "jpeg" | "png" => preferred_extension,
            _ => "png",
        };
        Ok(CanonicalImage {
            bytes: bytes.to_ascii_uppercase(),
            extension: extension.to_string(),
        })
    }
}

pub fn text_item(text: &str) -> CapturedItem {
    let hash = PrefixHasher.hash_bytes(text.as_bytes()).unwrap();
    CapturedItem::text(text.to_string(), hash)
}

pub fn image_item(bytes: &[u8]) -> CapturedItem {
    let hash = PrefixHasher.hash_bytes(bytes).unwrap();
    CapturedItem::image(bytes.to_vec(), hash)
}

#[derive(Default)]
pub struct MemorySlotRepo {
    pub stored: Mutex<Vec<PersistedSlot>>,
    pub saves: AtomicUsize,
    pub fail_saves: AtomicBool,
}

impl MemorySlotRepo {
    pub fn with_entries(entries: Vec<PersistedSlot>) -> Self {
        Self {
            stored: Mutex::new(entries),
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Vec<PersistedSlot> {
        self.stored.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SlotRepositoryPort for MemorySlotRepo {
    async fn load_slots(&self) -> Result<Vec<PersistedSlot>> {
        Ok(self.stored())
    }

    async fn save_slots(&self, slots: &[PersistedSlot]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        *self.stored.lock().unwrap() = slots.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub writes: AtomicUsize,
}

impl MemoryCache {
    pub fn put(&self, name: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
    }

    pub fn has(&self, name: &str) -> bool {
        self.files.lock().unwrap().contains_key(name)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayloadCachePort for MemoryCache {
    async fn contains(&self, file_name: &str) -> Result<bool> {
        Ok(self.has(file_name))
    }

    async fn write_if_absent(&self, file_name: &str, bytes: &[u8]) -> Result<bool> {
        if self.has(file_name) {
            return Ok(false);
        }
        self.put(file_name, bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        match self.files.lock().unwrap().get(file_name) {
            Some(bytes) => Ok(bytes.clone()),
            None => bail!("{file_name} not cached"),
        }
    }

    async fn remove(&self, file_name: &str) -> Result<bool> {
        Ok(self.files.lock().unwrap().remove(file_name).is_some())
    }

    fn path_of(&self, file_name: &str) -> PathBuf {
        PathBuf::from("/cache").join(file_name)
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub updates: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub last: Mutex<Vec<Slot>>,
}

impl RecordingRenderer {
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SlotRendererPort for RecordingRenderer {
    async fn update_slots(&self, slots: &[Slot]) -> Result<()> {
        *self.last.lock().unwrap() = slots.to_vec();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn refresh_grid(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<UserNotification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<UserNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    async fn notify(&self, notification: UserNotification) -> Result<()> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Written {
    Text(String),
    Image(Vec<u8>),
}

#[derive(Default)]
pub struct RecordingWriter {
    pub written: Mutex<Vec<Written>>,
}

impl RecordingWriter {
    pub fn written(&self) -> Vec<Written> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardWriterPort for RecordingWriter {
    async fn write_text(&self, text: &str) -> Result<()> {
        self.written.lock().unwrap().push(Written::Text(text.to_string()));
        Ok(())
    }

    async fn write_image(&self, png_bytes: &[u8]) -> Result<()> {
        self.written
            .lock()
            .unwrap()
            .push(Written::Image(png_bytes.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherCall {
    Start,
    Stop,
    DoneProcessing,
}

#[derive(Default)]
pub struct RecordingWatcher {
    pub calls: Mutex<Vec<WatcherCall>>,
}

impl RecordingWatcher {
    pub fn calls(&self) -> Vec<WatcherCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: WatcherCall) -> Result<(), WatcherControlError> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl WatcherControlPort for RecordingWatcher {
    async fn start_watcher(&self) -> Result<(), WatcherControlError> {
        self.record(WatcherCall::Start)
    }

    async fn stop_watcher(&self) -> Result<(), WatcherControlError> {
        self.record(WatcherCall::Stop)
    }

    async fn done_processing(&self) -> Result<(), WatcherControlError> {
        self.record(WatcherCall::DoneProcessing)
    }
}

pub struct MemorySettings {
    current: Mutex<Settings>,
    changes: broadcast::Sender<SettingsChange>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            current: Mutex::new(settings),
            changes,
        }
    }

    pub fn current(&self) -> Settings {
        self.current.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettingsPort for MemorySettings {
    async fn load(&self) -> Result<Settings> {
        Ok(self.current())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let keys = {
            let mut current = self.current.lock().unwrap();
            let keys = current.changed_keys(settings);
            *current = settings.clone();
            keys
        };
        if !keys.is_empty() {
            let _ = self.changes.send(SettingsChange {
                keys,
                settings: settings.clone(),
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}

/// A store wired to in-memory fakes.
pub struct StoreFixture {
    pub store: Arc<SlotStore>,
    pub repo: Arc<MemorySlotRepo>,
    pub cache: Arc<MemoryCache>,
    pub clock: Arc<TestClock>,
    pub renderer: Arc<RecordingRenderer>,
}

impl StoreFixture {
    pub fn new(settings: &Settings) -> Self {
        Self::with_repo(settings, MemorySlotRepo::default())
    }

    pub fn with_repo(settings: &Settings, repo: MemorySlotRepo) -> Self {
        let repo = Arc::new(repo);
        let cache = Arc::new(MemoryCache::default());
        let clock = Arc::new(TestClock::at(T0));
        let renderer = Arc::new(RecordingRenderer::default());
        let store = Arc::new(SlotStore::new(
            repo.clone(),
            cache.clone(),
            Arc::new(PrefixHasher),
            clock.clone(),
            renderer.clone(),
            settings,
        ));
        Self {
            store,
            repo,
            cache,
            clock,
            renderer,
        }
    }

    /// Texts of the stored slots, `""` for empty or file slots.
    pub async fn texts(&self) -> Vec<String> {
        self.store
            .snapshot()
            .await
            .iter()
            .map(|slot| slot.text().to_string())
            .collect()
    }
}

pub fn settings_with_slots(count: u32) -> Settings {
    Settings {
        number_slots: count,
        ..Settings::default()
    }
}
