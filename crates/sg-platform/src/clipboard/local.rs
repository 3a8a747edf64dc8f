use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat, RustImageData};
use sg_core::ports::{ClipboardFile, ClipboardReaderPort, ClipboardWriterPort, ContentHashPort};
use sg_core::{ClipboardFormats, ContentHash};
use tokio::task::spawn_blocking;
use tracing::{debug, warn};

use super::uri::file_entry_to_path;

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!("{}", e))
}

/// Fingerprint of the last content this process put on the clipboard.
#[derive(Debug, Clone, PartialEq)]
struct SelfWriteMarker {
    formats: ClipboardFormats,
    text_hash: Option<ContentHash>,
}

/// Own writes in flight plus the fingerprint of the last finished one.
///
/// The OS change notification for a write can arrive before the write call
/// returns, so ownership is claimed from [`SelfWriteTracker::begin`] on.
#[derive(Debug, Default)]
struct SelfWriteTracker {
    in_flight: AtomicUsize,
    marker: Mutex<Option<SelfWriteMarker>>,
}

impl SelfWriteTracker {
    fn begin(&self) -> PendingWrite<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        PendingWrite { tracker: self }
    }

    fn is_writing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    fn set_marker(&self, marker: Option<SelfWriteMarker>) {
        match self.marker.lock() {
            Ok(mut slot) => *slot = marker,
            Err(_) => warn!("self-write marker lock poisoned"),
        }
    }

    fn marker(&self) -> Option<SelfWriteMarker> {
        self.marker.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Holds ownership of the clipboard until the write is fingerprinted.
struct PendingWrite<'a> {
    tracker: &'a SelfWriteTracker,
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// System clipboard through `clipboard-rs`.
///
/// The OS gives no portable owner query, so ownership is inferred: the
/// clipboard counts as self-owned while a write is in flight, and afterwards
/// while it still matches the remembered formats (and text hash).
pub struct LocalClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
    hasher: Arc<dyn ContentHashPort>,
    self_write: SelfWriteTracker,
}

impl LocalClipboard {
    pub fn new(hasher: Arc<dyn ContentHashPort>) -> Result<Self> {
        #[cfg(target_os = "linux")]
        let context = {
            use clipboard_rs::ClipboardContextX11Options;
            ClipboardContext::new_with_options(ClipboardContextX11Options { read_timeout: None })
        };
        #[cfg(not(target_os = "linux"))]
        let context = ClipboardContext::new();

        let context = map_clipboard_err(context).context("create clipboard context failed")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
            hasher,
            self_write: SelfWriteTracker::default(),
        })
    }

    async fn with_ctx<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ClipboardContext) -> Result<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        spawn_blocking(move || {
            let mut ctx = inner
                .lock()
                .map_err(|_| anyhow!("clipboard context lock poisoned"))?;
            f(&mut *ctx)
        })
        .await
        .context("clipboard task panicked")?
    }

    fn hash_text(&self, text: &str) -> Option<ContentHash> {
        self.hasher.hash_bytes(text.as_bytes()).ok()
    }

    async fn remember_write(&self, text_hash: Option<ContentHash>) {
        match self.formats().await {
            Ok(formats) => self
                .self_write
                .set_marker(Some(SelfWriteMarker { formats, text_hash })),
            Err(err) => {
                debug!(error = %err, "Could not fingerprint own clipboard write");
                self.self_write.set_marker(None);
            }
        }
    }
}

#[async_trait]
impl ClipboardReaderPort for LocalClipboard {
    async fn formats(&self) -> Result<ClipboardFormats> {
        self.with_ctx(|ctx| {
            let available = map_clipboard_err(ctx.available_formats())?;
            Ok(ClipboardFormats::from_list(available))
        })
        .await
    }

    async fn is_local_owner(&self) -> Result<bool> {
        if self.self_write.is_writing() {
            return Ok(true);
        }
        let Some(marker) = self.self_write.marker() else {
            return Ok(false);
        };

        let formats = self.formats().await?;
        let still_ours = formats == marker.formats
            && match &marker.text_hash {
                Some(expected) => {
                    let current = self.read_text().await?;
                    current.as_deref().and_then(|t| self.hash_text(t)).as_ref() == Some(expected)
                }
                None => true,
            };

        if !still_ours {
            self.self_write.set_marker(None);
        }
        Ok(still_ours)
    }

    async fn read_text(&self) -> Result<Option<String>> {
        self.with_ctx(|ctx| {
            if !ctx.has(ContentFormat::Text) {
                return Ok(None);
            }
            map_clipboard_err(ctx.get_text()).map(Some)
        })
        .await
    }

    async fn read_image(&self) -> Result<Option<Vec<u8>>> {
        self.with_ctx(|ctx| {
            if !ctx.has(ContentFormat::Image) {
                return Ok(None);
            }
            let image = map_clipboard_err(ctx.get_image())?;
            let png = map_clipboard_err(image.to_png())?;
            Ok(Some(png.get_bytes().to_vec()))
        })
        .await
    }

    async fn read_files(&self) -> Result<Vec<ClipboardFile>> {
        let entries = self
            .with_ctx(|ctx| {
                if !ctx.has(ContentFormat::Files) {
                    return Ok(Vec::new());
                }
                map_clipboard_err(ctx.get_files())
            })
            .await?;

        spawn_blocking(move || {
            entries
                .iter()
                .filter_map(|entry| file_entry_to_path(entry))
                .filter_map(|path| match read_clipboard_file(&path) {
                    Ok(file) => Some(file),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "Skipping unreadable copied file");
                        None
                    }
                })
                .collect::<Vec<_>>()
        })
        .await
        .context("file read task panicked")
    }
}

fn read_clipboard_file(path: &Path) -> Result<ClipboardFile> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = image::ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type().to_string());
    Ok(ClipboardFile {
        name,
        content_type,
        bytes,
    })
}

#[async_trait]
impl ClipboardWriterPort for LocalClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let _pending = self.self_write.begin();
        let owned = text.to_string();
        self.with_ctx(move |ctx| map_clipboard_err(ctx.set_text(owned)))
            .await
            .context("write text to clipboard failed")?;
        self.remember_write(self.hash_text(text)).await;
        Ok(())
    }

    async fn write_image(&self, png_bytes: &[u8]) -> Result<()> {
        let _pending = self.self_write.begin();
        let bytes = png_bytes.to_vec();
        self.with_ctx(move |ctx| {
            let image = map_clipboard_err(RustImageData::from_bytes(&bytes))?;
            map_clipboard_err(ctx.set_image(image))
        })
        .await
        .context("write image to clipboard failed")?;
        self.remember_write(None).await;
        Ok(())
    }
}
