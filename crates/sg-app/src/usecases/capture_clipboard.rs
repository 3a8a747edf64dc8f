//! Use case for reading the clipboard into a [`CapturedItem`].

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use sg_core::clipboard::CaptureError;
use sg_core::ports::{
    ClipboardFile, ClipboardReaderPort, ContentHashPort, ImageCodecPort, NotifierPort,
    UserNotification,
};
use sg_core::{CapturedItem, ContentHash, ContentKind};

const FALLBACK_EXTENSION: &str = "png";

/// Reads the current clipboard and builds a typed, hashed item.
///
/// ## Behavior
/// - Picks image ▶ file ▶ text from the advertised formats
/// - Images and files are re-encoded through [`ImageCodecPort`] before
///   hashing, so identical pixels always produce the same hash
/// - Every call supersedes the previous one: an in-flight read is cancelled
///   and its result discarded
///
/// Nothing supported on the clipboard raises [`UserNotification::CopyFailed`];
/// an undecodable copied file raises [`UserNotification::InvalidClipboardFormat`].
pub struct CaptureClipboard {
    clipboard: Arc<dyn ClipboardReaderPort>,
    hasher: Arc<dyn ContentHashPort>,
    codec: Arc<dyn ImageCodecPort>,
    notifier: Arc<dyn NotifierPort>,
    current: Mutex<CancellationToken>,
}

impl CaptureClipboard {
    pub fn new(
        clipboard: Arc<dyn ClipboardReaderPort>,
        hasher: Arc<dyn ContentHashPort>,
        codec: Arc<dyn ImageCodecPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            clipboard,
            hasher,
            codec,
            notifier,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub async fn execute(&self) -> Result<CapturedItem, CaptureError> {
        let token = self.reissue_token();
        let span = info_span!("usecase.capture_clipboard.execute");

        async {
            let item = self.capture(&token).await?;
            // A newer capture may have started while we hashed.
            if token.is_cancelled() {
                return Err(CaptureError::Cancelled);
            }
            info!(
                kind = item.kind.as_str(),
                content_hash = %item.content_hash,
                "Clipboard captured"
            );
            Ok(item)
        }
        .instrument(span)
        .await
    }

    /// Cancels any capture still in flight.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    fn reissue_token(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    async fn capture(&self, token: &CancellationToken) -> Result<CapturedItem, CaptureError> {
        let formats = cancellable(token, self.clipboard.formats()).await?;
        let Some(kind) = formats.preferred_kind() else {
            self.notify(UserNotification::CopyFailed).await;
            return Err(if formats.is_empty() {
                CaptureError::Empty
            } else {
                CaptureError::UnsupportedFormat(formats.to_string())
            });
        };
        debug!(%formats, kind = kind.as_str(), "Capturing clipboard");

        match kind {
            ContentKind::Image => self.capture_image(token).await,
            ContentKind::File => self.capture_files(token).await,
            ContentKind::Text => self.capture_text(token).await,
        }
    }

    async fn capture_text(&self, token: &CancellationToken) -> Result<CapturedItem, CaptureError> {
        let text = cancellable(token, self.clipboard.read_text())
            .await?
            .filter(|text| !text.is_empty())
            .ok_or(CaptureError::Empty)?;
        let hash = self.hash(text.as_bytes())?;
        Ok(CapturedItem::text(text, hash))
    }

    async fn capture_image(&self, token: &CancellationToken) -> Result<CapturedItem, CaptureError> {
        let Some(bytes) = cancellable(token, self.clipboard.read_image()).await? else {
            self.notify(UserNotification::CopyFailed).await;
            return Err(CaptureError::Empty);
        };
        let canonical = self
            .codec
            .canonicalize(&bytes, FALLBACK_EXTENSION)
            .map_err(|err| CaptureError::Decode {
                name: "clipboard image".to_string(),
                reason: err.to_string(),
            })?;
        let hash = self.hash(&canonical.bytes)?;
        Ok(CapturedItem::image(canonical.bytes, hash))
    }

    /// The first copied file that decodes as an image becomes the item.
    async fn capture_files(&self, token: &CancellationToken) -> Result<CapturedItem, CaptureError> {
        let files = cancellable(token, self.clipboard.read_files()).await?;
        if files.is_empty() {
            self.notify(UserNotification::CopyFailed).await;
            return Err(CaptureError::Empty);
        }

        for file in files {
            let extension = preferred_extension(&file);
            match self.codec.canonicalize(&file.bytes, &extension) {
                Ok(canonical) => {
                    let hash = self.hash(&canonical.bytes)?;
                    return Ok(CapturedItem::file(
                        &file.name,
                        &canonical.extension,
                        canonical.bytes,
                        hash,
                    ));
                }
                Err(err) => {
                    warn!(file = %file.name, error = %err, "Copied file is not a supported image");
                    self.notify(UserNotification::InvalidClipboardFormat {
                        file_name: file.name.clone(),
                    })
                    .await;
                }
            }
        }
        Err(CaptureError::UnsupportedFormat(
            "no copied file could be decoded".to_string(),
        ))
    }

    fn hash(&self, bytes: &[u8]) -> Result<ContentHash, CaptureError> {
        self.hasher
            .hash_bytes(bytes)
            .map_err(|err| CaptureError::Hash(err.to_string()))
    }

    async fn notify(&self, notification: UserNotification) {
        if let Err(err) = self.notifier.notify(notification).await {
            warn!(error = %err, "Failed to deliver notification");
        }
    }
}

async fn cancellable<T>(
    token: &CancellationToken,
    read: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, CaptureError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CaptureError::Cancelled),
        result = read => result.map_err(|err| CaptureError::Read(err.to_string())),
    }
}

/// Subtype of the file's MIME type, else its extension, else `png`.
fn preferred_extension(file: &ClipboardFile) -> String {
    file.content_type
        .as_deref()
        .and_then(|mime| mime.split_once('/'))
        .map(|(_, subtype)| subtype.to_string())
        .or_else(|| {
            file.name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .filter(|ext| !ext.is_empty() && !ext.contains(['/', '\\']))
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
        .to_ascii_lowercase()
}
