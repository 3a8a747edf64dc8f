use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, error, info_span, Instrument};

use sg_core::{CapturedItem, ContentHash};

/// Consumer of queued captures, invoked for one item at a time.
#[async_trait]
pub trait ClipboardItemProcessor: Send + Sync {
    async fn process(&self, item: CapturedItem) -> Result<()>;
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<CapturedItem>,
    last_enqueued_hash: Option<ContentHash>,
    is_draining: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    idle: Notify,
    processor: Arc<dyn ClipboardItemProcessor>,
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// FIFO of captured items with a single drain task.
///
/// At most one [`ClipboardItemProcessor::process`] call is in flight. An item
/// whose hash equals the previously enqueued one is dropped.
#[derive(Clone)]
pub struct IngestionQueue {
    inner: Arc<QueueInner>,
}

impl IngestionQueue {
    pub fn new(processor: Arc<dyn ClipboardItemProcessor>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                idle: Notify::new(),
                processor,
            }),
        }
    }

    /// Enqueues `item`, starting a drain if none is running.
    ///
    /// Returns `false` when the item repeats the last enqueued hash. Must be
    /// called from within a tokio runtime.
    pub fn add(&self, item: CapturedItem) -> bool {
        let mut state = self.inner.lock();
        if state.last_enqueued_hash.as_ref() == Some(&item.content_hash) {
            debug!(content_hash = %item.content_hash, "Dropping repeat of last enqueued item");
            return false;
        }

        state.last_enqueued_hash = Some(item.content_hash.clone());
        state.items.push_back(item);
        if !state.is_draining {
            state.is_draining = true;
            tokio::spawn(drain(self.inner.clone()));
        }
        true
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_draining(&self) -> bool {
        self.inner.lock().is_draining
    }

    pub fn last_enqueued_hash(&self) -> Option<ContentHash> {
        self.inner.lock().last_enqueued_hash.clone()
    }

    /// Resolves once the queue is empty and no item is being processed.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_draining() {
                return;
            }
            notified.await;
        }
    }
}

async fn drain(inner: Arc<QueueInner>) {
    let span = info_span!("ingestion_queue.drain");
    async {
        loop {
            let item = {
                let mut state = inner.lock();
                match state.items.pop_front() {
                    Some(item) => item,
                    None => {
                        state.is_draining = false;
                        break;
                    }
                }
            };

            let content_hash = item.content_hash.clone();
            let processor = inner.processor.clone();
            // Own task so a panicking processor cannot wedge the drain.
            match tokio::spawn(async move { processor.process(item).await }).await {
                Ok(Ok(())) => debug!(%content_hash, "Item processed"),
                Ok(Err(err)) => error!(%content_hash, error = %err, "Failed to process item"),
                Err(err) => error!(%content_hash, error = %err, "Item processor panicked"),
            }

            tokio::task::yield_now().await;
        }
        inner.idle.notify_waiters();
    }
    .instrument(span)
    .await
}
