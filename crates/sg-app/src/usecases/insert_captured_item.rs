use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use sg_core::ports::{NotifierPort, UserNotification};
use sg_core::{CapturedItem, InsertOutcome};

use crate::queue::ClipboardItemProcessor;
use crate::store::SlotStore;

/// Queue consumer that inserts each captured item into the slot store.
///
/// A full-of-pinned-slots outcome is surfaced as
/// [`UserNotification::NoFreeSlot`]; duplicates are dropped silently.
pub struct InsertCapturedItem {
    store: Arc<SlotStore>,
    notifier: Arc<dyn NotifierPort>,
}

impl InsertCapturedItem {
    pub fn new(store: Arc<SlotStore>, notifier: Arc<dyn NotifierPort>) -> Self {
        Self { store, notifier }
    }
}

#[async_trait]
impl ClipboardItemProcessor for InsertCapturedItem {
    async fn process(&self, item: CapturedItem) -> Result<()> {
        match self.store.insert(&item).await? {
            InsertOutcome::Inserted(index) => debug!(slot_index = index, "Captured item stored"),
            InsertOutcome::DuplicateOfHead => debug!("Captured item repeats slot 0"),
            InsertOutcome::NoFreeSlot => {
                if let Err(err) = self.notifier.notify(UserNotification::NoFreeSlot).await {
                    warn!(error = %err, "Failed to deliver notification");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn all_pinned_notifies_no_free_slot() {
        let fx = StoreFixture::new(&settings_with_slots(1));
        fx.store.insert(&text_item("keep")).await.unwrap();
        fx.store.pin(0).await.unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = InsertCapturedItem::new(fx.store.clone(), notifier.clone());

        processor.process(text_item("new")).await.unwrap();
        assert_eq!(notifier.sent(), vec![UserNotification::NoFreeSlot]);
        assert_eq!(fx.texts().await, vec!["keep"]);
    }

    #[tokio::test]
    async fn duplicates_are_dropped_silently() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = InsertCapturedItem::new(fx.store.clone(), notifier.clone());

        processor.process(text_item("same")).await.unwrap();
        processor.process(text_item("same")).await.unwrap();
        assert!(notifier.sent().is_empty());
        assert_eq!(fx.texts().await, vec!["same", ""]);
    }

    #[tokio::test]
    async fn store_failure_is_propagated() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        fx.repo
            .fail_saves
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let processor =
            InsertCapturedItem::new(fx.store.clone(), Arc::new(RecordingNotifier::default()));

        assert!(processor.process(text_item("lost")).await.is_err());
    }
}
