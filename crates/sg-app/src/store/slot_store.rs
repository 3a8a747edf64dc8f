use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use sg_core::ports::{
    ClockPort, ContentHashPort, PayloadCachePort, SlotRendererPort, SlotRepositoryPort,
};
use sg_core::slot::InsertDecision;
use sg_core::{CapturedItem, InsertOutcome, PinState, Settings, Slot, SlotArray};

/// How a mutation is announced to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Render {
    Slots,
    SlotsAndGrid,
}

struct StoreState {
    slots: SlotArray,
    target_count: usize,
    auto_arrange: bool,
    skip_duplicate_copy: bool,
    pending_removals: usize,
}

/// Write-through owner of the slot array.
///
/// Every public operation runs under one lock, persists the full array
/// before returning and renders once. Cached payload files are written
/// before the array points at them and deleted only after the array no
/// longer does.
pub struct SlotStore {
    state: Mutex<StoreState>,
    repo: Arc<dyn SlotRepositoryPort>,
    cache: Arc<dyn PayloadCachePort>,
    hasher: Arc<dyn ContentHashPort>,
    clock: Arc<dyn ClockPort>,
    renderer: Arc<dyn SlotRendererPort>,
}

impl SlotStore {
    pub fn new(
        repo: Arc<dyn SlotRepositoryPort>,
        cache: Arc<dyn PayloadCachePort>,
        hasher: Arc<dyn ContentHashPort>,
        clock: Arc<dyn ClockPort>,
        renderer: Arc<dyn SlotRendererPort>,
        settings: &Settings,
    ) -> Self {
        let target_count = settings.slot_count();
        Self {
            state: Mutex::new(StoreState {
                slots: SlotArray::new(target_count),
                target_count,
                auto_arrange: settings.auto_arrange,
                skip_duplicate_copy: settings.skip_duplicate_copy,
                pending_removals: 0,
            }),
            repo,
            cache,
            hasher,
            clock,
            renderer,
        }
    }

    /// Replaces the in-memory array with the persisted one.
    ///
    /// Malformed entries become empty slots. A stored array longer than the
    /// configured count is shrunk unless that would drop pinned slots, in
    /// which case it is kept as is.
    pub async fn load(&self) -> Result<()> {
        let span = info_span!("usecase.slot_store.load");
        async {
            let mut state = self.state.lock().await;
            let entries = self
                .repo
                .load_slots()
                .await
                .context("failed to load persisted slots")?;

            let (mut slots, rejected) = SlotArray::from_persisted(&entries, state.target_count);
            for (index, err) in &rejected {
                warn!(slot_index = index, error = %err, "Discarding malformed persisted slot");
            }

            let mut dropped = Vec::new();
            if slots.len() > state.target_count {
                match slots.resize(state.target_count) {
                    Ok(removed) => dropped = removed,
                    Err(err) => {
                        warn!(error = %err, "Keeping stored slot count, too many pinned slots")
                    }
                }
            }

            let needs_save = !rejected.is_empty() || slots.len() != entries.len();
            state.slots = slots;
            if needs_save {
                self.persist(&state.slots).await?;
            }
            self.release_files(&state.slots, dropped).await;
            info!(slots = state.slots.len(), "Slots loaded");
            self.render(&state.slots, Render::SlotsAndGrid).await;
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub async fn snapshot(&self) -> Vec<Slot> {
        self.state.lock().await.slots.slots().to_vec()
    }

    pub async fn slot(&self, index: usize) -> Option<Slot> {
        self.state.lock().await.slots.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.slots.len()
    }

    pub async fn pending_removals(&self) -> usize {
        self.state.lock().await.pending_removals
    }

    /// Picks up flag changes. Does not resize or compact on its own.
    pub async fn apply_settings(&self, settings: &Settings) {
        let mut state = self.state.lock().await;
        state.auto_arrange = settings.auto_arrange;
        state.skip_duplicate_copy = settings.skip_duplicate_copy;
    }

    /// Puts `item` at the front, evicting the last unpinned slot.
    pub async fn insert(&self, item: &CapturedItem) -> Result<InsertOutcome> {
        let span = info_span!(
            "usecase.slot_store.insert",
            kind = item.kind.as_str(),
            content_hash = %item.content_hash,
        );
        async {
            let mut state = self.state.lock().await;

            let head_hash = if state.skip_duplicate_copy {
                state
                    .slots
                    .head()
                    .and_then(|head| head.content_hash(self.hasher.as_ref()))
            } else {
                None
            };

            let evict_index = match state.slots.decide_insert(&item.content_hash, head_hash.as_ref())
            {
                InsertDecision::Place { evict_index } => evict_index,
                InsertDecision::DuplicateOfHead => {
                    debug!("Content matches slot 0, skipping");
                    return Ok(InsertOutcome::DuplicateOfHead);
                }
                InsertDecision::NoFreeSlot => {
                    info!("All slots pinned, nothing inserted");
                    return Ok(InsertOutcome::NoFreeSlot);
                }
            };

            let slot = Slot::from_captured(item, self.clock.now_secs()).ok_or_else(|| {
                anyhow!("captured {} item has no storable content", item.kind.as_str())
            })?;

            let mut written = None;
            if let (Some(name), Some(bytes)) =
                (item.suggested_filename.as_deref(), item.bytes_payload())
            {
                if self
                    .cache
                    .write_if_absent(name, bytes)
                    .await
                    .with_context(|| format!("failed to cache {name}"))?
                {
                    written = Some(name);
                } else {
                    debug!(file = name, "Payload already cached");
                }
            }

            let previous = state.slots.clone();
            let evicted = state.slots.place_at_head(evict_index, slot)?;
            if let Err(err) = self.persist(&state.slots).await {
                state.slots = previous;
                if let Some(name) = written {
                    self.delete_file(name).await;
                }
                return Err(err);
            }

            debug!(evicted_index = evict_index, "Inserted at slot 0");
            self.release_files(&state.slots, [evicted]).await;
            self.render(&state.slots, Render::Slots).await;
            Ok(InsertOutcome::Inserted(0))
        }
        .instrument(span)
        .await
    }

    pub async fn pin(&self, index: usize) -> Result<bool> {
        self.set_pin_state(index, PinState::Pinned).await
    }

    pub async fn unpin(&self, index: usize) -> Result<bool> {
        self.set_pin_state(index, PinState::None).await
    }

    /// Returns whether the pin state changed. The slot never moves.
    async fn set_pin_state(&self, index: usize, pin_state: PinState) -> Result<bool> {
        let mut state = self.state.lock().await;
        let previous = state.slots.clone();
        if !state.slots.set_pin_state(index, pin_state)? {
            return Ok(false);
        }
        self.commit(&mut state, previous, Render::Slots).await?;
        debug!(slot_index = index, pinned = pin_state == PinState::Pinned, "Pin state changed");
        Ok(true)
    }

    pub async fn toggle_pin(&self, index: usize) -> Result<PinState> {
        let mut state = self.state.lock().await;
        let previous = state.slots.clone();
        let next = state.slots.toggle_pin(index)?;
        self.commit(&mut state, previous, Render::Slots).await?;
        debug!(slot_index = index, pinned = next == PinState::Pinned, "Pin toggled");
        Ok(next)
    }

    /// Empties one slot and deletes its cached file.
    ///
    /// With auto-arrange on, the removal is counted as pending; compaction
    /// waits until [`complete_removal`](Self::complete_removal) has been
    /// called for every pending removal. Returns whether a completion is
    /// expected.
    pub async fn remove(&self, index: usize) -> Result<bool> {
        let mut state = self.state.lock().await;
        let previous = state.slots.clone();
        let removed = state.slots.remove(index)?;
        if state.slots == previous {
            return Ok(false);
        }
        self.commit(&mut state, previous, Render::Slots).await?;
        let occupied = !removed.is_empty();
        self.release_files(&state.slots, [removed]).await;
        info!(slot_index = index, "Slot removed");

        if occupied && state.auto_arrange {
            state.pending_removals += 1;
            return Ok(true);
        }
        Ok(false)
    }

    /// Marks one pending removal as finished; compacts after the last one.
    ///
    /// Returns whether anything moved.
    pub async fn complete_removal(&self) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.pending_removals = state.pending_removals.saturating_sub(1);
        if state.pending_removals > 0 || !state.auto_arrange {
            return Ok(false);
        }
        self.compact_locked(&mut state).await
    }

    /// Moves occupied slots to the front. Returns whether anything moved.
    pub async fn arrange(&self) -> Result<bool> {
        let mut state = self.state.lock().await;
        self.compact_locked(&mut state).await
    }

    async fn compact_locked(&self, state: &mut StoreState) -> Result<bool> {
        let previous = state.slots.clone();
        if !state.slots.compact() {
            return Ok(false);
        }
        self.commit(state, previous, Render::SlotsAndGrid).await?;
        debug!("Slots compacted");
        Ok(true)
    }

    /// Changes the slot count. Pinned slots are never dropped; a shrink
    /// below the pinned count is rejected with
    /// [`SlotError::ResizeWouldDropPinned`](sg_core::SlotError::ResizeWouldDropPinned).
    pub async fn resize(&self, new_count: usize) -> Result<()> {
        let span = info_span!("usecase.slot_store.resize", new_count);
        async {
            let mut state = self.state.lock().await;
            if state.slots.len() == new_count {
                state.target_count = new_count;
                return Ok(());
            }
            let previous = state.slots.clone();
            let dropped = state.slots.resize(new_count)?;
            self.commit(&mut state, previous, Render::SlotsAndGrid).await?;
            state.target_count = new_count;
            info!(dropped = dropped.len(), "Slot count changed");
            self.release_files(&state.slots, dropped).await;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Empties every unpinned slot. Returns how many were cleared.
    pub async fn clear_unpinned(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let previous = state.slots.clone();
        let cleared = state.slots.clear_unpinned();
        if cleared.is_empty() {
            return Ok(0);
        }
        let count = cleared.len();
        if state.slots.len() < state.target_count {
            let target = state.target_count;
            state.slots.resize(target)?;
        }
        self.commit(&mut state, previous, Render::SlotsAndGrid).await?;
        self.release_files(&state.slots, cleared).await;
        info!(cleared = count, "Unpinned slots cleared");
        Ok(count)
    }

    /// Empties unpinned slots older than `max_age`. Returns how many expired.
    pub async fn expire(&self, max_age: Duration) -> Result<usize> {
        let mut state = self.state.lock().await;
        let now = self.clock.now_secs();
        let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let previous = state.slots.clone();
        let expired = state.slots.expire(now, max_age_secs);
        if expired.is_empty() {
            return Ok(0);
        }
        let count = expired.len();
        self.commit(&mut state, previous, Render::SlotsAndGrid).await?;
        for (index, _) in &expired {
            debug!(slot_index = index, "Slot expired");
        }
        self.release_files(&state.slots, expired.into_iter().map(|(_, slot)| slot))
            .await;
        Ok(count)
    }

    /// Persists and renders, restoring `previous` if the write fails.
    async fn commit(
        &self,
        state: &mut StoreState,
        previous: SlotArray,
        render: Render,
    ) -> Result<()> {
        if let Err(err) = self.persist(&state.slots).await {
            state.slots = previous;
            return Err(err);
        }
        self.render(&state.slots, render).await;
        Ok(())
    }

    async fn persist(&self, slots: &SlotArray) -> Result<()> {
        self.repo
            .save_slots(&slots.to_persisted())
            .await
            .context("failed to persist slots")
    }

    async fn render(&self, slots: &SlotArray, render: Render) {
        if let Err(err) = self.renderer.update_slots(slots.slots()).await {
            warn!(error = %err, "Failed to push slots to renderer");
        }
        if render == Render::SlotsAndGrid {
            if let Err(err) = self.renderer.refresh_grid().await {
                warn!(error = %err, "Failed to refresh slot grid");
            }
        }
    }

    /// Deletes cached files of slots that left the array.
    ///
    /// A file still referenced by another slot is kept.
    async fn release_files(&self, slots: &SlotArray, released: impl IntoIterator<Item = Slot>) {
        for slot in released {
            let Some(name) = slot.file() else { continue };
            if slots.references_file(name) {
                debug!(file = name, "Cached file still referenced, keeping");
                continue;
            }
            self.delete_file(name).await;
        }
    }

    async fn delete_file(&self, name: &str) {
        match self.cache.remove(name).await {
            Ok(true) => debug!(file = name, "Cached file deleted"),
            Ok(false) => debug!(file = name, "Cached file already gone"),
            Err(err) => warn!(file = name, error = %err, "Failed to delete cached file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use sg_core::slot::PINNED_MARKER;
    use std::sync::atomic::Ordering;

    fn entry(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn six_slot_scenario_keeps_pinned_and_evicts_from_the_end() {
        let fx = StoreFixture::new(&settings_with_slots(6));

        assert_eq!(
            fx.store.insert(&text_item("A")).await.unwrap(),
            InsertOutcome::Inserted(0)
        );
        let t1 = fx.clock.now();
        assert_eq!(fx.repo.stored()[0], entry(&["A", "", "", &t1.to_string()]));

        fx.clock.advance(10);
        fx.store.insert(&text_item("B")).await.unwrap();
        let t2 = fx.clock.now();
        let stored = fx.repo.stored();
        assert_eq!(stored[0], entry(&["B", "", "", &t2.to_string()]));
        assert_eq!(stored[1], entry(&["A", "", "", &t1.to_string()]));

        assert!(fx.store.pin(1).await.unwrap());

        for text in ["C", "D", "E", "F", "G"] {
            fx.store.insert(&text_item(text)).await.unwrap();
            assert_eq!(fx.store.len().await, 6);
        }

        assert_eq!(fx.texts().await, vec!["G", "F", "E", "D", "C", "A"]);
        let last = &fx.repo.stored()[5];
        assert_eq!(last[0], "A");
        assert_eq!(last[2], PINNED_MARKER);
    }

    #[tokio::test]
    async fn duplicate_of_head_is_a_no_op() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        fx.store.insert(&text_item("same")).await.unwrap();
        let saves = fx.repo.saves();
        let renders = fx.renderer.updates();
        let before = fx.store.snapshot().await;

        assert_eq!(
            fx.store.insert(&text_item("same")).await.unwrap(),
            InsertOutcome::DuplicateOfHead
        );
        assert_eq!(fx.store.snapshot().await, before);
        assert_eq!(fx.repo.saves(), saves);
        assert_eq!(fx.renderer.updates(), renders);
    }

    #[tokio::test]
    async fn duplicate_image_writes_no_new_file() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        let image = image_item(b"canonical png bytes");
        let name = image.suggested_filename.clone().unwrap();

        fx.store.insert(&image).await.unwrap();
        assert!(fx.cache.has(&name));
        assert_eq!(fx.cache.writes(), 1);

        assert_eq!(
            fx.store.insert(&image_item(b"canonical png bytes")).await.unwrap(),
            InsertOutcome::DuplicateOfHead
        );
        assert_eq!(fx.cache.writes(), 1);
        assert_eq!(fx.store.snapshot().await[0].file(), Some(name.as_str()));
    }

    #[tokio::test]
    async fn repeat_is_inserted_when_duplicate_skipping_is_off() {
        let settings = Settings {
            skip_duplicate_copy: false,
            ..settings_with_slots(3)
        };
        let fx = StoreFixture::new(&settings);
        fx.store.insert(&text_item("again")).await.unwrap();

        assert_eq!(
            fx.store.insert(&text_item("again")).await.unwrap(),
            InsertOutcome::Inserted(0)
        );
        assert_eq!(fx.texts().await, vec!["again", "again", ""]);
    }

    #[tokio::test]
    async fn all_pinned_returns_no_free_slot_unchanged() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        fx.store.insert(&text_item("x")).await.unwrap();
        fx.store.insert(&text_item("y")).await.unwrap();
        fx.store.pin(0).await.unwrap();
        fx.store.pin(1).await.unwrap();
        let stored = fx.repo.stored();
        let saves = fx.repo.saves();

        assert_eq!(
            fx.store.insert(&text_item("z")).await.unwrap(),
            InsertOutcome::NoFreeSlot
        );
        assert_eq!(fx.repo.stored(), stored);
        assert_eq!(fx.repo.saves(), saves);
    }

    #[tokio::test]
    async fn evicting_a_file_slot_deletes_its_cached_file() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        let image = image_item(b"first image");
        let name = image.suggested_filename.clone().unwrap();
        fx.store.insert(&image).await.unwrap();
        fx.store.insert(&text_item("t1")).await.unwrap();

        fx.store.insert(&text_item("t2")).await.unwrap();

        assert!(!fx.cache.has(&name));
        assert_eq!(fx.texts().await, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn file_still_referenced_elsewhere_is_kept() {
        let settings = Settings {
            skip_duplicate_copy: false,
            ..settings_with_slots(3)
        };
        let fx = StoreFixture::new(&settings);
        let name = image_item(b"shared").suggested_filename.unwrap();
        fx.store.insert(&image_item(b"shared")).await.unwrap();
        fx.store.insert(&text_item("t")).await.unwrap();
        fx.store.insert(&image_item(b"shared")).await.unwrap();

        // Evicts the older copy at the tail; slot 1 still points at the file.
        fx.store.insert(&text_item("u")).await.unwrap();
        assert!(fx.cache.has(&name));
    }

    #[tokio::test]
    async fn missing_cached_file_on_eviction_is_tolerated() {
        let fx = StoreFixture::new(&settings_with_slots(1));
        let image = image_item(b"gone");
        fx.store.insert(&image).await.unwrap();
        fx.cache.files.lock().unwrap().clear();

        assert_eq!(
            fx.store.insert(&text_item("next")).await.unwrap(),
            InsertOutcome::Inserted(0)
        );
    }

    #[tokio::test]
    async fn insert_renders_once() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        fx.store.insert(&text_item("one")).await.unwrap();
        assert_eq!(fx.renderer.updates(), 1);
        assert_eq!(fx.renderer.refreshes(), 0);
    }

    #[tokio::test]
    async fn failed_save_rolls_back() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        fx.store.insert(&text_item("kept")).await.unwrap();
        fx.repo.fail_saves.store(true, Ordering::SeqCst);

        assert!(fx.store.insert(&image_item(b"img")).await.is_err());
        assert_eq!(fx.texts().await, vec!["kept", ""]);
        assert!(fx.cache.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pin_and_unpin_do_not_move_slots() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        fx.store.insert(&text_item("a")).await.unwrap();
        fx.store.insert(&text_item("b")).await.unwrap();

        assert!(fx.store.pin(1).await.unwrap());
        assert!(!fx.store.pin(1).await.unwrap());
        assert_eq!(fx.texts().await, vec!["b", "a", ""]);
        assert_eq!(fx.repo.stored()[1][2], PINNED_MARKER);

        assert_eq!(fx.store.toggle_pin(1).await.unwrap(), PinState::None);
        assert_eq!(fx.repo.stored()[1][2], "");
    }

    #[tokio::test]
    async fn out_of_range_index_is_an_error() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        let err = fx.store.pin(7).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<sg_core::SlotError>(),
            Some(&sg_core::SlotError::IndexOutOfRange { index: 7, len: 3 })
        );
    }

    #[tokio::test]
    async fn remove_without_auto_arrange_leaves_a_gap() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        for text in ["a", "b", "c"] {
            fx.store.insert(&text_item(text)).await.unwrap();
        }

        assert!(!fx.store.remove(1).await.unwrap());
        assert_eq!(fx.texts().await, vec!["c", "", "a"]);
        assert_eq!(fx.store.pending_removals().await, 0);
    }

    #[tokio::test]
    async fn rapid_removals_compact_once() {
        let settings = Settings {
            auto_arrange: true,
            ..settings_with_slots(4)
        };
        let fx = StoreFixture::new(&settings);
        for text in ["a", "b", "c", "d"] {
            fx.store.insert(&text_item(text)).await.unwrap();
        }

        assert!(fx.store.remove(0).await.unwrap());
        assert!(fx.store.remove(2).await.unwrap());
        assert_eq!(fx.store.pending_removals().await, 2);

        assert!(!fx.store.complete_removal().await.unwrap());
        assert_eq!(fx.texts().await, vec!["", "c", "", "a"]);

        let refreshes = fx.renderer.refreshes();
        assert!(fx.store.complete_removal().await.unwrap());
        assert_eq!(fx.texts().await, vec!["c", "a", "", ""]);
        assert_eq!(fx.renderer.refreshes(), refreshes + 1);
    }

    #[tokio::test]
    async fn removing_a_file_slot_deletes_the_file() {
        let fx = StoreFixture::new(&settings_with_slots(2));
        let image = image_item(b"to remove");
        let name = image.suggested_filename.clone().unwrap();
        fx.store.insert(&image).await.unwrap();

        fx.store.remove(0).await.unwrap();
        assert!(!fx.cache.has(&name));
        assert!(fx.store.snapshot().await[0].is_empty());
    }

    #[tokio::test]
    async fn resize_grows_and_shrinks_around_pins() {
        let fx = StoreFixture::new(&settings_with_slots(4));
        for text in ["a", "b", "c", "d"] {
            fx.store.insert(&text_item(text)).await.unwrap();
        }
        fx.store.pin(3).await.unwrap();

        fx.store.resize(2).await.unwrap();
        assert_eq!(fx.texts().await, vec!["d", "a"]);
        assert_eq!(fx.repo.stored().len(), 2);

        fx.store.resize(3).await.unwrap();
        assert_eq!(fx.texts().await, vec!["d", "a", ""]);
    }

    #[tokio::test]
    async fn resize_below_pinned_count_is_rejected() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        for text in ["a", "b"] {
            fx.store.insert(&text_item(text)).await.unwrap();
        }
        fx.store.pin(0).await.unwrap();
        fx.store.pin(1).await.unwrap();

        let err = fx.store.resize(1).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<sg_core::SlotError>(),
            Some(sg_core::SlotError::ResizeWouldDropPinned { requested: 1, pinned: 2 })
        ));
        assert_eq!(fx.store.len().await, 3);
    }

    #[tokio::test]
    async fn clear_unpinned_is_idempotent() {
        let fx = StoreFixture::new(&settings_with_slots(4));
        let image = image_item(b"clear me");
        let name = image.suggested_filename.clone().unwrap();
        fx.store.insert(&image).await.unwrap();
        fx.store.insert(&text_item("keep")).await.unwrap();
        fx.store.insert(&text_item("drop")).await.unwrap();
        fx.store.pin(1).await.unwrap();

        assert_eq!(fx.store.clear_unpinned().await.unwrap(), 2);
        let once = fx.store.snapshot().await;
        assert_eq!(fx.texts().await, vec!["", "keep", "", ""]);
        assert!(!fx.cache.has(&name));

        let saves = fx.repo.saves();
        assert_eq!(fx.store.clear_unpinned().await.unwrap(), 0);
        assert_eq!(fx.store.snapshot().await, once);
        assert_eq!(fx.repo.saves(), saves);
    }

    #[tokio::test]
    async fn expire_empties_old_unpinned_slots() {
        let fx = StoreFixture::new(&settings_with_slots(3));
        let image = image_item(b"old image");
        let name = image.suggested_filename.clone().unwrap();
        fx.store.insert(&image).await.unwrap();
        fx.store.insert(&text_item("old pinned")).await.unwrap();
        fx.store.pin(0).await.unwrap();

        fx.clock.advance(600);
        let refreshes = fx.renderer.refreshes();
        let expired = fx.store.expire(Duration::from_secs(5 * 60)).await.unwrap();

        assert_eq!(expired, 1);
        assert!(!fx.cache.has(&name));
        assert_eq!(fx.texts().await, vec!["old pinned", "", ""]);
        assert_eq!(fx.renderer.refreshes(), refreshes + 1);
    }

    #[tokio::test]
    async fn load_accepts_legacy_entries_and_replaces_malformed_ones() {
        let repo = MemorySlotRepo::with_entries(vec![
            entry(&["legacy", "", "pinned"]),
            entry(&["broken"]),
            entry(&["new", "", "", "1700000000"]),
        ]);
        let fx = StoreFixture::with_repo(&settings_with_slots(4), repo);

        fx.store.load().await.unwrap();

        let slots = fx.store.snapshot().await;
        assert_eq!(slots.len(), 4);
        assert!(slots[0].is_pinned());
        assert_eq!(slots[0].created_at(), None);
        assert!(slots[1].is_empty());
        assert_eq!(slots[2].created_at(), Some(T0));
        // Rewritten because an entry was dropped and the array was padded.
        assert_eq!(fx.repo.stored().len(), 4);
        assert_eq!(fx.repo.stored()[1], entry(&["", "", "", ""]));
    }

    #[tokio::test]
    async fn load_shrinks_to_configured_count() {
        let repo = MemorySlotRepo::with_entries(vec![
            entry(&["a", "", "", "1"]),
            entry(&["b", "", "", "2"]),
            entry(&["", "", "", ""]),
        ]);
        let fx = StoreFixture::with_repo(&settings_with_slots(2), repo);

        fx.store.load().await.unwrap();
        assert_eq!(fx.texts().await, vec!["a", "b"]);
        assert_eq!(fx.repo.stored().len(), 2);
    }
}
