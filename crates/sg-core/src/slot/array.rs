use crate::clipboard::ContentHash;

use super::{PinState, Slot, SlotError};

/// Result of a slot insertion as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(usize),
    DuplicateOfHead,
    /// Every slot is pinned. Expected, not an error.
    NoFreeSlot,
}

/// What [`SlotArray::decide_insert`] concluded before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertDecision {
    Place { evict_index: usize },
    DuplicateOfHead,
    NoFreeSlot,
}

/// The fixed-length, ordered history array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotArray {
    slots: Vec<Slot>,
}

impl SlotArray {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![Slot::empty(); count],
        }
    }

    /// Wraps already-validated slots, padding up to `min_count`.
    pub fn from_slots(mut slots: Vec<Slot>, min_count: usize) -> Self {
        if slots.len() < min_count {
            slots.resize(min_count, Slot::empty());
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn head(&self) -> Option<&Slot> {
        self.slots.first().filter(|slot| !slot.is_empty())
    }

    pub fn pinned_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_pinned()).count()
    }

    pub fn references_file(&self, file_name: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.file() == Some(file_name))
    }

    /// Index of the highest unpinned slot, the eviction victim.
    pub fn last_unpinned_index(&self) -> Option<usize> {
        self.slots.iter().rposition(|slot| !slot.is_pinned())
    }

    /// Validates an insertion without touching the array.
    ///
    /// `head_hash` is the canonical hash of slot 0 when head dedup applies,
    /// `None` to skip the check.
    pub fn decide_insert(
        &self,
        item_hash: &ContentHash,
        head_hash: Option<&ContentHash>,
    ) -> InsertDecision {
        if head_hash == Some(item_hash) {
            return InsertDecision::DuplicateOfHead;
        }
        match self.last_unpinned_index() {
            Some(evict_index) => InsertDecision::Place { evict_index },
            None => InsertDecision::NoFreeSlot,
        }
    }

    /// Removes the slot at `evict_index` and puts `slot` at the front.
    ///
    /// Returns the evicted slot so the caller can release its cached file.
    pub fn place_at_head(&mut self, evict_index: usize, slot: Slot) -> Result<Slot, SlotError> {
        self.check_index(evict_index)?;
        let evicted = self.slots.remove(evict_index);
        self.slots.insert(0, slot);
        Ok(evicted)
    }

    pub fn set_pin_state(&mut self, index: usize, pin_state: PinState) -> Result<bool, SlotError> {
        self.check_index(index)?;
        let slot = &mut self.slots[index];
        if slot.pin_state() == pin_state {
            return Ok(false);
        }
        slot.set_pin_state(pin_state);
        Ok(true)
    }

    pub fn toggle_pin(&mut self, index: usize) -> Result<PinState, SlotError> {
        self.check_index(index)?;
        let next = self.slots[index].pin_state().toggled();
        self.slots[index].set_pin_state(next);
        Ok(next)
    }

    /// Empties one slot, returning what it held.
    pub fn remove(&mut self, index: usize) -> Result<Slot, SlotError> {
        self.check_index(index)?;
        Ok(std::mem::take(&mut self.slots[index]))
    }

    /// Moves occupied slots to the front, keeping their relative order.
    ///
    /// Returns whether anything moved.
    pub fn compact(&mut self) -> bool {
        let before = self.slots.clone();
        let (occupied, empty): (Vec<Slot>, Vec<Slot>) =
            self.slots.drain(..).partition(|slot| !slot.is_empty());
        self.slots = occupied;
        self.slots.extend(empty);
        self.slots != before
    }

    /// Grows with empty slots or shrinks without ever dropping a pinned slot.
    ///
    /// Shrinking drops unpinned empty slots from the tail first, then
    /// unpinned occupied ones. Returns the dropped occupied slots.
    pub fn resize(&mut self, new_count: usize) -> Result<Vec<Slot>, SlotError> {
        if new_count == 0 {
            return Err(SlotError::InvalidSlotCount(new_count));
        }
        let current = self.slots.len();
        if new_count >= current {
            self.slots.resize(new_count, Slot::empty());
            return Ok(Vec::new());
        }

        let pinned = self.pinned_count();
        if pinned > new_count {
            return Err(SlotError::ResizeWouldDropPinned {
                requested: new_count,
                pinned,
            });
        }

        let mut to_drop = current - new_count;
        let mut drop_mask = vec![false; current];
        for pass_occupied in [false, true] {
            for index in (0..current).rev() {
                if to_drop == 0 {
                    break;
                }
                let slot = &self.slots[index];
                if drop_mask[index] || slot.is_pinned() || slot.is_empty() == pass_occupied {
                    continue;
                }
                drop_mask[index] = true;
                to_drop -= 1;
            }
        }

        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(new_count);
        for (slot, discard) in self.slots.drain(..).zip(drop_mask) {
            if !discard {
                kept.push(slot);
            } else if !slot.is_empty() {
                dropped.push(slot);
            }
        }
        self.slots = kept;
        Ok(dropped)
    }

    /// Empties every unpinned slot in place. Returns the cleared occupants.
    pub fn clear_unpinned(&mut self) -> Vec<Slot> {
        self.slots
            .iter_mut()
            .filter(|slot| !slot.is_pinned() && !slot.is_empty())
            .map(std::mem::take)
            .collect()
    }

    /// Empties unpinned slots whose occupant is older than `max_age_secs`.
    ///
    /// Returns the index and former content of each expired slot.
    pub fn expire(&mut self, now: i64, max_age_secs: i64) -> Vec<(usize, Slot)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| {
                !slot.is_pinned() && !slot.is_empty() && slot.is_older_than(now, max_age_secs)
            })
            .map(|(index, slot)| (index, std::mem::take(slot)))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), SlotError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SlotError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }
}
