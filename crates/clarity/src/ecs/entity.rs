//! # Entity — Plain 32-bit Identifiers
//!
//! An entity is just a number. The [`World`](super::world::World) maps it to
//! a signature and to components; the ID itself carries nothing.
//!
//! ## Recycling
//!
//! IDs come from a monotonic counter. Deleted IDs go onto a FIFO free list and
//! are handed out again before the counter advances:
//!
//! ```text
//! create ×3        → 1, 2, 3          (0 is the world entity)
//! delete 1, 2, 3   → free = [1, 2, 3]
//! create ×4        → 1, 2, 3, 4
//! ```
//!
//! FIFO rather than LIFO maximises the time between an ID being freed and
//! reissued, so a stale copy of an old ID is less likely to alias a fresh
//! entity. There are no generations: an `EntityId` is only as good as the
//! caller's bookkeeping.
//!
//! ## Comparison
//!
//! - **hecs / bevy_ecs**: Generational indices; stale handles are detected.
//! - **EnTT**: Packed index + version, implicit free list threaded through
//!   the entity array.
//! - **Our approach**: Bare `u32` + FIFO queue + live set. Simple to reason
//!   about, with lookups that fail softly on dead IDs.

use std::collections::{HashSet, VecDeque};

/// Opaque entity identifier.
pub type EntityId = u32;

/// Hands out and recycles [`EntityId`]s.
#[derive(Debug, Default)]
pub(crate) struct EntityAllocator {
    /// Next never-used ID.
    next: EntityId,
    /// Freed IDs waiting for reuse, oldest first.
    free_list: VecDeque<EntityId>,
    /// Every ID currently handed out.
    live: HashSet<EntityId>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest freed ID, or take the next one from the counter.
    pub fn allocate(&mut self) -> EntityId {
        let id = match self.free_list.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next;
                self.next += 1;
                id
            }
        };
        self.live.insert(id);
        id
    }

    /// Return `id` to the free list. Returns `false` if it was not live.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.live.remove(&id) {
            return false;
        }
        self.free_list.push_back(id);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn alive_count(&self) -> usize {
        self.live.len()
    }

    /// Live IDs in ascending order.
    pub fn live_sorted(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.live.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
