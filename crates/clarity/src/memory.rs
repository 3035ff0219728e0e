//! # Memory Manager — Tracked Allocation
//!
//! Every component and system the ECS constructs goes through a
//! [`MemoryManager`], which boxes the value and keeps two byte counters:
//!
//! ```text
//!   alloc(T)    ──► allocated   += size_of::<T>()
//!   dealloc(T)  ──► deallocated += size_of::<T>()
//!
//!   in_use = allocated - deallocated
//! ```
//!
//! The counters are the only state in the engine behind a lock. The
//! manager is shared as an `Arc` so the engine can read the totals after the
//! ECS has been torn down.
//!
//! Values adopted from elsewhere (singleton components) never pass through
//! here, so they never show up in either counter.

use std::sync::Mutex;

use serde::Serialize;

/// A snapshot of the allocation counters, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub allocated: usize,
    pub deallocated: usize,
}

impl MemoryStats {
    /// Bytes currently owned through the manager. Saturates at zero.
    pub fn in_use(&self) -> usize {
        self.allocated.saturating_sub(self.deallocated)
    }
}

/// Byte-counting allocator front-end.
#[derive(Debug, Default)]
pub struct MemoryManager {
    counters: Mutex<MemoryStats>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Box `value` and count its size.
    pub fn alloc<T>(&self, value: T) -> Box<T> {
        self.record_alloc(std::mem::size_of::<T>());
        Box::new(value)
    }

    /// Count the allocation first, then run the constructor. If it fails
    /// the count is rolled back and `None` is returned.
    pub fn try_alloc<T, E: std::fmt::Display>(
        &self,
        ctor: impl FnOnce() -> Result<T, E>,
    ) -> Option<Box<T>> {
        let size = std::mem::size_of::<T>();
        self.record_alloc(size);
        match ctor() {
            Ok(value) => Some(Box::new(value)),
            Err(err) => {
                self.with_counters(|c| c.allocated = c.allocated.saturating_sub(size));
                log::error!(
                    "failed to construct {}: {err}",
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    /// Count and drop a value previously returned by [`alloc`](Self::alloc).
    ///
    /// Works on trait objects too: the size recorded is the size of the
    /// concrete value behind the pointer.
    pub fn dealloc<T: ?Sized>(&self, value: Box<T>) {
        let size = std::mem::size_of_val(&*value);
        self.record_dealloc(size);
        drop(value);
    }

    /// Deallocate whatever `slot` holds and leave it `None`.
    pub fn dealloc_slot<T: ?Sized>(&self, slot: &mut Option<Box<T>>) {
        if let Some(value) = slot.take() {
            self.dealloc(value);
        }
    }

    pub fn stats(&self) -> MemoryStats {
        self.with_counters(|c| *c)
    }

    /// `allocated - deallocated`.
    pub fn in_use(&self) -> usize {
        self.stats().in_use()
    }

    fn record_alloc(&self, size: usize) {
        self.with_counters(|c| c.allocated += size);
    }

    fn record_dealloc(&self, size: usize) {
        let stats = self.with_counters(|c| {
            c.deallocated += size;
            *c
        });
        if stats.deallocated > stats.allocated {
            log::warn!(
                "deallocated {} bytes but only {} were allocated (double free?)",
                stats.deallocated,
                stats.allocated
            );
        }
    }

    fn with_counters<R>(&self, f: impl FnOnce(&mut MemoryStats) -> R) -> R {
        // A poisoned lock still holds valid counters.
        let mut guard = match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}
