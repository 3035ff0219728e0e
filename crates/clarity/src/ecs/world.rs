//! # World — Entities, Signatures, Components
//!
//! The [`World`] is the data half of the ECS. It owns the entity allocator,
//! one signature per live entity, and the per-kind component store. The
//! systems live next to it in the [`Ecs`](super::Ecs), which is what keeps
//! their entity sets in step with signature changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ World                                                 │
//! │                                                       │
//! │  allocator:  counter + FIFO free list + live set      │
//! │  signatures: HashMap<EntityId, Signature>             │
//! │  store:      [HashMap<EntityId, StoredComponent>; K]  │
//! │  dirty:      entities whose signature changed          │
//! │  memory:     Arc<MemoryManager>                       │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Every live entity has exactly one signature entry, and bit `k` of that
//! signature is set iff `store[k]` holds a component for the entity. All
//! mutation goes through this type so the two can never drift apart.
//!
//! ## Dirty Tracking
//!
//! A system mutating the world mid-update cannot also reach the other
//! systems' entity sets. Instead every signature change pushes the entity
//! onto `dirty`, and the [`Ecs`](super::Ecs) drains the list after each
//! system step (or immediately, for calls made through the `Ecs` itself).
//!
//! ## The World Entity
//!
//! ID 0 is allocated on construction and can never be deleted. It carries
//! process-wide singleton components and is never placed in a system's
//! entity set.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use super::component::{AnyComponent, Component, ComponentKind, ComponentStore, StoredComponent};
use super::entity::{EntityAllocator, EntityId};
use super::signature::Signature;
use crate::error::{EcsError, EcsResult};
use crate::memory::MemoryManager;

/// The central container for entity and component data.
pub struct World {
    allocator: EntityAllocator,
    signatures: HashMap<EntityId, Signature>,
    store: ComponentStore,
    world_id: EntityId,
    /// Entities whose signature (or liveness) changed since the last drain.
    dirty: Vec<EntityId>,
    memory: Arc<MemoryManager>,
}

impl World {
    pub fn new(memory: Arc<MemoryManager>) -> Self {
        let mut allocator = EntityAllocator::new();
        let world_id = allocator.allocate();
        let mut signatures = HashMap::new();
        signatures.insert(world_id, Signature::EMPTY);
        Self {
            allocator,
            signatures,
            store: ComponentStore::new(),
            world_id,
            dirty: Vec::new(),
            memory,
        }
    }

    /// The permanent singleton-carrying entity.
    pub fn world_id(&self) -> EntityId {
        self.world_id
    }

    pub fn memory(&self) -> &Arc<MemoryManager> {
        &self.memory
    }

    // ── Entities ───────────────────────────────────────────────────────

    /// Allocate an ID (recycled IDs first) with an empty signature.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        self.signatures.insert(id, Signature::EMPTY);
        self.dirty.push(id);
        log::trace!("created entity {id}");
        id
    }

    /// Free `id` and destroy every component it owns.
    pub fn delete_entity(&mut self, id: EntityId) -> EcsResult<()> {
        if id == self.world_id {
            return Err(diagnostic(EcsError::WorldEntity(id)));
        }
        if !self.allocator.deallocate(id) {
            return Err(diagnostic(EcsError::EntityNotFound(id)));
        }
        self.dirty.push(id);
        for stored in self.store.remove_all(id) {
            self.release(stored);
        }
        self.signatures.remove(&id);
        log::trace!("deleted entity {id}");
        Ok(())
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Number of live entities, the world entity included.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Live entity IDs in ascending order, the world entity included.
    pub fn entities(&self) -> Vec<EntityId> {
        self.allocator.live_sorted()
    }

    pub fn signature(&self, id: EntityId) -> Option<Signature> {
        self.signatures.get(&id).copied()
    }

    // ── Components ─────────────────────────────────────────────────────

    /// Allocate `component` through the memory manager and attach it.
    ///
    /// A second component of the same kind is rejected: the new one is
    /// deallocated and the entity is left as it was.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> EcsResult<()> {
        self.ensure_alive(id)?;
        let value: Box<dyn AnyComponent> = self.memory.alloc(component);
        self.attach(id, StoredComponent { value, adopted: false })
    }

    /// Like [`add_component`](Self::add_component), for constructors that can
    /// fail (loading a texture, parsing a mesh).
    pub fn try_add_component<T: Component, E: Display>(
        &mut self,
        id: EntityId,
        ctor: impl FnOnce() -> Result<T, E>,
    ) -> EcsResult<()> {
        self.ensure_alive(id)?;
        let mut reason = String::new();
        let boxed = self.memory.try_alloc(|| {
            ctor().map_err(|err| {
                reason = err.to_string();
                err
            })
        });
        match boxed {
            Some(boxed) => {
                let value: Box<dyn AnyComponent> = boxed;
                self.attach(id, StoredComponent { value, adopted: false })
            }
            None => Err(diagnostic(EcsError::AllocationFailure {
                entity: id,
                kind: T::KIND,
                reason,
            })),
        }
    }

    /// Attach a component built outside the memory manager. The store owns
    /// it from now on, but destroying it is not counted as a deallocation.
    pub fn adopt_component<T: Component>(&mut self, id: EntityId, component: Box<T>) -> EcsResult<()> {
        self.ensure_alive(id)?;
        let value: Box<dyn AnyComponent> = component;
        self.attach(id, StoredComponent { value, adopted: true })
    }

    /// Detach and destroy the `kind` component of `id`.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> EcsResult<()> {
        let Some(signature) = self.signatures.get_mut(&id) else {
            return Err(diagnostic(EcsError::InvalidSignature(id)));
        };
        signature.clear(kind);
        self.dirty.push(id);
        match self.store.remove(id, kind) {
            Some(stored) => {
                self.release(stored);
                Ok(())
            }
            None => Err(diagnostic(EcsError::ComponentNotFound { entity: id, kind })),
        }
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.store.get::<T>(id)
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.store.get_mut::<T>(id)
    }

    pub fn has_component(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.store.contains(id, kind)
    }

    /// How many entities own a component of `kind`.
    pub fn component_count(&self, kind: ComponentKind) -> usize {
        self.store.len(kind)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn ensure_alive(&self, id: EntityId) -> EcsResult<()> {
        if self.allocator.is_alive(id) {
            Ok(())
        } else {
            Err(diagnostic(EcsError::EntityNotFound(id)))
        }
    }

    fn attach(&mut self, id: EntityId, stored: StoredComponent) -> EcsResult<()> {
        let kind = stored.value.kind();
        if let Err(rejected) = self.store.insert(id, stored) {
            self.release(rejected);
            return Err(diagnostic(EcsError::DuplicateComponent { entity: id, kind }));
        }
        self.signatures.entry(id).or_default().set(kind);
        self.dirty.push(id);
        Ok(())
    }

    fn release(&self, stored: StoredComponent) {
        if stored.adopted {
            drop(stored.value);
        } else {
            self.memory.dealloc(stored.value);
        }
    }

    /// Hand over the entities whose membership needs re-evaluating.
    pub(crate) fn take_dirty(&mut self) -> Vec<EntityId> {
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_unstable();
        dirty.dedup();
        dirty
    }
}

impl Drop for World {
    fn drop(&mut self) {
        for stored in self.store.drain() {
            self.release(stored);
        }
    }
}

fn diagnostic(err: EcsError) -> EcsError {
    log::warn!("{err}");
    err
}
