//! # System — Lifecycle Processors
//!
//! A system declares a required [`Signature`] and implements up to six
//! lifecycle steps. The ECS keeps, next to each system, the set of live
//! entities whose signature is a superset of the system's, and hands that set
//! to the system through a [`SystemContext`] on every call.
//!
//! ```text
//!           forward                       reverse
//!   ┌──────────────────────────┐   ┌────────────────────┐
//!   initialize → load → update → render → unload → terminate
//!                       └── per tick ─┘
//! ```
//!
//! Every step defaults to `Ok(())`, so a system only writes the ones it needs.
//!
//! ## No back-pointer
//!
//! Systems never hold a reference to the ECS. Whatever a step needs (the
//! component store, its own entity set, the event bus) arrives in the
//! context, borrowed for the duration of the call.

use std::collections::BTreeSet;

use super::entity::EntityId;
use super::signature::Signature;
use super::world::World;
use crate::error::SystemResult;
use crate::event::EventBus;

/// Everything a lifecycle step may touch.
pub struct SystemContext<'a> {
    /// Entities, signatures and components.
    pub world: &'a mut World,
    /// The entities currently matching this system, in ascending ID order.
    pub entities: &'a BTreeSet<EntityId>,
    /// Engine-wide event queue.
    pub events: &'a mut EventBus,
}

/// A lifecycle-bearing processor registered with the [`Ecs`](super::Ecs).
pub trait System: 'static {
    /// The components an entity must have to be handed to this system.
    fn signature(&self) -> Signature;

    fn initialize(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        let _ = ctx;
        Ok(())
    }

    fn load(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        let _ = ctx;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) -> SystemResult {
        let _ = (ctx, dt);
        Ok(())
    }

    fn render(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        let _ = ctx;
        Ok(())
    }

    fn unload(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        let _ = ctx;
        Ok(())
    }

    fn terminate(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        let _ = ctx;
        Ok(())
    }
}

/// The bookkeeping the ECS keeps for every registered system.
#[derive(Debug)]
pub struct SystemState {
    name: String,
    signature: Signature,
    entities: BTreeSet<EntityId>,
    initialized: bool,
}

impl SystemState {
    pub(crate) fn new(name: String, signature: Signature) -> Self {
        Self {
            name,
            signature,
            entities: BTreeSet::new(),
            initialized: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn entities(&self) -> &BTreeSet<EntityId> {
        &self.entities
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    /// Set after a successful initialize, cleared by terminate.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
    }

    /// Add `id` to the entity set. A second add is a no-op and returns `false`.
    pub fn add_entity(&mut self, id: EntityId) -> bool {
        let inserted = self.entities.insert(id);
        if !inserted {
            log::debug!("entity {id} already in system `{}`", self.name);
        }
        inserted
    }

    /// Remove `id` from the entity set. Removing an absent entity is a no-op
    /// and returns `false`.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let removed = self.entities.remove(&id);
        if !removed {
            log::debug!("entity {id} not in system `{}`", self.name);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentKind;

    #[test]
    fn membership_is_idempotent() {
        let mut state = SystemState::new(
            "test".into(),
            Signature::of(&[ComponentKind::Transform]),
        );
        assert!(state.add_entity(4));
        assert!(!state.add_entity(4));
        assert_eq!(state.entities().len(), 1);

        assert!(state.remove_entity(4));
        assert!(!state.remove_entity(4));
        assert!(state.entities().is_empty());
    }

    #[test]
    fn entities_iterate_in_id_order() {
        let mut state = SystemState::new("order".into(), Signature::EMPTY);
        for id in [9, 2, 5] {
            state.add_entity(id);
        }
        let ids: Vec<_> = state.entities().iter().copied().collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert!(state.contains(5));
        assert!(!state.is_initialized());
    }
}
