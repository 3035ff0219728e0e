//! # Component — Kinds, Trait, and Per-Kind Storage
//!
//! Component kinds form a closed enumeration. Each kind has a fixed slot
//! (its bit in a [`Signature`](super::signature::Signature)) and a name for
//! diagnostics.
//!
//! Concrete component types implement [`Component`], which attaches the kind
//! as an associated constant. Lookups are typed by that constant, so asking
//! for a `Transform` can only ever search the Transform map and downcast to
//! `Transform`:
//!
//! ```text
//! get::<Transform>(id)
//!   │
//!   ├─ Transform::KIND.slot() = 2
//!   ├─ maps[2].get(id)          → &StoredComponent
//!   └─ value.as_any().downcast_ref::<Transform>()
//! ```
//!
//! ## Storage Layout
//!
//! ```text
//! ComponentStore
//!   maps: [HashMap<EntityId, StoredComponent>; K]
//!            │
//!            └─ StoredComponent { value: Box<dyn AnyComponent>, adopted }
//! ```
//!
//! One map per kind, keyed by entity. No archetypes or chunks; iteration
//! order is whatever the system's own entity set says.
//!
//! ## Adopted Components
//!
//! Most components are allocated through the
//! [`MemoryManager`](crate::memory::MemoryManager). Singletons built outside
//! the ECS (the keybind container) are *adopted* instead; the store owns the
//! box, but the entry is flagged so tearing it down does not count a
//! deallocation that was never allocated.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::entity::EntityId;

/// Every component kind the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Mesh,
    Texture,
    Transform,
    Physics,
    /// The keybind container. Lives on the world entity.
    Input,
    Controller,
}

impl ComponentKind {
    pub const COUNT: usize = 6;

    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Mesh,
        ComponentKind::Texture,
        ComponentKind::Transform,
        ComponentKind::Physics,
        ComponentKind::Input,
        ComponentKind::Controller,
    ];

    /// Bit index in a signature, and index into the store.
    pub const fn slot(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::Mesh => "Mesh",
            ComponentKind::Texture => "Texture",
            ComponentKind::Transform => "Transform",
            ComponentKind::Physics => "Physics",
            ComponentKind::Input => "Input",
            ComponentKind::Controller => "Controller",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed piece of per-entity data.
///
/// ```ignore
/// struct Health(u32);
/// impl Component for Health {
///     const KIND: ComponentKind = ComponentKind::Controller;
/// }
/// ```
pub trait Component: Any {
    const KIND: ComponentKind;
}

/// The object-safe face of a [`Component`]: report the kind, allow downcasts.
/// Dropping the box destructs it.
pub trait AnyComponent: Any {
    fn kind(&self) -> ComponentKind;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponent for T {
    fn kind(&self) -> ComponentKind {
        T::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One entry in the store.
pub(crate) struct StoredComponent {
    pub value: Box<dyn AnyComponent>,
    /// Inserted by adoption rather than allocated through the memory manager.
    pub adopted: bool,
}

/// Per-kind maps from entity to owned component.
pub(crate) struct ComponentStore {
    maps: [HashMap<EntityId, StoredComponent>; ComponentKind::COUNT],
}

impl ComponentStore {
    pub fn new() -> Self {
        Self {
            maps: std::array::from_fn(|_| HashMap::new()),
        }
    }

    /// Insert under the component's own kind. Hands the entry back if the
    /// slot is already occupied.
    pub fn insert(
        &mut self,
        entity: EntityId,
        stored: StoredComponent,
    ) -> Result<(), StoredComponent> {
        let map = &mut self.maps[stored.value.kind().slot()];
        if map.contains_key(&entity) {
            return Err(stored);
        }
        map.insert(entity, stored);
        Ok(())
    }

    pub fn remove(&mut self, entity: EntityId, kind: ComponentKind) -> Option<StoredComponent> {
        self.maps[kind.slot()].remove(&entity)
    }

    pub fn contains(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.maps[kind.slot()].contains_key(&entity)
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.maps[T::KIND.slot()]
            .get(&entity)
            .and_then(|stored| stored.value.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.maps[T::KIND.slot()]
            .get_mut(&entity)
            .and_then(|stored| stored.value.as_any_mut().downcast_mut::<T>())
    }

    /// Remove every component `entity` owns, in slot order.
    pub fn remove_all(&mut self, entity: EntityId) -> Vec<StoredComponent> {
        self.maps
            .iter_mut()
            .filter_map(|map| map.remove(&entity))
            .collect()
    }

    /// Empty the whole store.
    pub fn drain(&mut self) -> Vec<StoredComponent> {
        self.maps
            .iter_mut()
            .flat_map(|map| map.drain().map(|(_, stored)| stored))
            .collect()
    }

    pub fn len(&self, kind: ComponentKind) -> usize {
        self.maps[kind.slot()].len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);
    impl Component for Marker {
        const KIND: ComponentKind = ComponentKind::Controller;
    }

    struct Other;
    impl Component for Other {
        const KIND: ComponentKind = ComponentKind::Mesh;
    }

    fn stored<T: Component>(value: T) -> StoredComponent {
        StoredComponent {
            value: Box::new(value),
            adopted: false,
        }
    }

    #[test]
    fn slots_are_unique_and_dense() {
        for (i, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.slot(), i);
        }
        assert_eq!(ComponentKind::Input.name(), "Input");
    }

    #[test]
    fn insert_get_remove() {
        let mut store = ComponentStore::new();
        assert!(store.insert(3, stored(Marker(9))).is_ok());
        assert_eq!(store.get::<Marker>(3), Some(&Marker(9)));
        assert!(store.get::<Other>(3).is_none());
        assert!(store.get::<Marker>(4).is_none());

        store.get_mut::<Marker>(3).unwrap().0 = 10;
        assert_eq!(store.get::<Marker>(3), Some(&Marker(10)));

        let removed = store.remove(3, ComponentKind::Controller).unwrap();
        assert_eq!(removed.value.kind(), ComponentKind::Controller);
        assert!(!store.contains(3, ComponentKind::Controller));
    }

    #[test]
    fn duplicate_insert_hands_entry_back() {
        let mut store = ComponentStore::new();
        store.insert(1, stored(Marker(1))).ok().unwrap();
        let rejected = store.insert(1, stored(Marker(2))).unwrap_err();
        let value = rejected.value.as_any().downcast_ref::<Marker>().unwrap();
        assert_eq!(value, &Marker(2));
        assert_eq!(store.get::<Marker>(1), Some(&Marker(1)));
        assert_eq!(store.len(ComponentKind::Controller), 1);
    }

    #[test]
    fn remove_all_drops_values() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);
        struct Tracked;
        impl Component for Tracked {
            const KIND: ComponentKind = ComponentKind::Physics;
        }
        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let mut store = ComponentStore::new();
        store.insert(5, stored(Tracked)).ok().unwrap();
        store.insert(5, stored(Marker(0))).ok().unwrap();
        store.insert(6, stored(Tracked)).ok().unwrap();

        let removed = store.remove_all(5);
        assert_eq!(removed.len(), 2);
        drop(removed);
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
        assert!(store.contains(6, ComponentKind::Physics));

        drop(store.drain());
        assert_eq!(DROPS.load(Ordering::SeqCst), 2);
    }
}
