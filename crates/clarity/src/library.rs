//! # Library — Name-Keyed Shared Caches
//!
//! Mesh data and texture data are shared between every entity that uses
//! them. A [`Library`] owns one strong `Rc` per name; components only hold a
//! `Weak` into it, so dropping a component never frees a cache entry and
//! clearing the library invalidates every outstanding handle at once.
//!
//! ```text
//! Library<MeshData>
//!   "CubeMesh"     ──► Rc<MeshData> ◄─ ─ Weak ─ Mesh component (entity 1)
//!                                  ◄─ ─ Weak ─ Mesh component (entity 7)
//!   "TriangleMesh" ──► Rc<MeshData>
//! ```
//!
//! ## Comparison
//!
//! - **Bevy**: `Assets<T>` with strong/weak `Handle<T>` and async loading.
//! - **Our approach**: A `HashMap<String, Rc<T>>`, populated lazily and
//!   synchronously on first use.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// A cache of shared `T`s keyed by name (mesh type, texture path, ...).
pub struct Library<T> {
    items: HashMap<String, Rc<T>>,
}

impl<T> Library<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert `item` under `name`. If the name is taken the existing entry
    /// wins: `item` is discarded and a handle to the old one is returned.
    pub fn add_item(&mut self, name: impl Into<String>, item: T) -> Weak<T> {
        let name = name.into();
        if let Some(existing) = self.items.get(&name) {
            log::error!("library already holds an item named `{name}`, keeping the existing one");
            return Rc::downgrade(existing);
        }
        let rc = Rc::new(item);
        let handle = Rc::downgrade(&rc);
        self.items.insert(name, rc);
        handle
    }

    pub fn get(&self, name: &str) -> Option<Weak<T>> {
        self.items.get(name).map(Rc::downgrade)
    }

    /// Return the cached entry, or build, insert and return it.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        name: &str,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Weak<T>, E> {
        if let Some(existing) = self.items.get(name) {
            return Ok(Rc::downgrade(existing));
        }
        let item = build()?;
        Ok(self.add_item(name, item))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.items.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every entry. Outstanding `Weak` handles stop upgrading.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl<T> Default for Library<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_keeps_first_item() {
        let mut lib = Library::new();
        let first = lib.add_item("cube", 1);
        let second = lib.add_item("cube", 2);
        assert_eq!(lib.len(), 1);
        assert_eq!(*first.upgrade().unwrap(), 1);
        assert_eq!(*second.upgrade().unwrap(), 1);
    }

    #[test]
    fn lazy_insert_builds_once() {
        let mut lib: Library<String> = Library::new();
        let mut builds = 0;
        for _ in 0..3 {
            let handle = lib
                .get_or_try_insert_with("tex.png", || {
                    builds += 1;
                    Ok::<_, ()>("pixels".to_string())
                })
                .unwrap();
            assert_eq!(handle.upgrade().as_deref().map(String::as_str), Some("pixels"));
        }
        assert_eq!(builds, 1);
    }

    #[test]
    fn failed_build_inserts_nothing() {
        let mut lib: Library<u8> = Library::new();
        let result = lib.get_or_try_insert_with("bad", || Err("decode error"));
        assert_eq!(result.unwrap_err(), "decode error");
        assert!(!lib.contains("bad"));
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut lib = Library::new();
        let handle = lib.add_item("a", [0u8; 4]);
        assert!(handle.upgrade().is_some());
        lib.clear();
        assert!(handle.upgrade().is_none());
        assert!(lib.is_empty());
    }
}
