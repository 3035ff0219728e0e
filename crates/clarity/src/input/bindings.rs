//! # Key Bindings — The Keybind Container
//!
//! The [`KeyBindContainer`] is the `Input` component. One instance lives on
//! the world entity and maps keys to named events:
//!
//! ```text
//! Key ──► KeyBind { trigger: Down, event: "MovePositiveY", current: Held }
//!                                                               │
//!                          fires? (current matches trigger) ◄───┘
//!                                   │
//!                                   ▼
//!                      triggered = { "MovePositiveY", ... }   (cleared every tick)
//! ```
//!
//! ## Key State Machine
//!
//! Every tick each bound key moves according to the raw state the keyboard
//! buffer reports:
//!
//! | raw        | prior      | next       |
//! |------------|------------|------------|
//! | Pressed    | Triggered  | Held       |
//! | Pressed    | other      | Triggered  |
//! | Repeat     | any        | Held       |
//! | Released   | any        | Released   |
//! | None       | any        | None       |
//!
//! A binding with trigger `Down` fires on `Triggered` or `Held`; every other
//! trigger fires on an exact match.
//!
//! ## Tables on Disk
//!
//! Bindings can be loaded from JSON. Keys are given by name or by code:
//!
//! ```json
//! { "bindings": [
//!     { "key": "W", "trigger": "Down", "event": "MovePositiveY" },
//!     { "key": 32,  "trigger": "Triggered", "event": "Jump" }
//! ] }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::keyboard::RawKeyState;
use super::keys::Key;
use crate::ecs::{Component, ComponentKind};
use crate::error::AssetError;

/// Per-key state, and the condition a binding waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyStatus {
    #[default]
    None,
    /// Went down this tick.
    Triggered,
    /// Down for more than one tick.
    Held,
    /// Trigger-only: Triggered or Held.
    Down,
    /// Went up this tick.
    Released,
}

impl KeyStatus {
    /// Apply one tick of raw input.
    pub fn next(self, raw: RawKeyState) -> KeyStatus {
        match raw {
            RawKeyState::Pressed if self == KeyStatus::Triggered => KeyStatus::Held,
            RawKeyState::Pressed => KeyStatus::Triggered,
            RawKeyState::Repeat => KeyStatus::Held,
            RawKeyState::Released => KeyStatus::Released,
            RawKeyState::None => KeyStatus::None,
        }
    }

    /// Whether a key currently in `current` satisfies this trigger.
    pub fn is_satisfied_by(self, current: KeyStatus) -> bool {
        current == self
            || (self == KeyStatus::Down
                && matches!(current, KeyStatus::Triggered | KeyStatus::Held))
    }
}

/// One binding: what to wait for, what to emit, and where the key is now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBind {
    pub trigger: KeyStatus,
    pub event: String,
    pub current: KeyStatus,
}

impl KeyBind {
    pub fn fires(&self) -> bool {
        self.trigger.is_satisfied_by(self.current)
    }
}

/// The bindings shipped with the engine: WASD/IK move, UOJLQE rotate.
pub const DEFAULT_BINDINGS: &[(Key, KeyStatus, &str)] = &[
    (Key::W, KeyStatus::Down, "MovePositiveY"),
    (Key::S, KeyStatus::Down, "MoveNegativeY"),
    (Key::D, KeyStatus::Down, "MovePositiveX"),
    (Key::A, KeyStatus::Down, "MoveNegativeX"),
    (Key::I, KeyStatus::Down, "MovePositiveZ"),
    (Key::K, KeyStatus::Down, "MoveNegativeZ"),
    (Key::U, KeyStatus::Down, "RotatePositiveX"),
    (Key::O, KeyStatus::Down, "RotateNegativeX"),
    (Key::J, KeyStatus::Down, "RotatePositiveY"),
    (Key::L, KeyStatus::Down, "RotateNegativeY"),
    (Key::Q, KeyStatus::Down, "RotatePositiveZ"),
    (Key::E, KeyStatus::Down, "RotateNegativeZ"),
];

/// The `Input` component: key bindings plus this tick's triggered events.
#[derive(Debug, Default)]
pub struct KeyBindContainer {
    bindings: BTreeMap<Key, KeyBind>,
    triggered: HashSet<String>,
}

impl Component for KeyBindContainer {
    const KIND: ComponentKind = ComponentKind::Input;
}

impl KeyBindContainer {
    /// A container with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A container holding [`DEFAULT_BINDINGS`].
    pub fn with_defaults() -> Self {
        let mut container = Self::new();
        for &(key, trigger, event) in DEFAULT_BINDINGS {
            container.bind_key(key, trigger, event);
        }
        container
    }

    /// Bind `key`, replacing any existing binding for it.
    pub fn bind_key(&mut self, key: Key, trigger: KeyStatus, event: impl Into<String>) {
        let event = event.into();
        let bind = KeyBind {
            trigger,
            event,
            current: KeyStatus::None,
        };
        if let Some(old) = self.bindings.get(&key) {
            log::info!(
                "rebinding {key}: {:?} {} → {:?} {}",
                old.trigger,
                old.event,
                bind.trigger,
                bind.event
            );
        }
        self.bindings.insert(key, bind);
    }

    /// Remove the binding for `key`. Returns `false` (and logs) if there was none.
    pub fn unbind_key(&mut self, key: Key) -> bool {
        if self.bindings.remove(&key).is_none() {
            log::error!("cannot unbind {key}: key is not bound");
            return false;
        }
        true
    }

    pub fn binding(&self, key: Key) -> Option<&KeyBind> {
        self.bindings.get(&key)
    }

    /// Bindings in key-code order.
    pub fn bindings(&self) -> impl Iterator<Item = (Key, &KeyBind)> {
        self.bindings.iter().map(|(&key, bind)| (key, bind))
    }

    /// The current state of a bound key; `None` for unbound keys.
    pub fn key_status(&self, key: Key) -> KeyStatus {
        self.bindings
            .get(&key)
            .map(|bind| bind.current)
            .unwrap_or_default()
    }

    /// Whether `event` was emitted this tick.
    pub fn check_event(&self, event: &str) -> bool {
        self.triggered.contains(event)
    }

    pub fn trigger_event(&mut self, event: impl Into<String>) {
        self.triggered.insert(event.into());
    }

    pub fn clear_triggered_events(&mut self) {
        self.triggered.clear();
    }

    pub fn triggered_events(&self) -> impl Iterator<Item = &str> {
        self.triggered.iter().map(String::as_str)
    }

    /// Run one tick: clear last tick's events, step every binding's state
    /// machine from `raw`, and emit the events whose trigger now holds.
    pub fn tick(&mut self, raw: impl Fn(Key) -> RawKeyState) {
        self.triggered.clear();
        for (&key, bind) in self.bindings.iter_mut() {
            bind.current = bind.current.next(raw(key));
            if bind.fires() {
                self.triggered.insert(bind.event.clone());
            }
        }
    }

    /// Load a keybind table (see the module docs for the format).
    pub fn from_json(json: &str, origin: &str) -> Result<Self, AssetError> {
        let table: KeyBindTable = serde_json::from_str(json).map_err(|source| AssetError::Json {
            origin: origin.to_owned(),
            source,
        })?;
        let mut container = Self::new();
        for entry in table.bindings {
            container.bind_key(entry.key, entry.trigger, entry.event);
        }
        Ok(container)
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_owned(),
            source,
        })?;
        let container = Self::from_json(&json, &path.display().to_string())?;
        log::info!("loaded {} key bindings from {}", container.bindings.len(), path.display());
        Ok(container)
    }

    /// The bindings as a table that [`from_json`](Self::from_json) reads back.
    pub fn to_table(&self) -> KeyBindTable {
        KeyBindTable {
            bindings: self
                .bindings
                .iter()
                .map(|(&key, bind)| KeyBindEntry {
                    key,
                    trigger: bind.trigger,
                    event: bind.event.clone(),
                })
                .collect(),
        }
    }
}

/// On-disk keybind table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindTable {
    pub bindings: Vec<KeyBindEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindEntry {
    pub key: Key,
    pub trigger: KeyStatus,
    pub event: String,
}
