//! # Input — Keys, Bindings, and the Input System
//!
//! Input flows in one direction, once per tick:
//!
//! ```text
//! window ──events──► Keyboard (raw buffer) ──raw state──► KeyBindContainer
//!                                                          (world entity)
//!                                                               │
//!                                      triggered events ◄───────┘
//!                                      "MovePositiveX", ...
//! ```
//!
//! Systems that react to input (the player controller) read the triggered
//! events off the world entity's container instead of looking at keys.

pub mod bindings;
pub mod keyboard;
pub mod keys;
pub mod system;

pub use bindings::{DEFAULT_BINDINGS, KeyBind, KeyBindContainer, KeyBindTable, KeyStatus};
pub use keyboard::{Keyboard, RawKeyState, SharedKeyboard};
pub use keys::Key;
pub use system::InputSystem;
