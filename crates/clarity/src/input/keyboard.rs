//! Polled keyboard state.
//!
//! The [`Keyboard`] buffer sits between the window and the input system.
//! The window pushes key-down/key-up events into it as they arrive; the
//! input system reads one [`RawKeyState`] per bound key once per tick and
//! then ages the buffer:
//!
//! ```text
//! window event        buffer after event    after advance()
//! ─────────────       ──────────────────    ───────────────
//! key down            Pressed               Repeat
//! (still held)        Repeat                Repeat
//! key up              Released              None
//! ```
//!
//! A press and release landing inside the same tick still reads as
//! `Released`, so a quick tap is never lost entirely.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use super::keys::Key;

/// What the window reported for a key since the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawKeyState {
    #[default]
    None,
    /// Went down since the last tick.
    Pressed,
    /// Still down (held through at least one tick, or an OS auto-repeat).
    Repeat,
    /// Went up since the last tick.
    Released,
}

/// Keyboard buffer shared between the window backend and the input system.
pub type SharedKeyboard = Rc<RefCell<Keyboard>>;

/// Tracks the raw state of every bindable key.
#[derive(Debug, Default)]
pub struct Keyboard {
    states: HashMap<Key, RawKeyState>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedKeyboard {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Record a key-down. `repeat` is the OS auto-repeat flag.
    pub fn press(&mut self, key: Key, repeat: bool) {
        let state = self.states.entry(key).or_default();
        *state = match (*state, repeat) {
            (RawKeyState::Pressed | RawKeyState::Repeat, _) | (_, true) => RawKeyState::Repeat,
            _ => RawKeyState::Pressed,
        };
    }

    pub fn release(&mut self, key: Key) {
        self.states.insert(key, RawKeyState::Released);
    }

    /// Route a winit keyboard event. Keys outside the bindable set are ignored.
    pub fn handle_event(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        self.handle_key_code(code, state, repeat);
    }

    pub fn handle_key_code(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        let Some(key) = Key::from_key_code(code) else {
            return;
        };
        match state {
            ElementState::Pressed => self.press(key, repeat),
            ElementState::Released => self.release(key),
        }
    }

    pub fn raw_state(&self, key: Key) -> RawKeyState {
        self.states.get(&key).copied().unwrap_or_default()
    }

    /// Age the buffer by one tick: `Pressed` becomes `Repeat`, `Released`
    /// becomes `None`.
    pub fn advance(&mut self) {
        self.states.retain(|_, state| match state {
            RawKeyState::Pressed => {
                *state = RawKeyState::Repeat;
                true
            }
            RawKeyState::Repeat => true,
            RawKeyState::Released | RawKeyState::None => false,
        });
    }

    /// Forget everything (focus lost).
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_hold_release_cycle() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.raw_state(Key::W), RawKeyState::None);

        kb.press(Key::W, false);
        assert_eq!(kb.raw_state(Key::W), RawKeyState::Pressed);
        kb.advance();
        assert_eq!(kb.raw_state(Key::W), RawKeyState::Repeat);
        kb.advance();
        assert_eq!(kb.raw_state(Key::W), RawKeyState::Repeat);

        kb.release(Key::W);
        assert_eq!(kb.raw_state(Key::W), RawKeyState::Released);
        kb.advance();
        assert_eq!(kb.raw_state(Key::W), RawKeyState::None);
    }

    #[test]
    fn os_repeat_events_read_as_repeat() {
        let mut kb = Keyboard::new();
        kb.press(Key::A, false);
        kb.press(Key::A, true);
        assert_eq!(kb.raw_state(Key::A), RawKeyState::Repeat);

        let mut fresh = Keyboard::new();
        fresh.press(Key::A, true);
        assert_eq!(fresh.raw_state(Key::A), RawKeyState::Repeat);
    }

    #[test]
    fn tap_within_one_tick_reads_released() {
        let mut kb = Keyboard::new();
        kb.press(Key::Space, false);
        kb.release(Key::Space);
        assert_eq!(kb.raw_state(Key::Space), RawKeyState::Released);
    }

    #[test]
    fn winit_events_are_mapped() {
        let mut kb = Keyboard::new();
        kb.handle_event(PhysicalKey::Code(KeyCode::KeyD), ElementState::Pressed, false);
        kb.handle_key_code(KeyCode::Escape, ElementState::Pressed, false);
        assert_eq!(kb.raw_state(Key::D), RawKeyState::Pressed);
        kb.handle_key_code(KeyCode::KeyD, ElementState::Released, false);
        assert_eq!(kb.raw_state(Key::D), RawKeyState::Released);
    }
}
