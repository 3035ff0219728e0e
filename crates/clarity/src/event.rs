//! # Event Bus — Check-and-Mark Message Queue
//!
//! A FIFO of `(sender, receiver, message)` records used for signalling
//! between systems and the engine. Nothing is dispatched: consumers poll with
//! [`EventBus::check_event`], which marks the first matching record as seen.
//! [`EventBus::update`] then drops every record that has been seen at least
//! once.
//!
//! ```text
//! add_event ──► [ e0 ][ e1* ][ e2 ][ e3* ]     (* = checked)
//!                         │
//!                 update()│ retain unchecked
//!                         ▼
//!               [ e0 ][ e2 ]
//! ```
//!
//! Checking does not hide a record from later checks in the same tick, so
//! several consumers of the same message all see it before it is reaped.
//!
//! The bus is owned by the [`Engine`](crate::engine::Engine) and lent to
//! systems through their [`SystemContext`](crate::ecs::SystemContext).

use std::collections::VecDeque;
use std::fmt;

/// Message sent by the graphics system when the window asks to close.
pub const TERMINATE_ENGINE: &str = "TerminateEngine";

/// Who sent, or who should read, an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventObject {
    Component,
    Entity,
    System,
    Engine,
    UserComponent,
    UserEntity,
    UserSystem,
}

/// One queued message. Only the `checked` flag changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    sender: EventObject,
    receiver: EventObject,
    message: String,
    checked: bool,
}

impl Event {
    pub fn new(sender: EventObject, receiver: EventObject, message: impl Into<String>) -> Self {
        Self {
            sender,
            receiver,
            message: message.into(),
            checked: false,
        }
    }

    pub fn sender(&self) -> EventObject {
        self.sender
    }

    pub fn receiver(&self) -> EventObject {
        self.receiver
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    fn matches(&self, sender: EventObject, receiver: EventObject, message: &str) -> bool {
        self.sender == sender && self.receiver == receiver && self.message == message
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} → {:?}: {}", self.sender, self.receiver, self.message)
    }
}

/// The engine-wide event queue.
#[derive(Debug, Default)]
pub struct EventBus {
    events: VecDeque<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: Event) {
        log::debug!("event queued: {event}");
        self.events.push_back(event);
    }

    /// Shorthand for `add_event(Event::new(..))`.
    pub fn post(&mut self, sender: EventObject, receiver: EventObject, message: impl Into<String>) {
        self.add_event(Event::new(sender, receiver, message));
    }

    /// Mark the oldest matching event as checked. Returns whether one was found.
    pub fn check_event(&mut self, sender: EventObject, receiver: EventObject, message: &str) -> bool {
        match self
            .events
            .iter_mut()
            .find(|event| event.matches(sender, receiver, message))
        {
            Some(event) => {
                event.checked = true;
                true
            }
            None => false,
        }
    }

    /// Drop every checked event, keeping the rest in order.
    pub fn update(&mut self) {
        self.events.retain(|event| !event.checked);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_marks_first_match_only() {
        let mut bus = EventBus::new();
        bus.post(EventObject::System, EventObject::Engine, "Ping");
        bus.post(EventObject::System, EventObject::Engine, "Ping");

        assert!(bus.check_event(EventObject::System, EventObject::Engine, "Ping"));
        let checked: Vec<_> = bus.iter().map(Event::is_checked).collect();
        assert_eq!(checked, vec![true, false]);
    }

    #[test]
    fn check_requires_exact_triple() {
        let mut bus = EventBus::new();
        bus.post(EventObject::System, EventObject::Engine, TERMINATE_ENGINE);
        assert!(!bus.check_event(EventObject::Engine, EventObject::System, TERMINATE_ENGINE));
        assert!(!bus.check_event(EventObject::System, EventObject::Engine, "terminateengine"));
        assert!(!bus.check_event(EventObject::UserSystem, EventObject::Engine, TERMINATE_ENGINE));
        assert!(bus.check_event(EventObject::System, EventObject::Engine, TERMINATE_ENGINE));
    }

    #[test]
    fn checked_event_stays_visible_until_update() {
        let mut bus = EventBus::new();
        bus.post(EventObject::UserEntity, EventObject::UserSystem, "Hit");
        assert!(bus.check_event(EventObject::UserEntity, EventObject::UserSystem, "Hit"));
        // A second consumer in the same tick still observes it.
        assert!(bus.check_event(EventObject::UserEntity, EventObject::UserSystem, "Hit"));

        bus.update();
        assert!(bus.is_empty());
        assert!(!bus.check_event(EventObject::UserEntity, EventObject::UserSystem, "Hit"));
    }

    #[test]
    fn update_keeps_unchecked_in_order() {
        let mut bus = EventBus::new();
        for message in ["a", "b", "c", "d"] {
            bus.post(EventObject::Component, EventObject::Entity, message);
        }
        bus.check_event(EventObject::Component, EventObject::Entity, "b");
        bus.check_event(EventObject::Component, EventObject::Entity, "c");
        bus.update();

        let left: Vec<_> = bus.iter().map(Event::message).collect();
        assert_eq!(left, vec!["a", "d"]);
    }

    #[test]
    fn update_handles_adjacent_checked_events() {
        let mut bus = EventBus::new();
        bus.post(EventObject::System, EventObject::System, "x");
        bus.post(EventObject::System, EventObject::System, "x");
        bus.check_event(EventObject::System, EventObject::System, "x");
        // Mark the second one too by checking again after the first is reaped.
        bus.update();
        bus.check_event(EventObject::System, EventObject::System, "x");
        bus.update();
        assert_eq!(bus.len(), 0);
    }
}
