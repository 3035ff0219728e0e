//! # Signature-Indexed ECS
//!
//! The kernel of the engine: identity allocation, typed component storage,
//! bitmask signatures, and the system registry that drives the lifecycle.
//!
//! ## Module Overview
//!
//! - [`entity`]: `u32` IDs with FIFO recycling
//! - [`signature`]: 64-bit component masks and superset matching
//! - [`component`]: component kinds, the [`Component`] trait, per-kind maps
//! - [`world`]: entities + signatures + components, kept consistent
//! - [`system`]: the [`System`] trait and per-system bookkeeping
//! - [`manager`]: the [`Ecs`] tying the world to its systems

pub mod component;
pub mod entity;
pub mod manager;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, ComponentKind};
pub use entity::EntityId;
pub use manager::Ecs;
pub use signature::{MAX_COMPONENT_KINDS, Signature};
pub use system::{System, SystemContext, SystemState};
pub use world::World;
