//! # Clarity — A Small Signature-Indexed ECS Engine
//!
//! Entities are `u32` IDs, components live in per-kind maps, and systems
//! receive every entity whose component signature is a superset of theirs.
//! The [`Engine`](engine::Engine) wires four systems together (graphics,
//! input, control, physics) and drives them with a
//! startup / run / exit loop.
//!
//! Start with `use clarity::prelude::*`.

pub mod config;
pub mod controller;
pub mod diag;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod event;
pub mod graphics;
pub mod input;
pub mod library;
pub mod math;
pub mod memory;
pub mod physics;
pub mod prelude;
pub mod time;
