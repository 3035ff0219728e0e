//! # Physics — Force Integration
//!
//! [`PhysicsSystem`] runs over every entity with a [`Transform`] and a
//! [`Physics`] component. Each tick it:
//!
//! 1. adds `applied_force` to the position and `rotation_force` (degrees)
//!    to the rotation,
//! 2. rebuilds the world matrix as `T · Rz · Ry · Rx · S`,
//! 3. zeroes both forces so the next tick starts from nothing.
//!
//! Forces are per-tick deltas. `dt` is accepted but not used; the engine
//! passes 0.
//!
//! Whoever wants to move an entity adds to its forces before this system
//! runs (the player controller does, every tick). Additions from several
//! systems sum.

use crate::ecs::{Component, ComponentKind, Signature, System, SystemContext};
use crate::error::SystemResult;
use crate::math::{Transform, Vec3};

/// Gravity used until [`PhysicsSystem::set_gravity`] says otherwise.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Per-entity motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub acceleration: Vec3,
    pub velocity: Vec3,
    /// Translation to apply this tick. Cleared after integration.
    pub applied_force: Vec3,
    /// Rotation (degrees) to apply this tick. Cleared after integration.
    pub rotation_force: Vec3,
    pub speed: f32,
    pub gravity_on: bool,
    pub collision_on: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            acceleration: Vec3::ZERO,
            velocity: Vec3::ZERO,
            applied_force: Vec3::ZERO,
            rotation_force: Vec3::ZERO,
            speed: 0.05,
            gravity_on: true,
            collision_on: true,
        }
    }
}

impl Component for Physics {
    const KIND: ComponentKind = ComponentKind::Physics;
}

/// Integrates forces into transforms.
#[derive(Debug)]
pub struct PhysicsSystem {
    gravity: Vec3,
}

impl PhysicsSystem {
    pub fn new() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn reset_gravity(&mut self) {
        self.gravity = DEFAULT_GRAVITY;
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PhysicsSystem {
    fn signature(&self) -> Signature {
        Signature::of(&[ComponentKind::Transform, ComponentKind::Physics])
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
        for &id in ctx.entities {
            let Some(physics) = ctx.world.get_mut::<Physics>(id) else {
                log::error!("entity {id} has no physics component");
                continue;
            };
            let applied = std::mem::take(&mut physics.applied_force);
            let rotation = std::mem::take(&mut physics.rotation_force);

            let Some(transform) = ctx.world.get_mut::<Transform>(id) else {
                log::error!("entity {id} has no transform component");
                continue;
            };
            transform.world_pos += applied;
            transform.rotation += rotation;
            transform.refresh_matrix();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ecs::Ecs;
    use crate::event::EventBus;
    use crate::math::{Mat4, compose_world_matrix};
    use crate::memory::MemoryManager;

    fn setup() -> (Ecs, u32) {
        let mut ecs = Ecs::new(Arc::new(MemoryManager::new()));
        ecs.add_system("physics", PhysicsSystem::new());
        let e = ecs.create_entity();
        ecs.add_component(e, Transform::default()).unwrap();
        ecs.add_component(e, Physics::default()).unwrap();
        (ecs, e)
    }

    #[test]
    fn defaults_match_engine_constants() {
        let p = Physics::default();
        assert_eq!(p.speed, 0.05);
        assert!(p.gravity_on && p.collision_on);
        assert_eq!(p.applied_force, Vec3::ZERO);
    }

    #[test]
    fn applied_force_moves_and_clears() {
        let (mut ecs, e) = setup();
        ecs.get_component_mut::<Physics>(e).unwrap().applied_force = Vec3::new(0.03, 0.0, 0.0);

        ecs.update(0.0, &mut EventBus::new()).unwrap();

        let t = ecs.get_component::<Transform>(e).unwrap();
        assert!(t.world_pos.abs_diff_eq(Vec3::new(0.03, 0.0, 0.0), 1e-6));
        assert!(t.world_matrix.abs_diff_eq(Mat4::from_translation(t.world_pos), 1e-6));
        let p = ecs.get_component::<Physics>(e).unwrap();
        assert_eq!(p.applied_force, Vec3::ZERO);
        assert_eq!(p.rotation_force, Vec3::ZERO);
    }

    #[test]
    fn rotation_force_accumulates_in_degrees() {
        let (mut ecs, e) = setup();
        let mut events = EventBus::new();
        for _ in 0..3 {
            ecs.get_component_mut::<Physics>(e).unwrap().rotation_force.y += 1.0;
            ecs.update(0.0, &mut events).unwrap();
        }
        let t = ecs.get_component::<Transform>(e).unwrap();
        assert!((t.rotation.y - 3.0).abs() < 1e-6);
        let expected = compose_world_matrix(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), Vec3::ONE);
        assert!(t.world_matrix.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn entity_without_forces_is_still_refreshed() {
        let (mut ecs, e) = setup();
        {
            let t = ecs.get_component_mut::<Transform>(e).unwrap();
            t.scale = Vec3::splat(2.0);
        }
        ecs.update(0.0, &mut EventBus::new()).unwrap();
        let t = ecs.get_component::<Transform>(e).unwrap();
        assert!(t.world_matrix.abs_diff_eq(Mat4::from_scale(Vec3::splat(2.0)), 1e-6));
    }

    #[test]
    fn gravity_can_be_overridden_and_reset() {
        let mut system = PhysicsSystem::new();
        assert_eq!(system.gravity(), DEFAULT_GRAVITY);
        system.set_gravity(Vec3::new(0.0, -1.62, 0.0));
        assert_eq!(system.gravity().y, -1.62);
        system.reset_gravity();
        assert_eq!(system.gravity(), DEFAULT_GRAVITY);
    }
}
