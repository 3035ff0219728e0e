//! # Player Controller
//!
//! Turns this tick's triggered input events into forces. The translation
//! and rotation for the whole tick are summed first, then added (never
//! assigned) to the [`Physics`] of every entity carrying a [`Controller`]:
//!
//! ```text
//! triggered events            force this tick          every {Controller, Physics}
//! ─────────────────           ───────────────          ───────────────────────────
//! MovePositiveX    ──►  applied  += ( 0.03, 0, 0) ──►  applied_force  += applied
//! RotateNegativeY  ──►  rotation += (0, -1°, 0)   ──►  rotation_force += rotation
//! ```
//!
//! The physics system runs later in the same tick and consumes the forces.

use crate::ecs::{Component, ComponentKind, Signature, System, SystemContext};
use crate::error::{SystemError, SystemResult};
use crate::input::KeyBindContainer;
use crate::math::Vec3;
use crate::physics::Physics;

/// Translation per move event, in world units.
pub const MOVE_STEP: f32 = 0.03;
/// Rotation per rotate event, in degrees.
pub const ROTATE_STEP: f32 = 1.0;

const MOVE_EVENTS: [(&str, Vec3); 6] = [
    ("MovePositiveX", Vec3::X),
    ("MoveNegativeX", Vec3::NEG_X),
    ("MovePositiveY", Vec3::Y),
    ("MoveNegativeY", Vec3::NEG_Y),
    ("MovePositiveZ", Vec3::Z),
    ("MoveNegativeZ", Vec3::NEG_Z),
];

const ROTATE_EVENTS: [(&str, Vec3); 6] = [
    ("RotatePositiveX", Vec3::X),
    ("RotateNegativeX", Vec3::NEG_X),
    ("RotatePositiveY", Vec3::Y),
    ("RotateNegativeY", Vec3::NEG_Y),
    ("RotatePositiveZ", Vec3::Z),
    ("RotateNegativeZ", Vec3::NEG_Z),
];

/// Marks an entity as driven by player input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controller;

impl Component for Controller {
    const KIND: ComponentKind = ComponentKind::Controller;
}

/// The translation and rotation the triggered events in `bindings` ask for.
pub fn forces_for(bindings: &KeyBindContainer) -> (Vec3, Vec3) {
    let sum = |table: &[(&str, Vec3)], step: f32| {
        table
            .iter()
            .filter(|(event, _)| bindings.check_event(event))
            .fold(Vec3::ZERO, |acc, &(_, dir)| acc + dir * step)
    };
    (sum(&MOVE_EVENTS, MOVE_STEP), sum(&ROTATE_EVENTS, ROTATE_STEP))
}

#[derive(Debug, Default)]
pub struct PlayerControllerSystem;

impl PlayerControllerSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for PlayerControllerSystem {
    fn signature(&self) -> Signature {
        Signature::of(&[ComponentKind::Controller, ComponentKind::Physics])
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
        let world_id = ctx.world.world_id();
        let Some(bindings) = ctx.world.get::<KeyBindContainer>(world_id) else {
            log::error!("world entity has no input component");
            return Err(SystemError::MissingWorldComponent(ComponentKind::Input));
        };
        let (applied, rotation) = forces_for(bindings);
        if applied == Vec3::ZERO && rotation == Vec3::ZERO {
            return Ok(());
        }

        for &id in ctx.entities {
            let Some(physics) = ctx.world.get_mut::<Physics>(id) else {
                log::error!("entity {id} has no physics component");
                continue;
            };
            physics.applied_force += applied;
            physics.rotation_force += rotation;
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
    use crate::math::Transform;
    use crate::memory::MemoryManager;
    use crate::physics::PhysicsSystem;

    fn bindings_mut(ecs: &mut Ecs) -> &mut KeyBindContainer {
        let world = ecs.world_id();
        ecs.get_component_mut::<KeyBindContainer>(world).unwrap()
    }

    fn setup() -> (Ecs, u32) {
        let mut ecs = Ecs::new(Arc::new(MemoryManager::new()));
        let world = ecs.world_id();
        ecs.add_component(world, KeyBindContainer::new()).unwrap();
        ecs.add_system("controller", PlayerControllerSystem::new());
        ecs.add_system("physics", PhysicsSystem::new());

        let e = ecs.create_entity();
        ecs.add_component(e, Transform::default()).unwrap();
        ecs.add_component(e, Physics::default()).unwrap();
        ecs.add_component(e, Controller).unwrap();
        (ecs, e)
    }

    #[test]
    fn opposing_events_cancel() {
        let mut container = KeyBindContainer::new();
        container.trigger_event("MovePositiveX");
        container.trigger_event("MoveNegativeX");
        container.trigger_event("RotatePositiveZ");
        let (applied, rotation) = forces_for(&container);
        assert_eq!(applied, Vec3::ZERO);
        assert_eq!(rotation, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn move_event_translates_entity_through_physics() {
        let (mut ecs, e) = setup();
        bindings_mut(&mut ecs).trigger_event("MovePositiveX");

        ecs.update(0.0, &mut EventBus::new()).unwrap();

        let t = ecs.get_component::<Transform>(e).unwrap();
        assert!(t.world_pos.abs_diff_eq(Vec3::new(0.03, 0.0, 0.0), 1e-6));
        let p = ecs.get_component::<Physics>(e).unwrap();
        assert_eq!(p.applied_force, Vec3::ZERO);
    }

    #[test]
    fn forces_add_to_existing_ones() {
        let mut ecs = Ecs::new(Arc::new(MemoryManager::new()));
        let world = ecs.world_id();
        ecs.add_component(world, KeyBindContainer::new()).unwrap();
        ecs.add_system("controller", PlayerControllerSystem::new());
        let e = ecs.create_entity();
        ecs.add_component(e, Physics::default()).unwrap();
        ecs.add_component(e, Controller).unwrap();

        ecs.get_component_mut::<Physics>(e).unwrap().applied_force = Vec3::new(0.0, 1.0, 0.0);
        bindings_mut(&mut ecs).trigger_event("MovePositiveY");
        bindings_mut(&mut ecs).trigger_event("RotateNegativeY");
        ecs.update(0.0, &mut EventBus::new()).unwrap();

        let p = ecs.get_component::<Physics>(e).unwrap();
        assert!(p.applied_force.abs_diff_eq(Vec3::new(0.0, 1.03, 0.0), 1e-6));
        assert_eq!(p.rotation_force, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn entities_without_controller_are_untouched() {
        let (mut ecs, _) = setup();
        let bystander = ecs.create_entity();
        ecs.add_component(bystander, Transform::default()).unwrap();
        ecs.add_component(bystander, Physics::default()).unwrap();
        bindings_mut(&mut ecs).trigger_event("MoveNegativeZ");

        ecs.update(0.0, &mut EventBus::new()).unwrap();
        let t = ecs.get_component::<Transform>(bystander).unwrap();
        assert_eq!(t.world_pos, Vec3::ZERO);
    }

    #[test]
    fn missing_world_input_fails_update() {
        let mut ecs = Ecs::new(Arc::new(MemoryManager::new()));
        ecs.add_system("controller", PlayerControllerSystem::new());
        assert!(ecs.update(0.0, &mut EventBus::new()).is_err());
    }
}
