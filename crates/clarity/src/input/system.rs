//! The input system: feeds the keyboard buffer into the world's bindings.

use super::bindings::KeyBindContainer;
use super::keyboard::SharedKeyboard;
use crate::ecs::{ComponentKind, Signature, System, SystemContext};
use crate::error::{SystemError, SystemResult};

/// Steps the [`KeyBindContainer`] on the world entity once per tick.
///
/// The signature is `{Input}`, but the system only ever reads the world
/// entity's container; the world entity is never part of a system's entity
/// set, so the set itself is usually empty.
pub struct InputSystem {
    keyboard: SharedKeyboard,
}

impl InputSystem {
    pub fn new(keyboard: SharedKeyboard) -> Self {
        Self { keyboard }
    }

    pub fn keyboard(&self) -> &SharedKeyboard {
        &self.keyboard
    }
}

impl System for InputSystem {
    fn signature(&self) -> Signature {
        Signature::of(&[ComponentKind::Input])
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
        let world_id = ctx.world.world_id();
        let Some(bindings) = ctx.world.get_mut::<KeyBindContainer>(world_id) else {
            log::error!("world entity has no input component");
            return Err(SystemError::MissingWorldComponent(ComponentKind::Input));
        };
        let mut keyboard = self.keyboard.borrow_mut();
        bindings.tick(|key| keyboard.raw_state(key));
        keyboard.advance();
        Ok(())
    }
}
