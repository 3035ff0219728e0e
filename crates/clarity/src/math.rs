//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`] component holds position,
//! Euler rotation (degrees) and scale, plus the world matrix the physics
//! system composes from them.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::ecs::{Component, ComponentKind};

/// Where an entity is, how it is turned, and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub world_pos: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// `T · Rz · Ry · Rx · S`, refreshed by the physics system each tick.
    pub world_matrix: Mat4,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        world_pos: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        world_matrix: Mat4::IDENTITY,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::at(Vec3::new(x, y, z))
    }

    pub fn at(world_pos: Vec3) -> Self {
        let mut transform = Self {
            world_pos,
            ..Self::IDENTITY
        };
        transform.refresh_matrix();
        transform
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self.refresh_matrix();
        self
    }

    /// Recompute `world_matrix` from position, rotation and scale.
    pub fn refresh_matrix(&mut self) {
        self.world_matrix = compose_world_matrix(self.world_pos, self.rotation, self.scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform {
    const KIND: ComponentKind = ComponentKind::Transform;
}

/// `T(pos) · Rz · Ry · Rx · S(scale)` with rotation given in degrees.
pub fn compose_world_matrix(pos: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    let radians = Vec3::new(
        rotation_degrees.x.to_radians(),
        rotation_degrees.y.to_radians(),
        rotation_degrees.z.to_radians(),
    );
    Mat4::from_translation(pos)
        * Mat4::from_rotation_z(radians.z)
        * Mat4::from_rotation_y(radians.y)
        * Mat4::from_rotation_x(radians.x)
        * Mat4::from_scale(scale)
}
