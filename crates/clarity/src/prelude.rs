//! Convenience re-exports: `use clarity::prelude::*` for the common items.

pub use crate::config::{BackendKind, CameraConfig, EngineConfig, WindowConfig};
pub use crate::controller::{Controller, PlayerControllerSystem};
pub use crate::ecs::{Component, ComponentKind, Ecs, EntityId, Signature, System, SystemContext, World};
pub use crate::engine::Engine;
pub use crate::error::{AssetError, EcsError, GraphicsError, LifecycleError, SystemError};
pub use crate::event::{EventBus, EventObject, TERMINATE_ENGINE};
pub use crate::graphics::{
    GraphicsSystem, HeadlessBackend, Mesh, MeshData, MeshType, RenderBackend, Texture, TextureData,
};
pub use crate::input::{InputSystem, Key, KeyBindContainer, KeyStatus, Keyboard};
pub use crate::library::Library;
pub use crate::math::{Mat4, Transform, Vec3};
pub use crate::memory::MemoryManager;
pub use crate::physics::{Physics, PhysicsSystem};
pub use crate::time::Clock;
