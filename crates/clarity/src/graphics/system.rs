//! The graphics system: window lifecycle and one draw per matching entity.

use super::backend::{DrawItem, FrameSetup, RenderBackend};
use super::mesh::Mesh;
use super::texture::Texture;
use crate::config::{CameraConfig, WindowConfig};
use crate::ecs::{ComponentKind, Signature, System, SystemContext};
use crate::error::SystemResult;
use crate::event::{EventObject, TERMINATE_ENGINE};
use crate::math::Transform;

/// Draws every entity with a Mesh, a Texture and a Transform.
///
/// Runs first in the update phase so a close request is turned into a
/// `TerminateEngine` event before any other system does work.
pub struct GraphicsSystem {
    backend: Box<dyn RenderBackend>,
    window: WindowConfig,
    camera: CameraConfig,
    clear_color: [f64; 4],
}

impl GraphicsSystem {
    pub fn new(
        backend: Box<dyn RenderBackend>,
        window: WindowConfig,
        camera: CameraConfig,
        clear_color: [f64; 4],
    ) -> Self {
        Self {
            backend,
            window,
            camera,
            clear_color,
        }
    }

    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: CameraConfig) {
        self.camera = camera;
    }
}

impl System for GraphicsSystem {
    fn signature(&self) -> Signature {
        Signature::of(&[ComponentKind::Mesh, ComponentKind::Texture, ComponentKind::Transform])
    }

    fn initialize(&mut self, _ctx: &mut SystemContext<'_>) -> SystemResult {
        log::info!("graphics initializing");
        self.backend.initialize(&self.window)?;
        Ok(())
    }

    fn load(&mut self, _ctx: &mut SystemContext<'_>) -> SystemResult {
        log::info!("graphics loading");
        Ok(())
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
        if self.backend.close_requested() {
            ctx.events
                .post(EventObject::System, EventObject::Engine, TERMINATE_ENGINE);
        }
        self.backend.poll_events();
        Ok(())
    }

    fn render(&mut self, ctx: &mut SystemContext<'_>) -> SystemResult {
        self.backend.begin_frame(&FrameSetup {
            view: self.camera.view(),
            projection: self.camera.projection(),
            clear_color: self.clear_color,
        })?;

        for &id in ctx.entities {
            let (Some(mesh), Some(texture), Some(transform)) = (
                ctx.world.get::<Mesh>(id),
                ctx.world.get::<Texture>(id),
                ctx.world.get::<Transform>(id),
            ) else {
                log::error!("entity {id} is missing a render component");
                continue;
            };
            let Some(mesh_data) = mesh.data() else {
                log::warn!("mesh `{}` of entity {id} is no longer loaded", mesh.name());
                continue;
            };
            if !mesh_data.is_drawable() {
                log::debug!("mesh `{}` has no geometry, skipping entity {id}", mesh.name());
                continue;
            }
            let Some(texture_data) = texture.data() else {
                log::warn!("texture {} of entity {id} is no longer loaded", texture.path());
                continue;
            };
            self.backend.draw(DrawItem {
                mesh: &mesh_data,
                texture: &texture_data,
                model: transform.world_matrix,
                tint: texture.tint,
                alpha: texture.alpha,
            })?;
        }

        self.backend.end_frame()?;
        Ok(())
    }

    fn unload(&mut self, _ctx: &mut SystemContext<'_>) -> SystemResult {
        log::info!("graphics unloading");
        Ok(())
    }

    fn terminate(&mut self, _ctx: &mut SystemContext<'_>) -> SystemResult {
        self.backend.shutdown();
        log::info!("graphics terminated");
        Ok(())
    }
}
