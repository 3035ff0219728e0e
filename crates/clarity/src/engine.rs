//! # Engine — The Driver Loop
//!
//! The [`Engine`] owns everything with process lifetime: the event bus, the
//! memory manager, the mesh and texture libraries, the keyboard buffer, and
//! the ECS with its four default systems.
//!
//! ```text
//! Engine::new      build ECS, adopt key bindings into the world entity,
//!                  register Graphics → Input → Control → Physics
//! startup()        initialize + load, seed one controllable cube
//! run() ─┐         TerminateEngine posted? → reap events, return false
//!        │         update(0) → render → reap events → true
//!        └─ loop
//! exit()           unload + terminate (reverse order)
//! ```
//!
//! The façade methods return `bool` and log the underlying error; the ECS
//! itself is available through [`ecs`](Engine::ecs) and
//! [`ecs_mut`](Engine::ecs_mut) for anything finer-grained.

use std::sync::Arc;

use crate::config::{BackendKind, EngineConfig};
use crate::controller::{Controller, PlayerControllerSystem};
use crate::diag::{DiagSnapshot, SystemSnapshot};
use crate::ecs::{Ecs, EntityId};
use crate::error::{AssetError, EcsResult};
use crate::event::{EventBus, EventObject, TERMINATE_ENGINE};
use crate::graphics::mesh::register_builtin_meshes;
use crate::graphics::{
    GraphicsSystem, HeadlessBackend, Mesh, MeshData, MeshType, RenderBackend, Texture, TextureData,
    WgpuBackend,
};
use crate::input::{InputSystem, KeyBindContainer, Keyboard, SharedKeyboard};
use crate::library::Library;
use crate::math::Transform;
use crate::memory::MemoryManager;
use crate::physics::{Physics, PhysicsSystem};
use crate::time::Clock;

pub const GRAPHICS_SYSTEM: &str = "Clarity_Graphics_System";
pub const INPUT_SYSTEM: &str = "Clarity_Input_System";
pub const CONTROL_SYSTEM: &str = "Clarity_Control_System";
pub const PHYSICS_SYSTEM: &str = "Clarity_Physics_System";

pub struct Engine {
    config: EngineConfig,
    events: EventBus,
    memory: Arc<MemoryManager>,
    meshes: Library<MeshData>,
    textures: Library<TextureData>,
    keyboard: SharedKeyboard,
    clock: Clock,
    ecs: Ecs,
}

impl Engine {
    /// Build an engine with the backend named in `config`.
    pub fn new(config: EngineConfig) -> Result<Self, AssetError> {
        let keyboard = Keyboard::shared();
        let backend: Box<dyn RenderBackend> = match config.backend {
            BackendKind::Window => Box::new(WgpuBackend::new(keyboard.clone())),
            BackendKind::Headless => Box::new(HeadlessBackend::new()),
        };
        Self::with_backend(config, backend, keyboard)
    }

    /// Build an engine around a caller-supplied backend. `keyboard` is the
    /// buffer the input system reads; it should be the one the backend feeds.
    pub fn with_backend(
        config: EngineConfig,
        backend: Box<dyn RenderBackend>,
        keyboard: SharedKeyboard,
    ) -> Result<Self, AssetError> {
        let bindings = match &config.keybinds {
            Some(path) => KeyBindContainer::load(path)?,
            None => KeyBindContainer::with_defaults(),
        };
        let mut meshes = Library::new();
        register_builtin_meshes(&mut meshes)?;

        let memory = Arc::new(MemoryManager::new());
        let mut ecs = Ecs::new(memory.clone());
        let world = ecs.world_id();
        if let Err(err) = ecs.adopt_component(world, Box::new(bindings)) {
            log::error!("could not attach key bindings to the world entity: {err}");
        }

        ecs.add_system(
            GRAPHICS_SYSTEM,
            GraphicsSystem::new(
                backend,
                config.window.clone(),
                config.camera,
                config.clear_color,
            ),
        );
        ecs.add_system(INPUT_SYSTEM, InputSystem::new(keyboard.clone()));
        ecs.add_system(CONTROL_SYSTEM, PlayerControllerSystem::new());
        ecs.add_system(PHYSICS_SYSTEM, PhysicsSystem::new());

        Ok(Self {
            config,
            events: EventBus::new(),
            memory,
            meshes,
            textures: Library::new(),
            keyboard,
            clock: Clock::new(),
            ecs,
        })
    }

    /// Initialize and load every system, then seed the default entity.
    pub fn startup(&mut self) -> bool {
        if let Err(err) = self.ecs.initialize(&mut self.events) {
            log::error!("startup failed: {err}");
            return false;
        }
        if let Err(err) = self.ecs.load(&mut self.events) {
            log::error!("startup failed: {err}");
            return false;
        }
        match self.seed_entity() {
            Ok(id) => log::info!("seeded entity {id}"),
            Err(err) => {
                log::error!("failed to seed the default entity: {err}");
                return false;
            }
        }
        true
    }

    /// One tick. Returns `false` when the engine should stop.
    pub fn run(&mut self) -> bool {
        if self
            .events
            .check_event(EventObject::System, EventObject::Engine, TERMINATE_ENGINE)
        {
            log::info!("terminate requested");
            self.events.update();
            return false;
        }

        self.clock.tick();
        if let Err(err) = self.ecs.update(0.0, &mut self.events) {
            log::error!("{err}");
            return false;
        }
        if let Err(err) = self.ecs.render(&mut self.events) {
            log::error!("{err}");
            return false;
        }
        self.events.update();
        if log::log_enabled!(log::Level::Debug) {
            self.snapshot().log();
        }
        true
    }

    /// Unload and terminate every system in reverse registration order.
    pub fn exit(&mut self) -> bool {
        if let Err(err) = self.ecs.unload(&mut self.events) {
            log::error!("exit failed: {err}");
            return false;
        }
        if let Err(err) = self.ecs.terminate(&mut self.events) {
            log::error!("exit failed: {err}");
            return false;
        }
        log::info!(
            "engine stopped after {} frames, {} bytes still in use",
            self.clock.frame_count(),
            self.memory.in_use()
        );
        true
    }

    fn seed_entity(&mut self) -> EcsResult<EntityId> {
        let id = self.ecs.create_entity();
        let meshes = &self.meshes;
        self.ecs
            .try_add_component(id, || Mesh::new(MeshType::Cube, "", meshes))?;
        let texture = Texture::new(&self.config.seed_texture, &mut self.textures);
        self.ecs.add_component(id, texture)?;
        self.ecs.add_component(id, Transform::default())?;
        self.ecs.add_component(id, Controller)?;
        self.ecs.add_component(id, Physics::default())?;
        Ok(id)
    }

    pub fn snapshot(&self) -> DiagSnapshot {
        let systems = self
            .ecs
            .system_names()
            .into_iter()
            .filter_map(|name| self.ecs.system(name))
            .map(|state| SystemSnapshot {
                name: state.name().to_owned(),
                entity_count: state.entities().len(),
                initialized: state.is_initialized(),
            })
            .collect();
        DiagSnapshot {
            frame_count: self.clock.frame_count(),
            fps: self.clock.fps(),
            elapsed_secs: self.clock.elapsed().as_secs_f32(),
            entity_count: self.ecs.entity_count(),
            pending_events: self.events.len(),
            systems,
            memory: self.memory.stats(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ecs(&self) -> &Ecs {
        &self.ecs
    }

    pub fn ecs_mut(&mut self) -> &mut Ecs {
        &mut self.ecs
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn memory(&self) -> &Arc<MemoryManager> {
        &self.memory
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn keyboard(&self) -> &SharedKeyboard {
        &self.keyboard
    }

    pub fn meshes(&self) -> &Library<MeshData> {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut Library<MeshData> {
        &mut self.meshes
    }

    pub fn textures_mut(&mut self) -> &mut Library<TextureData> {
        &mut self.textures
    }
}
