//! # Error Types
//!
//! The engine separates failures into two families:
//!
//! - **Lifecycle failures** ([`SystemError`], wrapped in [`LifecycleError`])
//!   abort the current phase and bubble up to the [`Engine`](crate::engine::Engine).
//! - **Everything else** ([`EcsError`], [`AssetError`], [`GraphicsError`],
//!   [`ConfigError`]) is logged where it is detected and returned so the caller
//!   can decide. The ECS is left untouched, so ignoring one is always safe.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::component::ComponentKind;
use crate::ecs::entity::EntityId;

/// Misuse of the ECS API. Each variant leaves the ECS unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity is not in the live set.
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),
    /// The world entity is permanent.
    #[error("the world entity ({0}) cannot be deleted")]
    WorldEntity(EntityId),
    /// A second component of the same kind was added to an entity.
    #[error("entity {entity} already has a {kind} component")]
    DuplicateComponent {
        entity: EntityId,
        kind: ComponentKind,
    },
    /// A signature entry was expected but is missing.
    #[error("no signature recorded for entity {0}")]
    InvalidSignature(EntityId),
    /// The store has no component of this kind for the entity.
    #[error("entity {entity} has no {kind} component")]
    ComponentNotFound {
        entity: EntityId,
        kind: ComponentKind,
    },
    /// Construction through the memory manager failed.
    #[error("failed to allocate {kind} component for entity {entity}: {reason}")]
    AllocationFailure {
        entity: EntityId,
        kind: ComponentKind,
        reason: String,
    },
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// One of the six lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    Load,
    Update,
    Render,
    Unload,
    Terminate,
}

impl Phase {
    /// Unload and Terminate walk the registry back to front.
    pub fn is_reverse(self) -> bool {
        matches!(self, Phase::Unload | Phase::Terminate)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Load => "load",
            Phase::Update => "update",
            Phase::Render => "render",
            Phase::Unload => "unload",
            Phase::Terminate => "terminate",
        };
        f.write_str(name)
    }
}

/// What a system reports when one of its lifecycle steps fails.
#[derive(Error, Debug)]
pub enum SystemError {
    /// A singleton component the system relies on is missing from the world entity.
    #[error("world entity has no {0} component")]
    MissingWorldComponent(ComponentKind),
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error("{0}")]
    Failed(String),
}

/// Result type returned by every lifecycle step.
pub type SystemResult = Result<(), SystemError>;

/// A lifecycle step failed. Carries which system and which phase.
#[derive(Error, Debug)]
#[error("system `{system}` failed to {phase}: {source}")]
pub struct LifecycleError {
    pub system: String,
    pub phase: Phase,
    #[source]
    pub source: SystemError,
}

/// Loading or validating an asset (mesh description, texture, keybind table).
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The image has a channel count other than 3 or 4.
    #[error("image {path} has {channels} channels, expected 3 or 4")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
    #[error("invalid mesh `{name}`: {reason}")]
    InvalidMesh { name: String, reason: String },
    /// No mesh data is registered under this name.
    #[error("no mesh named `{0}` in the mesh library")]
    UnknownMesh(String),
    /// A key named in a keybind table is not in the key enumeration.
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// Window, surface and GPU device failures.
#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    WindowCreation(String),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(String),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
    /// A frame call arrived before `initialize` or after `shutdown`.
    #[error("render backend is not initialized")]
    NotInitialized,
}

/// Reading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
