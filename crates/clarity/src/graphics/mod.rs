//! # Graphics — Meshes, Textures, and the Render Backends
//!
//! ```text
//! Library<MeshData>    Library<TextureData>      (owned by the engine)
//!        ▲ Weak               ▲ Weak
//!   Mesh component      Texture component     Transform component
//!        └──────────────┬─────┴─────────────────────┘
//!                       ▼
//!               GraphicsSystem ──► dyn RenderBackend ──► WgpuBackend | HeadlessBackend
//! ```
//!
//! - [`mesh`]: JSON mesh descriptions, shared mesh data, the `Mesh` component
//! - [`texture`]: decoded images, the `Texture` component
//! - [`vertex`]: the vertex layout and shader uniforms
//! - [`backend`]: the [`RenderBackend`] trait and the headless implementation
//! - [`gpu`]: the winit + wgpu implementation
//! - [`system`]: the [`GraphicsSystem`]

pub mod backend;
pub mod gpu;
pub mod mesh;
pub mod system;
pub mod texture;
pub mod vertex;

pub use backend::{DrawItem, FrameSetup, HeadlessBackend, HeadlessHandle, RenderBackend};
pub use gpu::WgpuBackend;
pub use mesh::{Mesh, MeshData, MeshDescription, MeshType};
pub use system::GraphicsSystem;
pub use texture::{Texture, TextureData};
pub use vertex::Vertex;
