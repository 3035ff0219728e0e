//! # Render Backends
//!
//! The graphics system talks to the window and GPU only through
//! [`RenderBackend`]. Two implementations exist:
//!
//! - [`WgpuBackend`](super::gpu::WgpuBackend): a winit window rendered
//!   with wgpu.
//! - [`HeadlessBackend`]: no window and no GPU. It records what it was asked
//!   to do so tests (and unattended runs) can inspect it.
//!
//! A frame is always `begin_frame`, any number of `draw`s, then `end_frame`.
//! Meshes and textures are uploaded on first draw and cached by their library
//! key until `shutdown`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::config::WindowConfig;
use crate::error::GraphicsError;
use crate::math::{Mat4, Vec3};

use super::mesh::MeshData;
use super::texture::TextureData;

/// What stays fixed for a whole frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSetup {
    pub view: Mat4,
    pub projection: Mat4,
    pub clear_color: [f64; 4],
}

/// One entity's draw call.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub mesh: &'a MeshData,
    pub texture: &'a TextureData,
    pub model: Mat4,
    pub tint: Vec3,
    pub alpha: f32,
}

pub trait RenderBackend {
    /// Open the window (if any) and set up the device.
    fn initialize(&mut self, window: &WindowConfig) -> Result<(), GraphicsError>;

    /// Whether the user asked to close the window.
    fn close_requested(&self) -> bool;

    /// Process pending window events.
    fn poll_events(&mut self);

    /// Clear the target and bind the shader.
    fn begin_frame(&mut self, setup: &FrameSetup) -> Result<(), GraphicsError>;

    fn draw(&mut self, item: DrawItem<'_>) -> Result<(), GraphicsError>;

    /// Submit and present.
    fn end_frame(&mut self) -> Result<(), GraphicsError>;

    /// Release cached GPU resources and close the window.
    fn shutdown(&mut self);
}

/// A draw call as the headless backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mesh: String,
    pub texture: String,
    pub model: Mat4,
}

/// Everything the headless backend has recorded.
#[derive(Debug, Default)]
pub struct HeadlessState {
    pub initialized: bool,
    pub shut_down: bool,
    pub close_requested: bool,
    pub polls: u64,
    /// Frames that reached `end_frame`.
    pub frames: u64,
    pub last_setup: Option<FrameSetup>,
    /// Draws of the most recently ended frame.
    pub last_frame: Vec<DrawRecord>,
    pub cached_meshes: HashSet<String>,
    pub cached_textures: HashSet<String>,
    current: Vec<DrawRecord>,
    in_frame: bool,
}

/// A shared view onto a [`HeadlessBackend`], kept by whoever built it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHandle(Rc<RefCell<HeadlessState>>);

impl HeadlessHandle {
    /// Make the next `close_requested` return true.
    pub fn request_close(&self) {
        self.0.borrow_mut().close_requested = true;
    }

    pub fn state(&self) -> std::cell::Ref<'_, HeadlessState> {
        self.0.borrow()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    state: HeadlessHandle,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> HeadlessHandle {
        self.state.clone()
    }
}

impl RenderBackend for HeadlessBackend {
    fn initialize(&mut self, window: &WindowConfig) -> Result<(), GraphicsError> {
        let mut state = self.state.0.borrow_mut();
        state.initialized = true;
        state.shut_down = false;
        log::info!(
            "headless backend standing in for a {}x{} window `{}`",
            window.width,
            window.height,
            window.title
        );
        Ok(())
    }

    fn close_requested(&self) -> bool {
        self.state.0.borrow().close_requested
    }

    fn poll_events(&mut self) {
        self.state.0.borrow_mut().polls += 1;
    }

    fn begin_frame(&mut self, setup: &FrameSetup) -> Result<(), GraphicsError> {
        let mut state = self.state.0.borrow_mut();
        if !state.initialized || state.shut_down {
            return Err(GraphicsError::NotInitialized);
        }
        state.in_frame = true;
        state.current.clear();
        state.last_setup = Some(*setup);
        Ok(())
    }

    fn draw(&mut self, item: DrawItem<'_>) -> Result<(), GraphicsError> {
        let mut state = self.state.0.borrow_mut();
        if !state.in_frame {
            return Err(GraphicsError::NotInitialized);
        }
        state.cached_meshes.insert(item.mesh.name.clone());
        state.cached_textures.insert(item.texture.path.clone());
        state.current.push(DrawRecord {
            mesh: item.mesh.name.clone(),
            texture: item.texture.path.clone(),
            model: item.model,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), GraphicsError> {
        let mut state = self.state.0.borrow_mut();
        if !state.in_frame {
            return Err(GraphicsError::NotInitialized);
        }
        state.in_frame = false;
        state.last_frame = std::mem::take(&mut state.current);
        state.frames += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut state = self.state.0.borrow_mut();
        state.cached_meshes.clear();
        state.cached_textures.clear();
        state.shut_down = true;
        log::info!("headless backend shut down after {} frames", state.frames);
    }
}
