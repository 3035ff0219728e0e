//! # Vertex — Mesh Corners and Shader Uniforms
//!
//! Every mesh vertex carries a position, a texture coordinate, and the mesh's
//! flat color. The layout is `#[repr(C)]` and `Pod` so a `&[Vertex]` can be
//! handed to the GPU as bytes without copying.
//!
//! ```text
//! Vertex (32 bytes)
//! ┌──────────────┬──────────────┬──────────────┐
//! │ pos          │ tex          │ color        │
//! │ [f32; 3]     │ [f32; 2]     │ [f32; 3]     │
//! │ offset 0     │ offset 12    │ offset 20    │
//! │ location(0)  │ location(1)  │ location(2)  │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! ## Uniforms
//!
//! ```text
//! group 0  FrameUniform   view + projection        once per frame
//! group 1  texture + sampler                       per texture
//! group 2  ObjectUniform  model + tint/alpha       per draw, dynamic offset
//! ```

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Vec3};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub tex: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // pos
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // tex
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 20,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };
}

/// Camera matrices, uploaded once per frame.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl FrameUniform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

/// Per-draw data: the entity's world matrix and its texture tint.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// rgb tint, a = alpha.
    pub tint: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, tint: Vec3, alpha: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint: [tint.x, tint.y, tint.z, alpha],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::LAYOUT.array_stride, 32);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
    }
}
