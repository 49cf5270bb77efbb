//! GPU-compatible type definitions for rendering
//!
//! Buffer structures passed to the WGSL shaders next to
//! [`fractal::FrameParams`]. All types are `Pod` and laid out to match the
//! shader declarations.

use bytemuck::{Pod, Zeroable};

/// Output surface size in pixels, bound as a separate uniform.
///
/// Both dispatch variants derive pixel centres from this value, so a pixel
/// shader invocation and a compute thread for the same pixel build the same
/// ray.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SurfaceUniform {
    /// Width and height in pixels
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl SurfaceUniform {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Vertex of the full-screen quad: clip space position and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ScreenVertex {
    pub pos: [f32; 4],
    pub tex: [f32; 2],
}

impl ScreenVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2];

    /// Vertex buffer layout matching `VertexInput` in `mandelbulb.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Full-screen quad drawn as a triangle strip.
pub const FULLSCREEN_QUAD: [ScreenVertex; QUAD_VERTEX_COUNT as usize] = [
    ScreenVertex {
        pos: [-1.0, 1.0, 0.5, 1.0],
        tex: [0.0, 0.0],
    },
    ScreenVertex {
        pos: [1.0, 1.0, 0.5, 1.0],
        tex: [1.0, 0.0],
    },
    ScreenVertex {
        pos: [-1.0, -1.0, 0.5, 1.0],
        tex: [0.0, 1.0],
    },
    ScreenVertex {
        pos: [1.0, -1.0, 0.5, 1.0],
        tex: [1.0, 1.0],
    },
];

const _: () = assert!(std::mem::size_of::<SurfaceUniform>() == 16);
const _: () = assert!(std::mem::size_of::<ScreenVertex>() == 24);
