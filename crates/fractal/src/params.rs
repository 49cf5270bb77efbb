//! GPU parameter block
//!
//! [`FrameParams`] is uploaded once per frame into a uniform buffer and read
//! by both raymarch entry points. Its layout is shared with the `FrameParams`
//! struct in `mandelbulb.wgsl`:
//!
//! | offset | field       | type          |
//! |--------|-------------|---------------|
//! | 0      | `proj`      | `mat4x4<f32>` |
//! | 64     | `inv_world` | `mat4x4<f32>` |
//! | 128    | `inv_view`  | `mat4x4<f32>` |
//! | 192    | `dist`      | `f32`         |
//! | 196    | padding     | `3 x f32`     |

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::camera::Camera;
use crate::error::{FrameError, MatrixKind};

/// Per-frame camera parameters in shader layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameParams {
    /// Projection matrix, column major
    pub proj: [[f32; 4]; 4],
    /// Inverse of the world (model) matrix
    pub inv_world: [[f32; 4]; 4],
    /// Inverse of the view matrix
    pub inv_view: [[f32; 4]; 4],
    /// Distance estimate at the eye position
    pub dist: f32,
    pub _pad: [f32; 3],
}

/// Size of the block in bytes, a multiple of 16 as uniform buffers require.
pub const FRAME_PARAMS_SIZE: usize = std::mem::size_of::<FrameParams>();

const _: () = assert!(FRAME_PARAMS_SIZE == 208);
const _: () = assert!(FRAME_PARAMS_SIZE % 16 == 0);

impl FrameParams {
    /// Marshal the camera's current matrices and the eye distance estimate.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::SingularMatrix`] if the world, view or
    /// projection matrix cannot be inverted.
    pub fn pack(camera: &Camera, dist: f32) -> Result<Self, FrameError> {
        let proj = camera.proj_matrix();
        if !is_invertible(&proj) {
            return Err(FrameError::SingularMatrix {
                matrix: MatrixKind::Projection,
            });
        }
        let inv_world = checked_inverse(&camera.world_matrix()).ok_or(
            FrameError::SingularMatrix {
                matrix: MatrixKind::World,
            },
        )?;
        let inv_view = checked_inverse(&camera.view_matrix()).ok_or(
            FrameError::SingularMatrix {
                matrix: MatrixKind::View,
            },
        )?;

        Ok(Self {
            proj: proj.to_cols_array_2d(),
            inv_world: inv_world.to_cols_array_2d(),
            inv_view: inv_view.to_cols_array_2d(),
            dist,
            _pad: [0.0; 3],
        })
    }

    /// Reinterpret bytes read back from a parameter buffer.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly [`FRAME_PARAMS_SIZE`] long.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned(bytes)
    }

    #[must_use]
    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.proj)
    }

    #[must_use]
    pub fn inv_world_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inv_world)
    }

    #[must_use]
    pub fn inv_view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inv_view)
    }
}

fn is_invertible(m: &Mat4) -> bool {
    let det = m.determinant();
    det != 0.0 && det.is_finite() && m.is_finite()
}

fn checked_inverse(m: &Mat4) -> Option<Mat4> {
    if !is_invertible(m) {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}
