//! Per-frame camera update and parameter packing.

use glam::Vec3;

use crate::camera::{Camera, CameraInput, CameraMode};
use crate::distance::distance_estimate;
use crate::error::FrameError;
use crate::params::FrameParams;

/// Fraction of the eye distance estimate used as the model scale.
pub const SCALE_FACTOR: f32 = 0.5;

/// Result of [`prepare_frame`], ready for upload.
#[derive(Debug, Clone, Copy)]
pub struct PreparedFrame {
    pub params: FrameParams,
    /// Distance estimate at `eye`
    pub distance: f32,
    /// Eye position the frame was prepared for
    pub eye: Vec3,
}

/// Advance the camera and pack the frame's parameter block.
///
/// The distance estimate, the model-viewer scale and the packed block are all
/// derived from the eye position reached after this frame's camera update.
///
/// # Errors
///
/// Returns [`FrameError::SingularMatrix`] when the camera matrices cannot be
/// inverted, e.g. when the eye sits on the surface and the scale collapses to
/// zero. The camera update itself is kept.
pub fn prepare_frame(
    camera: &mut Camera,
    input: &mut CameraInput,
    dt: f32,
) -> Result<PreparedFrame, FrameError> {
    camera.frame_move(dt, input);

    let eye = camera.eye();
    let distance = distance_estimate(eye);
    if camera.mode() == CameraMode::ModelViewer {
        camera.set_scale(distance * SCALE_FACTOR);
    }

    let params = FrameParams::pack(camera, distance)?;
    tracing::trace!(?eye, distance, "prepared frame");
    Ok(PreparedFrame {
        params,
        distance,
        eye,
    })
}
