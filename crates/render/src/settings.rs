//! Startup settings for the viewer and the headless renderer.

use fractal::camera::{DEFAULT_EYE, DEFAULT_TARGET};
use fractal::{Camera, CameraMode};
use glam::Vec3;

use crate::dispatch::ShaderVariant;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    /// Initial output width in pixels
    pub width: u32,
    /// Initial output height in pixels
    pub height: u32,
    pub variant: ShaderVariant,
    pub camera_mode: CameraMode,
    pub eye: Vec3,
    pub target: Vec3,
    /// Frames between statistics log lines, 0 disables them
    pub stats_interval: u32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            variant: ShaderVariant::default(),
            camera_mode: CameraMode::default(),
            eye: DEFAULT_EYE,
            target: DEFAULT_TARGET,
            stats_interval: 120,
        }
    }
}

impl ViewerSettings {
    /// Camera placed at the configured eye and target.
    #[must_use]
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(self.camera_mode, width, height);
        camera.set_view_params(self.eye, self.target);
        camera
    }
}
