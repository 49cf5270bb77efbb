//! Camera state model
//!
//! [`Camera`] holds eye, target, projection parameters and the view,
//! projection and world matrices derived from them. Matrices are rebuilt
//! whenever one of their inputs changes, so they are always current when read.
//!
//! Two navigation styles are supported, see [`CameraMode`]. Input arrives
//! through a [`CameraInput`] accumulator which the windowing layer fills from
//! device events and [`Camera::frame_move`] drains once per frame.

use glam::{Mat4, Quat, Vec2, Vec3};

/// Navigation style of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Orbit around the target while the model itself can be rotated and is
    /// auto-scaled every frame.
    #[default]
    ModelViewer,
    /// Free flight with keyboard movement and pointer look. The world matrix
    /// stays identity.
    FirstPerson,
}

/// Tuning values for input response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Radians per pointer pixel when orbiting or looking around
    pub orbit_sensitivity: f32,
    /// Radians per pointer pixel when rotating the model
    pub rotate_sensitivity: f32,
    /// Fraction of the orbit radius removed per wheel notch
    pub zoom_step: f32,
    /// Closest orbit radius. The default keeps the eye where the distance
    /// estimate is positive in every direction around the origin.
    pub min_radius: f32,
    /// Farthest orbit radius
    pub max_radius: f32,
    /// First person movement speed in units per second
    pub move_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            rotate_sensitivity: 0.005,
            zoom_step: 0.1,
            min_radius: 1.2,
            max_radius: 50.0,
            move_speed: 1.0,
        }
    }
}

/// Held movement keys for first person navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Input accumulated between two frames.
///
/// Pointer and wheel deltas are consumed by [`Camera::frame_move`]; held keys
/// persist until released.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Pointer delta for orbiting the eye (or looking around in first person)
    pub orbit: Vec2,
    /// Pointer delta for rotating the model
    pub rotate_model: Vec2,
    /// Wheel notches, positive towards the target
    pub zoom: f32,
    pub movement: MovementKeys,
}

impl CameraInput {
    /// Drop the per-frame deltas, keeping held keys.
    pub fn clear_deltas(&mut self) {
        self.orbit = Vec2::ZERO;
        self.rotate_model = Vec2::ZERO;
        self.zoom = 0.0;
    }
}

/// Interactive camera used by the render loop.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: CameraMode,
    settings: CameraSettings,
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    fovy: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    /// Distance from eye to target in model viewer mode
    radius: f32,
    /// Horizontal angle of the eye offset (model viewer) or view direction (first person)
    yaw: f32,
    /// Vertical angle of the eye offset (model viewer) or view direction (first person)
    pitch: f32,
    model_rotation: Quat,
    scale: f32,
    view: Mat4,
    proj: Mat4,
    world: Mat4,
}

/// Pitch is kept away from the poles to keep `look_at` well defined.
const PITCH_LIMIT: f32 = 1.5;

pub const DEFAULT_EYE: Vec3 = Vec3::new(3.0, 0.0, 0.0);
pub const DEFAULT_TARGET: Vec3 = Vec3::ZERO;
pub const DEFAULT_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const DEFAULT_ZNEAR: f32 = 0.1;
pub const DEFAULT_ZFAR: f32 = 5000.0;

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraMode::default(), 640, 480)
    }
}

impl Camera {
    /// Create a camera looking from the default eye at the origin.
    #[must_use]
    pub fn new(mode: CameraMode, width: u32, height: u32) -> Self {
        let mut camera = Self {
            mode,
            settings: CameraSettings::default(),
            eye: DEFAULT_EYE,
            target: DEFAULT_TARGET,
            up: Vec3::Y,
            fovy: DEFAULT_FOVY,
            aspect: 1.0,
            znear: DEFAULT_ZNEAR,
            zfar: DEFAULT_ZFAR,
            radius: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            model_rotation: Quat::IDENTITY,
            scale: 1.0,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        };
        camera.set_view_params(DEFAULT_EYE, DEFAULT_TARGET);
        camera.set_proj_params(
            DEFAULT_FOVY,
            aspect_ratio(width, height),
            DEFAULT_ZNEAR,
            DEFAULT_ZFAR,
        );
        camera
    }

    /// Replace the input tuning values.
    #[must_use]
    pub fn with_settings(mut self, settings: CameraSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Place the eye and the point it looks at.
    ///
    /// `eye == target` is a caller error; the resulting view matrix is not
    /// invertible and every frame packed from it is rejected.
    ///
    /// Pitch is limited to the same range as interactive orbiting. An eye
    /// placed straight above or below the target is tilted off the pole.
    pub fn set_view_params(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
        let offset = eye - target;
        self.radius = offset.length();
        // Model viewer angles describe where the eye sits relative to the
        // target, first person angles the view direction.
        let dir = match self.mode {
            CameraMode::ModelViewer => offset,
            CameraMode::FirstPerson => -offset,
        };
        self.yaw = dir.x.atan2(dir.z);
        let pitch = safe_asin(dir.y, self.radius);
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        if pitch.abs() > PITCH_LIMIT {
            let dir = spherical(self.yaw, self.pitch) * self.radius;
            match self.mode {
                CameraMode::ModelViewer => self.eye = self.target + dir,
                CameraMode::FirstPerson => self.target = self.eye + dir,
            }
        }
        self.rebuild_view();
    }

    /// Set the perspective projection. `fovy` is in radians.
    pub fn set_proj_params(&mut self, fovy: f32, aspect: f32, znear: f32, zfar: f32) {
        self.fovy = fovy;
        self.aspect = aspect;
        self.znear = znear;
        self.zfar = zfar;
        self.proj = Mat4::perspective_rh(fovy, aspect, znear, zfar);
    }

    /// Recompute the projection for a new output surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_proj_params(
            self.fovy,
            aspect_ratio(width, height),
            self.znear,
            self.zfar,
        );
    }

    /// Set the uniform scale baked into the world matrix.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.rebuild_world();
    }

    /// Advance the camera by `dt` seconds using the accumulated input.
    ///
    /// Pointer and wheel deltas in `input` are consumed.
    pub fn frame_move(&mut self, dt: f32, input: &mut CameraInput) {
        match self.mode {
            CameraMode::ModelViewer => self.move_model_viewer(input),
            CameraMode::FirstPerson => self.move_first_person(dt, input),
        }
        input.clear_deltas();
        self.rebuild_view();
        self.rebuild_world();
    }

    fn move_model_viewer(&mut self, input: &CameraInput) {
        let s = &self.settings;
        if input.rotate_model != Vec2::ZERO {
            let yaw = Quat::from_rotation_y(input.rotate_model.x * s.rotate_sensitivity);
            let pitch = Quat::from_rotation_x(input.rotate_model.y * s.rotate_sensitivity);
            self.model_rotation = (yaw * pitch * self.model_rotation).normalize();
        }

        if input.orbit == Vec2::ZERO && input.zoom == 0.0 {
            return;
        }
        self.yaw -= input.orbit.x * s.orbit_sensitivity;
        self.pitch = (self.pitch + input.orbit.y * s.orbit_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius * (1.0 - input.zoom * s.zoom_step))
            .clamp(s.min_radius, s.max_radius);

        self.eye = self.target + spherical(self.yaw, self.pitch) * self.radius;
    }

    fn move_first_person(&mut self, dt: f32, input: &CameraInput) {
        let s = &self.settings;
        self.yaw -= input.orbit.x * s.orbit_sensitivity;
        self.pitch = (self.pitch - input.orbit.y * s.orbit_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();

        let keys = input.movement;
        let mut velocity = Vec3::ZERO;
        if keys.forward {
            velocity += forward;
        }
        if keys.backward {
            velocity -= forward;
        }
        if keys.right {
            velocity += right;
        }
        if keys.left {
            velocity -= right;
        }
        // Normalize to prevent faster diagonal movement
        if velocity.length_squared() > 0.0 {
            self.eye += velocity.normalize() * s.move_speed * dt;
        }
        if keys.up {
            self.eye.y += s.move_speed * dt;
        }
        if keys.down {
            self.eye.y -= s.move_speed * dt;
        }
        self.target = self.eye + forward;
    }

    /// Unit view direction derived from yaw and pitch (first person).
    fn forward(&self) -> Vec3 {
        spherical(self.yaw, self.pitch)
    }

    fn rebuild_view(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.target, self.up);
    }

    fn rebuild_world(&mut self) {
        self.world = match self.mode {
            CameraMode::ModelViewer => {
                Mat4::from_quat(self.model_rotation) * Mat4::from_scale(Vec3::splat(self.scale))
            }
            CameraMode::FirstPerson => Mat4::IDENTITY,
        };
    }

    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[must_use]
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[must_use]
    pub fn proj_matrix(&self) -> Mat4 {
        self.proj
    }

    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }
}

#[allow(clippy::cast_precision_loss)]
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

/// Unit vector for `yaw` around +Y measured from +Z, tilted up by `pitch`.
fn spherical(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
}

fn safe_asin(y: f32, length: f32) -> f32 {
    if length > 0.0 {
        (y / length).clamp(-1.0, 1.0).asin()
    } else {
        0.0
    }
}
