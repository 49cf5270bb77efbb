//! Host reference raymarcher
//!
//! CPU rendition of the per-pixel program in `mandelbulb.wgsl`. Both
//! dispatch variants on the GPU run that program; this module runs the same
//! steps with the same constants so that shader behaviour can be checked and
//! benchmarked without a device.
//!
//! Per pixel:
//! 1. rebuild a world space ray from the inverse view and projection, then
//!    move it into object space with the inverse world matrix
//! 2. clip the ray against a bounding sphere around the fractal
//! 3. sphere trace inside that span using [`distance_estimate`]
//! 4. shade hits from a finite difference normal and the step count, misses
//!    from a vertical sky gradient

use glam::{Vec2, Vec3, Vec4Swizzles};

use crate::distance::distance_estimate;
use crate::params::FrameParams;

pub const MAX_STEPS: u32 = 192;
pub const HIT_EPSILON: f32 = 5e-4;
pub const MIN_STEP: f32 = 1e-5;
pub const MAX_STEP: f32 = 1.0;
pub const BOUNDING_RADIUS: f32 = 2.0;
pub const NORMAL_EPSILON: f32 = 5e-4;

const LIGHT_DIR: Vec3 = Vec3::new(0.6, 0.7, -0.4);
const SURFACE_COLOR: Vec3 = Vec3::new(0.9, 0.75, 0.55);
const AMBIENT: f32 = 0.25;
const DIFFUSE: f32 = 0.75;
const SKY_LOW: Vec3 = Vec3::new(0.3, 0.3, 0.3);
const SKY_HIGH: Vec3 = Vec3::new(0.55, 0.65, 0.85);

/// Primary ray in object space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction in object space
    pub dir: Vec3,
    /// Unit direction in world space, used for the background
    pub sky_dir: Vec3,
}

/// Outcome of sphere tracing a single ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Distance travelled along the ray
    pub t: f32,
    /// Number of distance evaluations taken
    pub steps: u32,
    pub hit: bool,
}

/// Build the ray through `pixel` (in pixels, origin top left) on a surface of
/// `size` pixels.
#[must_use]
pub fn primary_ray(params: &FrameParams, pixel: Vec2, size: Vec2) -> Ray {
    let ndc = Vec2::new(
        pixel.x / size.x * 2.0 - 1.0,
        1.0 - pixel.y / size.y * 2.0,
    );
    let proj = params.proj_matrix();
    let view_dir = Vec3::new(ndc.x / proj.x_axis.x, ndc.y / proj.y_axis.y, -1.0);

    let inv_view = params.inv_view_matrix();
    let inv_world = params.inv_world_matrix();
    let world_origin = inv_view * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    let world_dir = inv_view * view_dir.extend(0.0);
    let obj_origin = inv_world * world_origin;
    let obj_dir = inv_world * world_dir;

    Ray {
        origin: obj_origin.xyz() / obj_origin.w,
        dir: obj_dir.xyz().normalize(),
        sky_dir: world_dir.xyz().normalize(),
    }
}

/// Entry and exit distances of `ray` through the bounding sphere.
#[must_use]
pub fn bounding_span(ray: &Ray) -> Option<(f32, f32)> {
    let b = ray.origin.dot(ray.dir);
    let c = ray.origin.dot(ray.origin) - BOUNDING_RADIUS * BOUNDING_RADIUS;
    let h = b * b - c;
    if h < 0.0 {
        return None;
    }
    let sh = h.sqrt();
    let far = -b + sh;
    if far < 0.0 {
        return None;
    }
    Some(((-b - sh).max(0.0), far))
}

/// Sphere trace `ray` against the fractal.
///
/// Running out of steps inside the bounding sphere counts as a hit.
#[must_use]
pub fn march(ray: &Ray) -> MarchResult {
    let Some((near, far)) = bounding_span(ray) else {
        return MarchResult {
            t: 0.0,
            steps: 0,
            hit: false,
        };
    };

    let mut t = near;
    for i in 0..MAX_STEPS {
        let d = distance_estimate(ray.origin + ray.dir * t);
        if d < HIT_EPSILON {
            return MarchResult {
                t,
                steps: i,
                hit: true,
            };
        }
        t += d.clamp(MIN_STEP, MAX_STEP);
        if t > far {
            return MarchResult {
                t,
                steps: i + 1,
                hit: false,
            };
        }
    }
    MarchResult {
        t,
        steps: MAX_STEPS,
        hit: true,
    }
}

/// Central difference gradient of the distance field at `p`.
///
/// Falls back to `fallback` where the field is flat, e.g. deep inside the
/// set where every sample is zero.
#[must_use]
#[allow(clippy::similar_names)]
pub fn surface_normal(p: Vec3, fallback: Vec3) -> Vec3 {
    let ex = Vec3::new(NORMAL_EPSILON, 0.0, 0.0);
    let ey = Vec3::new(0.0, NORMAL_EPSILON, 0.0);
    let ez = Vec3::new(0.0, 0.0, NORMAL_EPSILON);
    let n = Vec3::new(
        distance_estimate(p + ex) - distance_estimate(p - ex),
        distance_estimate(p + ey) - distance_estimate(p - ey),
        distance_estimate(p + ez) - distance_estimate(p - ez),
    );
    let len = n.length();
    if len < 1e-12 {
        fallback
    } else {
        n / len
    }
}

#[must_use]
pub fn background(sky_dir: Vec3) -> Vec3 {
    let k = (0.5 + 0.5 * sky_dir.y).clamp(0.0, 1.0);
    SKY_LOW.lerp(SKY_HIGH, k)
}

/// Colour of a traced ray.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn shade(ray: &Ray, result: &MarchResult) -> Vec3 {
    if !result.hit {
        return background(ray.sky_dir);
    }
    let p = ray.origin + ray.dir * result.t;
    let n = surface_normal(p, -ray.dir);
    let diffuse = n.dot(LIGHT_DIR.normalize()).max(0.0);
    let occlusion = 1.0 - result.steps as f32 / MAX_STEPS as f32;
    SURFACE_COLOR * (AMBIENT + DIFFUSE * diffuse) * occlusion
}

/// Colour of pixel `(x, y)` on a `width` x `height` surface.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trace_pixel(params: &FrameParams, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let size = Vec2::new(width as f32, height as f32);
    let ray = primary_ray(params, pixel, size);
    shade(&ray, &march(&ray))
}

/// Render a full frame into row-major RGBA8 pixels.
#[must_use]
pub fn render_reference(params: &FrameParams, width: u32, height: u32) -> Vec<[u8; 4]> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(to_rgba8(trace_pixel(params, x, y, width, height)));
        }
    }
    pixels
}

/// Quantise a linear colour the way a `unorm8` render target does.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_rgba8(color: Vec3) -> [u8; 4] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    [q(color.x), q(color.y), q(color.z), 255]
}
