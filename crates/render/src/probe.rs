//! GPU distance estimator probe
//!
//! Runs `cs_probe_de` from `mandelbulb.wgsl` over a batch of points so the
//! shader copy of the distance estimator can be compared with
//! [`fractal::distance_estimate`].

use anyhow::{bail, Result};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::gpu;
use crate::layout::{self, PROBE_WORKGROUP};
use crate::pipeline;

/// Allowed host/GPU difference, `abs + rel * |host|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub abs: f32,
    pub rel: f32,
}

impl Tolerance {
    /// Points that escape within one iteration or never leave the interior.
    pub const STRICT: Self = Self {
        abs: 1e-4,
        rel: 1e-3,
    };
    /// Points in the surface shell. Each extra iteration multiplies trig
    /// rounding by the angular fold and the seventh power.
    pub const SURFACE_BAND: Self = Self {
        abs: 1e-3,
        rel: 5e-2,
    };

    #[must_use]
    pub fn accepts(self, host: f32, gpu: f32) -> bool {
        (host - gpu).abs() <= self.abs + self.rel * host.abs()
    }
}

/// Whether a GPU estimate agrees with the host estimate under [`Tolerance::STRICT`].
#[must_use]
pub fn within_tolerance(host: f32, gpu: f32) -> bool {
    Tolerance::STRICT.accepts(host, gpu)
}

pub struct DistanceProbe {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl DistanceProbe {
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = pipeline::create_raymarch_shader(device);
        let bind_group_layout = pipeline::create_probe_bind_group_layout(device);
        Self {
            pipeline: pipeline::create_probe_pipeline(device, &shader, &bind_group_layout),
            bind_group_layout,
        }
    }

    /// Evaluate the shader's distance estimator at every point.
    ///
    /// # Errors
    ///
    /// Returns an error if the result buffer cannot be read back.
    pub fn evaluate(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        points: &[Vec3],
    ) -> Result<Vec<f32>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let Ok(count) = u32::try_from(points.len()) else {
            bail!("too many probe points: {}", points.len());
        };

        let padded: Vec<[f32; 4]> = points.iter().map(|p| p.extend(0.0).to_array()).collect();
        let points_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Probe Points"),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let out_size = u64::from(count) * std::mem::size_of::<f32>() as u64;
        let out_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Probe Output"),
            size: out_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Probe Readback"),
            size: out_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Distance Probe Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: layout::PROBE_POINTS,
                    resource: points_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: layout::PROBE_OUT,
                    resource: out_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Distance Probe Encoder"),
        });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Distance Probe Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &bind_group, &[]);
            cpass.dispatch_workgroups(layout::workgroups(count, PROBE_WORKGROUP), 1, 1);
        }
        encoder.copy_buffer_to_buffer(&out_buffer, 0, &readback, 0, out_size);
        queue.submit(Some(encoder.finish()));

        gpu::map_read(device, &readback)?;
        let values = bytemuck::cast_slice::<u8, f32>(&readback.slice(..).get_mapped_range()).to_vec();
        readback.unmap();
        Ok(values)
    }
}

/// Sample points for comparing the two estimator copies.
///
/// Covers the origin, the escape boundary at (3, 0, 0), the interior ball
/// where iterates shrink towards the input, and shells that escape after one
/// iteration. The surface shell is covered by [`surface_band_points`].
#[must_use]
pub fn sample_points() -> Vec<Vec3> {
    const RADII: [f32; 8] = [0.25, 0.4, 1.3, 1.6, 2.0, 2.5, 3.5, 5.0];
    const DIRECTIONS: [[f32; 3]; 10] = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        // Slightly off the z axis, where atan2(0, 0) is left to the backend.
        [0.02, 0.01, 1.0],
        [-0.01, 0.02, -1.0],
        [0.6, 0.7, -0.4],
        [-0.3, 0.2, 0.9],
        [0.5, -0.5, 0.5],
        [-0.8, -0.1, -0.3],
    ];

    let mut points = vec![Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)];
    for radius in RADII {
        for dir in DIRECTIONS {
            points.push(Vec3::from_array(dir).normalize() * radius);
        }
    }
    points
}

/// Inner and outer radius of the shell sampled by [`surface_band_points`].
pub const SURFACE_BAND: (f32, f32) = (0.8, 1.3);
const BAND_RADII: u16 = 21;
const BAND_DIRECTIONS: u16 = 24;
/// Band points whose orbit passes closer than this to the escape radius are
/// skipped, since host and GPU may then disagree on the iteration count.
pub const MIN_ESCAPE_MARGIN: f32 = 1e-3;

/// Sample points through the shell where the surface lies.
///
/// Directions follow a Fibonacci spiral, so no point sits on a coordinate
/// axis. Orbits here run two to four iterations through the angular fold.
#[must_use]
pub fn surface_band_points() -> Vec<Vec3> {
    let (inner, outer) = SURFACE_BAND;
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let directions: Vec<Vec3> = (0..BAND_DIRECTIONS)
        .map(|i| {
            let i = f32::from(i);
            let z = 1.0 - (2.0 * i + 1.0) / f32::from(BAND_DIRECTIONS);
            let ring = (1.0 - z * z).sqrt();
            let angle = golden_angle * i;
            Vec3::new(ring * angle.cos(), ring * angle.sin(), z)
        })
        .collect();

    let mut points = Vec::with_capacity(usize::from(BAND_RADII * BAND_DIRECTIONS));
    for step in 0..BAND_RADII {
        let radius = inner + (outer - inner) * f32::from(step) / f32::from(BAND_RADII - 1);
        for dir in &directions {
            let p = *dir * radius;
            if fractal::distance::orbit(p).escape_margin >= MIN_ESCAPE_MARGIN {
                points.push(p);
            }
        }
    }
    points
}

/// Outcome of comparing host and GPU estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfCheckReport {
    pub samples: usize,
    pub mismatches: usize,
    pub max_error: f32,
}

impl SelfCheckReport {
    /// Compare host and GPU estimates pairwise.
    #[must_use]
    pub fn compare(points: &[Vec3], gpu: &[f32], tolerance: Tolerance) -> Self {
        let mut report = Self {
            samples: points.len(),
            mismatches: points.len().saturating_sub(gpu.len()),
            max_error: 0.0,
        };
        for (p, &g) in points.iter().zip(gpu) {
            let host = fractal::distance_estimate(*p);
            report.max_error = report.max_error.max((host - g).abs());
            if !tolerance.accepts(host, g) {
                tracing::debug!(point = ?p, host, gpu = g, "distance estimate mismatch");
                report.mismatches += 1;
            }
        }
        report
    }

    /// Combine the reports of two sample sets.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            samples: self.samples + other.samples,
            mismatches: self.mismatches + other.mismatches,
            max_error: self.max_error.max(other.max_error),
        }
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatches == 0
    }

    pub fn log(&self) {
        if self.is_consistent() {
            tracing::info!(samples = self.samples, max_error = self.max_error, "GPU distance estimator matches host");
        } else {
            tracing::warn!(
                samples = self.samples,
                mismatches = self.mismatches,
                max_error = self.max_error,
                "GPU distance estimator disagrees with host"
            );
        }
    }
}

/// Evaluate [`sample_points`] and [`surface_band_points`] on the GPU and
/// compare with the host estimator.
///
/// # Errors
///
/// Returns an error if the probe cannot run.
pub fn self_check(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<SelfCheckReport> {
    let probe = DistanceProbe::new(device);
    let points = sample_points();
    let gpu = probe.evaluate(device, queue, &points)?;
    let band = surface_band_points();
    let band_gpu = probe.evaluate(device, queue, &band)?;
    Ok(SelfCheckReport::compare(&points, &gpu, Tolerance::STRICT).merge(
        SelfCheckReport::compare(&band, &band_gpu, Tolerance::SURFACE_BAND),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_mismatches() {
        let points = [Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO];
        let host = fractal::distance_estimate(points[0]);
        let report = SelfCheckReport::compare(&points, &[host * 1.0005, 0.5], Tolerance::STRICT);
        assert_eq!(report.samples, 2);
        assert_eq!(report.mismatches, 1);
        assert!((report.max_error - 0.5).abs() < 1e-6);
    }

    #[test]
    fn short_gpu_result_counts_missing_samples() {
        let report = SelfCheckReport::compare(&sample_points(), &[], Tolerance::STRICT);
        assert!(!report.is_consistent());
        assert_eq!(report.mismatches, report.samples);
    }

    #[test]
    fn surface_band_reaches_multi_iteration_orbits() {
        let points = surface_band_points();
        let mut by_iterations = [0usize; 5];
        for p in &points {
            let radius = p.length();
            assert!(radius >= SURFACE_BAND.0 - 1e-5 && radius <= SURFACE_BAND.1 + 1e-5);
            let orbit = fractal::distance::orbit(*p);
            assert!(orbit.escape_margin >= MIN_ESCAPE_MARGIN);
            if fractal::distance_estimate(*p) > 0.0 {
                by_iterations[orbit.iterations as usize] += 1;
            }
        }
        // Non-zero estimates behind two, three and four folds are all compared.
        for iterations in 2..=4 {
            assert!(by_iterations[iterations] > 0, "{by_iterations:?}");
        }
        assert!(points.len() * 10 >= usize::from(BAND_RADII * BAND_DIRECTIONS) * 9);
    }

    #[test]
    fn surface_band_points_avoid_the_axes() {
        for p in surface_band_points() {
            assert!(p.x.abs() > 1e-4 || p.y.abs() > 1e-4, "{p:?}");
        }
    }

    #[test]
    fn band_tolerance_is_looser_than_strict() {
        assert!(!Tolerance::STRICT.accepts(0.1, 0.102));
        assert!(Tolerance::SURFACE_BAND.accepts(0.1, 0.102));
        assert!(!Tolerance::SURFACE_BAND.accepts(0.1, 0.2));
    }

    #[test]
    fn merged_report_sums_samples() {
        let a = SelfCheckReport {
            samples: 3,
            mismatches: 1,
            max_error: 0.2,
        };
        let b = SelfCheckReport {
            samples: 5,
            mismatches: 0,
            max_error: 0.4,
        };
        let merged = a.merge(b);
        assert_eq!(merged.samples, 8);
        assert_eq!(merged.mismatches, 1);
        assert_eq!(merged.max_error, 0.4);
    }
}
