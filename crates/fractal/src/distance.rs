//! Distance estimator for the power-7 Mandelbulb variant.
//!
//! The WGSL raymarch shader carries a line-for-line copy of
//! [`distance_estimate`]. Any change to the constants or the iteration order
//! here must be mirrored in `mandelbulb.wgsl`, otherwise camera auto-scaling
//! and the rendered surface drift apart.

use glam::Vec3;

/// Maximum number of escape-time iterations.
pub const ITERATIONS: u32 = 4;
/// Iteration stops once the running radius reaches this value.
pub const ESCAPE_RADIUS: f32 = 3.0;
/// Exponent applied to the running radius each iteration.
pub const POWER: f32 = 7.0;
/// Multiplier applied to both spherical angles. Not equal to [`POWER`].
pub const ANGULAR_MULTIPLIER: f32 = 8.0;
/// Under-estimation factor keeping sphere tracing from overstepping.
pub const SAFETY_FACTOR: f32 = 0.35;
/// Radii below this are treated as lying on the surface.
pub const MIN_RADIUS: f32 = 1e-6;

/// Escape-time summary of a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Running radius when the loop stopped
    pub r: f32,
    /// Running derivative when the loop stopped
    pub dr: f32,
    /// Number of loop bodies executed
    pub iterations: u32,
    /// Smallest relative gap between the running radius and
    /// [`ESCAPE_RADIUS`] over every loop test. Near zero means the iteration
    /// count hinges on the last bits of the radius.
    pub escape_margin: f32,
}

/// Run the escape-time iteration for `p`.
///
/// Stops early once the running radius collapses below [`MIN_RADIUS`].
#[must_use]
pub fn orbit(p: Vec3) -> Orbit {
    let mut c = p;
    let mut orbit = Orbit {
        r: c.length(),
        dr: 1.0,
        iterations: 0,
        escape_margin: escape_gap(c.length()),
    };

    while orbit.iterations < ITERATIONS && orbit.r < ESCAPE_RADIUS {
        if orbit.r < MIN_RADIUS {
            break;
        }
        let r = orbit.r;
        let xr = r.powf(POWER);
        orbit.dr = (POWER - 1.0) * xr * orbit.dr + 1.0;

        let theta = c.y.atan2(c.x) * ANGULAR_MULTIPLIER;
        let phi = (c.z / r).clamp(-1.0, 1.0).asin() * ANGULAR_MULTIPLIER;
        let folded = r * xr;
        c = folded * Vec3::new(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin());

        c += p;
        orbit.r = c.length();
        orbit.iterations += 1;
        if orbit.iterations < ITERATIONS {
            orbit.escape_margin = orbit.escape_margin.min(escape_gap(orbit.r));
        }
    }
    orbit
}

fn escape_gap(r: f32) -> f32 {
    (r - ESCAPE_RADIUS).abs() / ESCAPE_RADIUS
}

/// Estimate the distance from `p` to the fractal surface.
///
/// Returns a finite, non-negative value. Points whose running radius collapses
/// to zero, and interior points where the estimate turns negative, report
/// `0.0`.
#[must_use]
pub fn distance_estimate(p: Vec3) -> f32 {
    let Orbit { r, dr, .. } = orbit(p);
    if r < MIN_RADIUS {
        return 0.0;
    }
    (SAFETY_FACTOR * r.ln() * r / dr).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_radius_point_skips_iteration() {
        let d = distance_estimate(Vec3::new(3.0, 0.0, 0.0));
        let expected = SAFETY_FACTOR * 3.0_f32.ln() * 3.0;
        assert!((d - expected).abs() < 1e-6, "d={d} expected={expected}");
    }

    #[test]
    fn origin_is_on_surface() {
        assert_eq!(distance_estimate(Vec3::ZERO), 0.0);
    }

    #[test]
    fn orbit_counts_iterations() {
        assert_eq!(orbit(Vec3::new(3.0, 0.0, 0.0)).iterations, 0);
        // 1.3^8 lands far outside the escape radius after one fold.
        assert_eq!(orbit(Vec3::new(0.0, 1.3, 0.0)).iterations, 1);
        // Interior points shrink towards the input and never escape.
        assert_eq!(orbit(Vec3::new(0.0, 0.25, 0.0)).iterations, ITERATIONS);
    }
}
