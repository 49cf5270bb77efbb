use fractal::distance::{distance_estimate, orbit, ESCAPE_RADIUS, ITERATIONS, SAFETY_FACTOR};
use fractal::CameraSettings;
use glam::Vec3;

#[test]
fn outside_escape_radius_is_closed_form() {
    for p in [
        Vec3::new(3.5, 0.0, 0.0),
        Vec3::new(0.0, -4.0, 0.0),
        Vec3::new(2.0, 2.0, 2.0),
        Vec3::new(-10.0, 3.0, 7.0),
    ] {
        let r = p.length();
        assert!(r >= ESCAPE_RADIUS);
        let expected = SAFETY_FACTOR * r.ln() * r / 1.0;
        let d = distance_estimate(p);
        assert!((d - expected).abs() <= 1e-5 * expected, "p={p:?} d={d} expected={expected}");
    }
}

#[test]
fn eye_on_escape_boundary() {
    // r == 3 fails `r < 3`, so the loop body never runs.
    let d = distance_estimate(Vec3::new(3.0, 0.0, 0.0));
    let expected = 0.35 * 3.0_f32.ln() * 3.0;
    assert!(d >= 0.0);
    assert!((d - expected).abs() < 1e-6, "d={d} expected={expected}");
}

#[test]
fn origin_is_finite_and_non_negative() {
    let d = distance_estimate(Vec3::ZERO);
    assert!(d.is_finite());
    assert!(d >= 0.0);
}

#[test]
fn tiny_radius_counts_as_surface() {
    let d = distance_estimate(Vec3::new(1e-8, 0.0, 0.0));
    assert_eq!(d, 0.0);
}

#[test]
fn estimate_is_finite_and_non_negative_on_grid() {
    for ix in -8..=8 {
        for iy in -8..=8 {
            for iz in -8..=8 {
                let p = Vec3::new(ix as f32, iy as f32, iz as f32) * 0.25;
                let d = distance_estimate(p);
                assert!(d.is_finite(), "non-finite at {p:?}");
                assert!(d >= 0.0, "negative at {p:?}: {d}");
            }
        }
    }
}

#[test]
fn estimate_is_deterministic() {
    let points = [
        Vec3::new(0.3, 0.7, -0.2),
        Vec3::new(1.1, 0.0, 0.4),
        Vec3::new(-0.5, -0.5, 0.5),
    ];
    for p in points {
        let first = distance_estimate(p);
        for _ in 0..16 {
            assert_eq!(distance_estimate(p).to_bits(), first.to_bits());
        }
    }
}

#[test]
fn estimate_grows_far_from_the_set() {
    let near = distance_estimate(Vec3::new(3.0, 0.0, 0.0));
    let far = distance_estimate(Vec3::new(6.0, 0.0, 0.0));
    assert!(far > near);
}

#[test]
fn estimate_is_built_from_orbit() {
    for p in [Vec3::new(0.6, 0.5, 0.4), Vec3::new(-0.7, 0.3, 0.6), Vec3::new(0.2, -0.9, 0.5)] {
        let o = orbit(p);
        assert!(o.iterations <= ITERATIONS);
        let expected = (SAFETY_FACTOR * o.r.ln() * o.r / o.dr).max(0.0);
        assert_eq!(distance_estimate(p).to_bits(), expected.to_bits(), "p={p:?}");
    }
}

#[test]
fn closest_zoom_radius_is_outside_the_set() {
    let radius = CameraSettings::default().min_radius;
    for i in 0..64 {
        for j in 0..=16 {
            let yaw = i as f32 / 64.0 * std::f32::consts::TAU;
            let pitch = (j as f32 / 16.0 - 0.5) * std::f32::consts::PI;
            let dir = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
            let p = dir * radius;
            assert!(distance_estimate(p) > 0.0, "p={p:?}");
        }
    }
}
