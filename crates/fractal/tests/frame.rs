use fractal::{distance_estimate, prepare_frame, Camera, CameraInput, CameraMode, SCALE_FACTOR};
use glam::{Mat4, Vec2, Vec3};

#[test]
fn scale_tracks_distance_at_current_eye() {
    let mut camera = Camera::default();
    let mut input = CameraInput::default();

    let frame = prepare_frame(&mut camera, &mut input, 0.016).unwrap();
    assert_eq!(frame.eye, Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(frame.distance, distance_estimate(frame.eye));
    assert_eq!(camera.scale(), frame.distance * SCALE_FACTOR);
    assert_eq!(frame.params.dist, frame.distance);
}

#[test]
fn no_lag_after_camera_moves() {
    let mut camera = Camera::default();
    let mut input = CameraInput::default();
    prepare_frame(&mut camera, &mut input, 0.016).unwrap();

    input.zoom = 2.0;
    input.orbit = Vec2::new(30.0, -10.0);
    let frame = prepare_frame(&mut camera, &mut input, 0.016).unwrap();

    assert_eq!(frame.eye, camera.eye());
    assert_ne!(frame.eye, Vec3::new(3.0, 0.0, 0.0));
    let expected_scale = distance_estimate(camera.eye()) * SCALE_FACTOR;
    assert_eq!(camera.scale(), expected_scale);

    // The packed inverse world matrix reflects this frame's scale.
    let world = Mat4::from_cols_array_2d(&frame.params.inv_world).inverse();
    let scale = world.to_scale_rotation_translation().0;
    assert!((scale.x - expected_scale).abs() <= 1e-5 * expected_scale);
}

#[test]
fn first_person_frames_keep_unit_world() {
    let mut camera = Camera::new(CameraMode::FirstPerson, 640, 480);
    let mut input = CameraInput::default();
    let frame = prepare_frame(&mut camera, &mut input, 0.016).unwrap();
    assert_eq!(frame.params.inv_world, Mat4::IDENTITY.to_cols_array_2d());
    assert_eq!(frame.params.dist, distance_estimate(Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn eye_inside_set_skips_frame() {
    let mut camera = Camera::default();
    camera.set_view_params(Vec3::new(1e-8, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
    let mut input = CameraInput::default();
    assert!(prepare_frame(&mut camera, &mut input, 0.016).is_err());
}

#[test]
fn zooming_in_never_reaches_the_interior() {
    let mut camera = Camera::default();
    let mut input = CameraInput::default();
    for step in 0..100 {
        input.zoom = 3.0;
        input.orbit = Vec2::new(17.0, if step % 2 == 0 { 9.0 } else { -13.0 });
        let frame = prepare_frame(&mut camera, &mut input, 0.016).unwrap();
        assert!(frame.distance > 0.0, "eye {:?} reached the set", frame.eye);
    }
}
