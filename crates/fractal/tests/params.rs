use fractal::params::FRAME_PARAMS_SIZE;
use fractal::{Camera, FrameError, FrameParams, MatrixKind};
use glam::{Mat4, Vec3};

#[test]
fn block_layout_matches_shader() {
    assert_eq!(FRAME_PARAMS_SIZE, 3 * 64 + 4 + 3 * 4);
    assert_eq!(std::mem::offset_of!(FrameParams, proj), 0);
    assert_eq!(std::mem::offset_of!(FrameParams, inv_world), 64);
    assert_eq!(std::mem::offset_of!(FrameParams, inv_view), 128);
    assert_eq!(std::mem::offset_of!(FrameParams, dist), 192);
    assert_eq!(std::mem::offset_of!(FrameParams, _pad), 196);
}

#[test]
fn packed_block_decodes_to_inverses() {
    let mut camera = Camera::default();
    camera.set_view_params(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.5, 0.0));
    camera.set_scale(0.4);

    let block = FrameParams::pack(&camera, 0.8).unwrap();
    let bytes = bytemuck::bytes_of(&block).to_vec();
    assert_eq!(bytes.len(), FRAME_PARAMS_SIZE);

    // Read back as the shader would see the uniform buffer.
    let decoded = FrameParams::from_bytes(&bytes);
    assert!(decoded.proj_matrix().abs_diff_eq(camera.proj_matrix(), 1e-6));
    assert!((decoded.inv_world_matrix() * camera.world_matrix()).abs_diff_eq(Mat4::IDENTITY, 1e-5));
    assert!((decoded.inv_view_matrix() * camera.view_matrix()).abs_diff_eq(Mat4::IDENTITY, 1e-5));
    assert_eq!(decoded.dist, 0.8);
    assert_eq!(decoded._pad, [0.0; 3]);
}

#[test]
fn inverse_view_maps_origin_to_eye() {
    let camera = Camera::default();
    let block = FrameParams::pack(&camera, 1.0).unwrap();
    let eye = block.inv_view_matrix().transform_point3(Vec3::ZERO);
    assert!(eye.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
}

#[test]
fn zero_scale_is_rejected() {
    let mut camera = Camera::default();
    camera.set_scale(0.0);
    let err = FrameParams::pack(&camera, 0.0).unwrap_err();
    assert_eq!(err, FrameError::SingularMatrix { matrix: MatrixKind::World });
}

#[test]
fn eye_on_target_is_rejected() {
    let mut camera = Camera::default();
    camera.set_view_params(Vec3::ONE, Vec3::ONE);
    let err = FrameParams::pack(&camera, 1.0).unwrap_err();
    assert_eq!(err, FrameError::SingularMatrix { matrix: MatrixKind::View });
}

#[test]
fn zero_height_projection_is_rejected() {
    let mut camera = Camera::default();
    camera.resize(640, 0);
    let err = FrameParams::pack(&camera, 1.0).unwrap_err();
    assert_eq!(err, FrameError::SingularMatrix { matrix: MatrixKind::Projection });
}
