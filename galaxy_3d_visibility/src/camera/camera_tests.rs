use glam::{Mat4, Vec3};
use super::*;

fn perspective_camera(role: CameraRole, eye: Vec3, target: Vec3) -> Camera {
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    Camera::from_matrices(role, view, proj, true)
}

// ============================================================================
// CameraRole
// ============================================================================

#[test]
fn test_role_indices_are_dense() {
    for (i, role) in CameraRole::ALL.iter().enumerate() {
        assert_eq!(role.index(), i);
    }
    assert_eq!(CameraRole::ALL.len(), CameraRole::COUNT);
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_from_matrices() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);

    let camera = Camera::from_matrices(CameraRole::Reflection, view, proj, true);

    assert_eq!(camera.role(), CameraRole::Reflection);
    assert_eq!(*camera.view_matrix(), view);
    assert_eq!(*camera.projection_matrix(), proj);
    assert_eq!(camera.view_projection_matrix(), proj * view);
    assert!(camera.corners().is_finite());
}

#[test]
fn test_camera_new_keeps_supplied_frustum() {
    let view = Mat4::IDENTITY;
    let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0);
    let frustum = Frustum::from_view_projection(&Mat4::IDENTITY, false);
    let corners = FrustumCorners::from_view_projection(&(proj * view), true);

    let camera = Camera::new(CameraRole::Player, view, proj, frustum, corners);

    assert_eq!(camera.frustum().planes, frustum.planes);
    assert_eq!(*camera.corners(), corners);
}

// ============================================================================
// Derived basis
// ============================================================================

#[test]
fn test_camera_position_and_basis() {
    let camera = perspective_camera(CameraRole::Player, Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

    assert!((camera.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    assert!((camera.right() - Vec3::X).length() < 1e-5);
    assert!((camera.up() - Vec3::Y).length() < 1e-5);
}

#[test]
fn test_camera_basis_is_orthonormal() {
    let camera = perspective_camera(
        CameraRole::Player,
        Vec3::new(300.0, 150.0, -40.0),
        Vec3::new(10.0, 0.0, 20.0),
    );

    assert!((camera.forward().length() - 1.0).abs() < 1e-5);
    assert!(camera.forward().dot(camera.right()).abs() < 1e-5);
    assert!(camera.forward().dot(camera.up()).abs() < 1e-5);
    assert!((camera.right().cross(camera.up()) - -camera.forward()).length() < 1e-4);
}

#[test]
fn test_camera_far_corners_are_in_front() {
    let camera = perspective_camera(CameraRole::Player, Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, 0.0, -50.0));

    for corner in camera.corners().far() {
        let to_corner = *corner - camera.position();
        assert!(to_corner.dot(camera.forward()) > 0.0);
    }
}
