use glam::{Mat4, Vec2, Vec3};
use crate::camera::{Camera, CameraRole};
use crate::grid::DrawGrid;
use super::*;

fn grid_4x4() -> DrawGrid {
    DrawGrid::new(Vec2::new(400.0, 400.0), 100.0).unwrap()
}

/// Orthographic camera looking straight down at (x, z), seeing `half` units around it
fn overhead(x: f32, z: f32, half: f32) -> Camera {
    let view = Mat4::look_at_rh(Vec3::new(x, 500.0, z), Vec3::new(x, 0.0, z), Vec3::NEG_Z);
    let projection = Mat4::orthographic_rh(-half, half, -half, half, 1.0, 1000.0);
    Camera::from_matrices(CameraRole::Player, view, projection, true)
}

fn params(max_distance: f32) -> QuadWalkParams {
    QuadWalkParams {
        max_distance,
        extra_padding_xz: 0,
        extra_padding_height: 100.0,
        terrain_min_height: 0.0,
        terrain_max_height: 0.0,
    }
}

fn walk(camera: &Camera, params: &QuadWalkParams) -> Vec<u32> {
    let mut quads = Vec::new();
    QuadWalker::new().walk(&grid_4x4(), camera, params, |quad| quads.push(quad));
    quads.sort_unstable();
    quads
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_overhead_camera_sees_every_quad_once() {
    let quads = walk(&overhead(200.0, 200.0, 250.0), &params(10_000.0));
    assert_eq!(quads, (0..16).collect::<Vec<u32>>());
}

#[test]
fn test_narrow_camera_sees_single_quad() {
    let quads = walk(&overhead(250.0, 150.0, 40.0), &params(10_000.0));
    assert_eq!(quads, vec![6]);
}

#[test]
fn test_padding_widens_cells() {
    let mut walk_params = params(10_000.0);
    walk_params.extra_padding_xz = 1;

    let quads = walk(&overhead(250.0, 150.0, 40.0), &walk_params);

    // 3x3 block around (2, 1)
    assert_eq!(quads, vec![1, 2, 3, 5, 6, 7, 9, 10, 11]);
}

#[test]
fn test_draw_distance_limits_window() {
    // radius = floor(100 / 100) + 1 = 2 cells around (0, 0)
    let quads = walk(&overhead(50.0, 50.0, 1000.0), &params(100.0));
    assert_eq!(quads, vec![0, 1, 2, 4, 5, 6, 8, 9, 10]);
}

#[test]
fn test_infinite_draw_distance_covers_grid() {
    let quads = walk(&overhead(50.0, 50.0, 1000.0), &params(f32::INFINITY));
    assert_eq!(quads.len(), 16);
}

// ============================================================================
// Height range
// ============================================================================

#[test]
fn test_terrain_height_range_controls_vertical_extent() {
    // Side view seeing only heights 530..570
    let view = Mat4::look_at_rh(Vec3::new(200.0, 550.0, 1000.0), Vec3::new(200.0, 550.0, 0.0), Vec3::Y);
    let projection = Mat4::orthographic_rh(-1000.0, 1000.0, -20.0, 20.0, 1.0, 2000.0);
    let camera = Camera::from_matrices(CameraRole::Reflection, view, projection, true);

    assert!(walk(&camera, &params(10_000.0)).is_empty());

    let mut high_terrain = params(10_000.0);
    high_terrain.terrain_max_height = 550.0;
    assert_eq!(walk(&camera, &high_terrain).len(), 16);
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_camera_outside_world_yields_nothing() {
    let quads = walk(&overhead(-10_000.0, -10_000.0, 40.0), &params(500.0));
    assert!(quads.is_empty());
}

#[test]
fn test_camera_looking_away_yields_nothing() {
    let view = Mat4::look_at_rh(Vec3::new(200.0, 500.0, 200.0), Vec3::new(200.0, 1000.0, 200.0), Vec3::Z);
    let projection = Mat4::perspective_rh(1.0, 1.0, 1.0, 1000.0);
    let camera = Camera::from_matrices(CameraRole::Player, view, projection, true);

    assert!(walk(&camera, &params(10_000.0)).is_empty());
}

#[test]
fn test_non_finite_camera_yields_nothing() {
    let camera = Camera::from_matrices(CameraRole::Player, Mat4::NAN, Mat4::IDENTITY, true);
    assert!(walk(&camera, &params(10_000.0)).is_empty());
    assert!(walk(&overhead(200.0, 200.0, 250.0), &params(f32::NAN)).is_empty());
    assert!(walk(&overhead(200.0, 200.0, 250.0), &params(-1.0)).is_empty());
}
