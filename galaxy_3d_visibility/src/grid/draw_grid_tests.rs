use glam::{Vec2, Vec3};
use crate::error::Error;
use super::*;

fn grid_4x4() -> DrawGrid {
    DrawGrid::new(Vec2::new(400.0, 400.0), 100.0).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_grid_dimensions() {
    let grid = grid_4x4();
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.height(), 4);
    assert_eq!(grid.cell_count(), 16);
    assert_eq!(grid.world_extent(), Vec2::new(400.0, 400.0));
}

#[test]
fn test_grid_rounds_down_but_has_at_least_one_cell() {
    let grid = DrawGrid::new(Vec2::new(450.0, 50.0), 100.0).unwrap();
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.height(), 1);
}

#[test]
fn test_grid_rejects_invalid_cell_size() {
    for cell_size in [0.0, -10.0, f32::NAN, f32::INFINITY] {
        let result = DrawGrid::new(Vec2::new(400.0, 400.0), cell_size);
        assert!(matches!(result, Err(Error::InvalidConfig(_))), "cell size {}", cell_size);
    }
}

#[test]
fn test_grid_rejects_invalid_map_size() {
    let result = DrawGrid::new(Vec2::new(0.0, 400.0), 100.0);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    let result = DrawGrid::new(Vec2::new(400.0, f32::NAN), 100.0);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_grid_rejects_too_many_cells() {
    let result = DrawGrid::new(Vec2::new(1.0e9, 1.0e9), 1.0);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

// ============================================================================
// Mapping
// ============================================================================

#[test]
fn test_cell_of_inside_map() {
    let grid = grid_4x4();
    assert_eq!(grid.cell_of(250.0, 150.0), (2, 1));
    assert_eq!(grid.cell_of(50.0, 50.0), (0, 0));
    assert_eq!(grid.cell_of(100.0, 399.9), (1, 3));
}

#[test]
fn test_cell_of_clamps_outside_positions() {
    let grid = grid_4x4();
    assert_eq!(grid.cell_of(-500.0, 10.0), (0, 0));
    assert_eq!(grid.cell_of(400.0, 1.0e9), (3, 3));
    assert_eq!(grid.cell_of(f32::NAN, f32::NEG_INFINITY), (0, 0));
    assert_eq!(grid.cell_of(f32::INFINITY, 250.0), (3, 2));
}

#[test]
fn test_index_and_coords_are_inverse() {
    let grid = DrawGrid::new(Vec2::new(700.0, 300.0), 100.0).unwrap();
    for index in 0..grid.cell_count() as u32 {
        let (cx, cz) = grid.coords(index);
        assert_eq!(grid.index(cx, cz), index);
    }
    // Row 1 of a 7-wide grid, column 2
    assert_eq!(grid.cell_index_of(Vec3::new(250.0, 7.0, 150.0)), 9);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_cell_bounds() {
    let grid = grid_4x4();
    let aabb = grid.cell_bounds(2, 1, -5.0, 20.0);
    assert_eq!(aabb.min, Vec3::new(200.0, -5.0, 100.0));
    assert_eq!(aabb.max, Vec3::new(300.0, 20.0, 200.0));
}

#[test]
fn test_block_bounds_with_padding() {
    let grid = grid_4x4();
    let aabb = grid.block_bounds((0, 1), (1, 3), 0.0, 10.0, 100.0);
    assert_eq!(aabb.min, Vec3::new(-100.0, 0.0, 0.0));
    assert_eq!(aabb.max, Vec3::new(300.0, 10.0, 500.0));
}
