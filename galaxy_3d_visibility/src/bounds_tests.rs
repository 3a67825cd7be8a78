use glam::{Mat4, Vec3};
use super::*;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_empty_box_is_invalid_and_has_zero_volume() {
    let aabb = AABB::EMPTY;
    assert!(!aabb.is_valid());
    assert_eq!(aabb.size(), Vec3::ZERO);
    assert_eq!(aabb.volume(), 0.0);
}

#[test]
fn test_add_point_from_empty_gives_point_box() {
    let mut aabb = AABB::EMPTY;
    aabb.add_point(Vec3::new(1.0, 2.0, 3.0));
    assert!(aabb.is_valid());
    assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.volume(), 0.0);
}

#[test]
fn test_from_points_ignores_non_finite() {
    let aabb = AABB::from_points([
        Vec3::new(-1.0, 0.0, 2.0),
        Vec3::new(f32::NAN, 100.0, 0.0),
        Vec3::new(3.0, 4.0, -2.0),
        Vec3::new(f32::INFINITY, 0.0, 0.0),
    ]);
    assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
    assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 2.0));
    assert!(aabb.is_finite());
}

#[test]
fn test_reset_returns_to_empty() {
    let mut aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
    aabb.reset();
    assert_eq!(aabb, AABB::EMPTY);
    assert_eq!(AABB::default(), AABB::EMPTY);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_center_size_volume() {
    let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
    assert!((aabb.volume() - 48.0).abs() < 1e-5);
}

#[test]
fn test_union_with_empty_is_identity() {
    let aabb = AABB::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.union(&AABB::EMPTY), aabb);
    assert_eq!(AABB::EMPTY.union(&aabb), aabb);
}

#[test]
fn test_corners_cover_all_combinations() {
    let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
    let corners = aabb.corners();
    assert_eq!(corners[0], Vec3::ZERO);
    assert_eq!(corners[7], Vec3::ONE);
    assert_eq!(corners[1], Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(corners[2], Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(corners[4], Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(AABB::from_points(corners), aabb);
}

#[test]
fn test_contains_and_intersects() {
    let outer = AABB::new(Vec3::ZERO, Vec3::splat(10.0));
    let inner = AABB::new(Vec3::splat(2.0), Vec3::splat(3.0));
    let touching = AABB::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(12.0, 1.0, 1.0));
    let apart = AABB::new(Vec3::splat(20.0), Vec3::splat(21.0));

    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.intersects(&touching));
    assert!(!outer.intersects(&apart));
    assert!(outer.contains_point(Vec3::splat(10.0)));
    assert!(!outer.contains_point(Vec3::new(10.5, 0.0, 0.0)));
}

#[test]
fn test_expanded_grows_every_side() {
    let aabb = AABB::new(Vec3::ZERO, Vec3::ONE).expanded(Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
    assert_eq!(aabb.max, Vec3::new(2.0, 1.0, 3.0));
}

// ============================================================================
// Transformation
// ============================================================================

#[test]
fn test_transformed_by_translation() {
    let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
    let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(5.0, 0.0, -1.0)));
    assert_eq!(moved.min, Vec3::new(5.0, 0.0, -1.0));
    assert_eq!(moved.max, Vec3::new(6.0, 1.0, 0.0));
}

#[test]
fn test_transformed_matches_corner_fit() {
    let aabb = AABB::new(Vec3::new(-1.0, -2.0, -0.5), Vec3::new(3.0, 1.0, 2.0));
    let matrix = Mat4::from_rotation_y(0.7) * Mat4::from_rotation_x(-0.3);
    let fast = aabb.transformed(&matrix);
    let slow = AABB::from_points(aabb.corners().map(|c| matrix.transform_point3(c)));
    assert!((fast.min - slow.min).length() < 1e-4, "min mismatch");
    assert!((fast.max - slow.max).length() < 1e-4, "max mismatch");
}
