/// Frustum — six clipping planes and eight corners of a view volume.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// Both are derived from a view-projection matrix. `clip_zero_to_one`
/// selects the clip-space depth convention: `true` for [0, 1]
/// (`Mat4::perspective_rh`), `false` for [-1, 1] (`Mat4::perspective_rh_gl`).

use glam::{Mat4, Vec3, Vec4};
use crate::bounds::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Used by the quad walker for hierarchical culling of grid blocks:
/// - `Outside` → skip the entire block
/// - `Inside` → emit every cell of the block without further testing
/// - `Partial` → split the block and recurse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes for culling.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Normal (A, B, C) points inward (toward the visible volume).
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4, clip_zero_to_one: bool) -> Self {
        let m = vp.to_cols_array_2d();

        let row = |r: usize| Vec4::new(m[0][r], m[1][r], m[2][r], m[3][r]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        let mut planes = [
            r3 + r0,
            r3 - r0,
            r3 + r1,
            r3 - r1,
            // Near: z_clip >= 0 or z_clip >= -w
            if clip_zero_to_one { r2 } else { r3 + r2 },
            r3 - r2,
        ];

        for plane in &mut planes {
            let normal_len = plane.truncate().length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// Signed distance of a point to one plane (positive = inside).
    pub fn distance(&self, plane: usize, point: Vec3) -> f32 {
        self.planes[plane].truncate().dot(point) + self.planes[plane].w
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != FrustumTest::Outside
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - If all n-vertices are inside all planes → `Inside`
    ///
    /// A frustum containing NaN classifies everything as `Outside`.
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = plane.truncate();

            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            let distance = normal.dot(p_vertex) + plane.w;
            if distance.is_nan() || distance < 0.0 {
                return FrustumTest::Outside;
            }

            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

// ===== CORNERS =====

/// Eight frustum corners in world space.
///
/// Indices 0..4 lie on the near plane, 4..8 on the far plane, both in the
/// order (-x,-y), (+x,-y), (+x,+y), (-x,+y) of normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumCorners {
    pub points: [Vec3; 8],
}

impl FrustumCorners {
    pub const NEAR: std::ops::Range<usize> = 0..4;
    pub const FAR: std::ops::Range<usize> = 4..8;

    /// Unproject the clip-space cube corners through the inverse view-projection.
    ///
    /// A singular matrix yields non-finite corners; consumers skip those.
    pub fn from_view_projection(vp: &Mat4, clip_zero_to_one: bool) -> Self {
        let inverse = vp.inverse();
        let near_z = if clip_zero_to_one { 0.0 } else { -1.0 };
        let xy = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let points = std::array::from_fn(|i| {
            let (x, y) = xy[i % 4];
            let z = if i < 4 { near_z } else { 1.0 };
            inverse.project_point3(Vec3::new(x, y, z))
        });

        Self { points }
    }

    pub fn near(&self) -> &[Vec3] {
        &self.points[Self::NEAR]
    }

    pub fn far(&self) -> &[Vec3] {
        &self.points[Self::FAR]
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
