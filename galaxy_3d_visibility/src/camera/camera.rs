/// Camera — passive view description consumed by the visibility walker
/// and the shadow fitter.
///
/// The caller (game engine) computes view and projection. `Camera` only
/// derives what follows mechanically from them: frustum planes, the eight
/// frustum corners, the eye position and the view basis vectors.

use glam::{Mat4, Vec3};
use super::frustum::{Frustum, FrustumCorners};

/// Camera roles with their own visibility cache and per-quad frame stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraRole {
    /// Main player view
    Player = 0,
    /// Shadow-map view, produced by the shadow fitter
    Shadow = 1,
    /// Water reflection view
    Reflection = 2,
    /// Environment-map capture view
    EnvMap = 3,
}

impl CameraRole {
    pub const COUNT: usize = 4;
    pub const ALL: [CameraRole; CameraRole::COUNT] = [
        CameraRole::Player,
        CameraRole::Shadow,
        CameraRole::Reflection,
        CameraRole::EnvMap,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// View description for one camera role.
#[derive(Debug, Clone)]
pub struct Camera {
    role: CameraRole,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
    corners: FrustumCorners,
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Create a camera from already computed frustum data.
    ///
    /// Eye position and basis are read from the inverse view matrix
    /// (right-handed, looking down -Z).
    pub fn new(
        role: CameraRole,
        view: Mat4,
        projection: Mat4,
        frustum: Frustum,
        corners: FrustumCorners,
    ) -> Self {
        let world = view.inverse();
        Self {
            role,
            view_matrix: view,
            projection_matrix: projection,
            frustum,
            corners,
            position: world.col(3).truncate(),
            forward: -world.col(2).truncate().normalize_or_zero(),
            right: world.col(0).truncate().normalize_or_zero(),
            up: world.col(1).truncate().normalize_or_zero(),
        }
    }

    /// Create a camera and derive planes and corners from view × projection.
    pub fn from_matrices(
        role: CameraRole,
        view: Mat4,
        projection: Mat4,
        clip_zero_to_one: bool,
    ) -> Self {
        let vp = projection * view;
        Self::new(
            role,
            view,
            projection,
            Frustum::from_view_projection(&vp, clip_zero_to_one),
            FrustumCorners::from_view_projection(&vp, clip_zero_to_one),
        )
    }

    // ===== GETTERS =====

    pub fn role(&self) -> CameraRole {
        self.role
    }

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Frustum planes for culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// World-space frustum corners (near 0..4, far 4..8).
    pub fn corners(&self) -> &FrustumCorners {
        &self.corners
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
