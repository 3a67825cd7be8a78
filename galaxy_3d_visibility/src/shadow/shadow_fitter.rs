//! Shadow frustum fitter.
//!
//! Once per frame, derives a light-aligned orthographic view/projection that
//! bounds the part of the player camera's frustum overlapping the world:
//!
//! 1. light basis: Z points toward the light, X is world up (or world X when
//!    the light is near vertical) made orthogonal to Z, Y = Z × X
//! 2. far frustum corners are clipped against the world's top and bottom
//!    planes; mid = average of the clipped far corners and the eye
//! 3. the light camera sits above mid where the light-space world box ends
//! 4. the light-space box of the clipped corners and the eye gives the
//!    orthographic extents; its near bound is the camera itself (z = 0)

use glam::{Mat3, Mat4, Vec2, Vec3};
use crate::bounds::AABB;
use crate::camera::{Camera, CameraRole};
use crate::engine_warn;

/// Smallest projection extent on any axis, in world units
pub const MIN_PROJECTION_EXTENT: f32 = 1.0e-3;

/// Light direction used when the supplied one has no usable direction
pub const FALLBACK_LIGHT_DIRECTION: Vec3 = Vec3::NEG_Y;

/// World volume shadows are fitted against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Map size along X and Z
    pub map_extent: Vec2,
    pub terrain_min_height: f32,
    pub terrain_max_height: f32,
    /// Union of drawable object bounds, may exceed the terrain
    pub drawable_bounds: Option<AABB>,
}

impl WorldBounds {
    /// Map extent × terrain height range, grown by the drawable bounds.
    pub fn aabb(&self) -> AABB {
        let low = finite_or(self.terrain_min_height, 0.0);
        let high = finite_or(self.terrain_max_height, 0.0);
        let extent = if self.map_extent.is_finite() { self.map_extent.max(Vec2::ZERO) } else { Vec2::ZERO };

        let terrain = AABB::new(
            Vec3::new(0.0, low.min(high), 0.0),
            Vec3::new(extent.x, low.max(high), extent.y),
        );
        match self.drawable_bounds {
            Some(objects) if objects.is_valid() && objects.is_finite() => terrain.union(&objects),
            _ => terrain,
        }
    }
}

/// Result of one fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFit {
    /// Light-space axes in world space (columns X, Y, Z; Z toward the light)
    pub light_basis: Mat3,
    /// World box in the rotated (untranslated) light space
    pub world_light_aabb: AABB,
    /// Fitted box in shadow view space; `max.z` is 0
    pub light_aabb: AABB,
    /// Average of the clipped far corners and the eye
    pub mid_position: Vec3,
    /// Far frustum corners after clipping against the world's top and bottom
    pub clipped_far_corners: [Vec3; 4],
    /// Shadow camera position in world space
    pub camera_position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub clip_zero_to_one: bool,
}

impl ShadowFit {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Near and far distances of the orthographic projection
    pub fn depth_range(&self) -> (f32, f32) {
        (-self.light_aabb.max.z, -self.light_aabb.min.z)
    }

    /// Shadow-role camera for the shadow visibility walk.
    pub fn shadow_camera(&self) -> Camera {
        Camera::from_matrices(CameraRole::Shadow, self.view, self.projection, self.clip_zero_to_one)
    }
}

impl Default for ShadowFit {
    fn default() -> Self {
        let zero = AABB::new(Vec3::ZERO, Vec3::ZERO);
        Self {
            light_basis: Mat3::IDENTITY,
            world_light_aabb: zero,
            light_aabb: zero,
            mid_position: Vec3::ZERO,
            clipped_far_corners: [Vec3::ZERO; 4],
            camera_position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: orthographic_projection(&zero, true),
            clip_zero_to_one: true,
        }
    }
}

/// Keeps the most recent fit; no other state survives between frames.
#[derive(Debug, Clone, Default)]
pub struct ShadowFitter {
    current: ShadowFit,
}

impl ShadowFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &ShadowFit {
        &self.current
    }

    /// Fit the shadow volume for `camera` against `world`.
    ///
    /// `light_direction` points from the light into the scene.
    pub fn fit(
        &mut self,
        camera: &Camera,
        world: &AABB,
        light_direction: Vec3,
        clip_zero_to_one: bool,
    ) -> &ShadowFit {
        self.current = compute_fit(camera, world, light_direction, clip_zero_to_one);
        &self.current
    }
}

fn compute_fit(camera: &Camera, world: &AABB, light_direction: Vec3, clip_zero_to_one: bool) -> ShadowFit {
    let world = if world.is_valid() && world.is_finite() {
        *world
    } else {
        AABB::new(Vec3::ZERO, Vec3::ZERO)
    };

    // ComputeLightBasis
    let light_basis = light_basis(light_direction);
    let to_light_space = Mat4::from_mat3(light_basis.transpose());
    let world_light_aabb = world.transformed(&to_light_space);

    // ClipFrustumToWorldBounds
    let eye = if camera.position().is_finite() {
        camera.position()
    } else {
        world.center()
    };
    let far = camera.corners().far();
    let clipped_far_corners: [Vec3; 4] = std::array::from_fn(|i| {
        let corner = far[i];
        if corner.is_finite() {
            clip_to_height_slab(eye, corner, world.min.y, world.max.y)
        } else {
            eye
        }
    });
    let mid_position = (clipped_far_corners.iter().copied().sum::<Vec3>() + eye) / 5.0;

    // DeriveOrthographicBox
    let mid_light = to_light_space.transform_point3(mid_position);
    let camera_light = Vec3::new(mid_light.x, mid_light.y, world_light_aabb.max.z);
    let view = Mat4::from_translation(-camera_light) * to_light_space;
    let camera_position = light_basis * camera_light;

    let mut light_aabb = AABB::from_points(
        clipped_far_corners.iter().chain(std::iter::once(&eye)).map(|p| view.transform_point3(*p)),
    );
    if !light_aabb.is_valid() {
        light_aabb = AABB::new(Vec3::ZERO, Vec3::ZERO);
    }
    let world_bottom = world_light_aabb.min.z - camera_light.z;
    light_aabb.max.z = 0.0;
    light_aabb.min.z = light_aabb.min.z.max(world_bottom).min(0.0);

    ShadowFit {
        light_basis,
        world_light_aabb,
        light_aabb,
        mid_position,
        clipped_far_corners,
        camera_position,
        view,
        projection: orthographic_projection(&light_aabb, clip_zero_to_one),
        clip_zero_to_one,
    }
}

/// Orthonormal light basis; the Z column points toward the light.
pub fn light_basis(light_direction: Vec3) -> Mat3 {
    let mut z = -light_direction.normalize_or_zero();
    if z == Vec3::ZERO {
        engine_warn!("galaxy3d::ShadowFitter",
            "Light direction {:?} is unusable, falling back to {:?}",
            light_direction, FALLBACK_LIGHT_DIRECTION);
        z = -FALLBACK_LIGHT_DIRECTION;
    }

    let seed = if Vec3::Y.dot(z).abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let x = (seed - seed.dot(z) * z).normalize();
    let y = z.cross(x);
    Mat3::from_cols(x, y, z)
}

/// Pull `corner` back along the eye→corner ray onto the bottom (or top)
/// plane of the world when the ray crosses it.
pub fn clip_to_height_slab(eye: Vec3, corner: Vec3, min_y: f32, max_y: f32) -> Vec3 {
    let on_plane = |height: f32| {
        let t = (height - eye.y) / (corner.y - eye.y);
        let mut point = eye + (corner - eye) * t;
        point.y = height;
        point
    };

    if corner.y < min_y && eye.y > min_y {
        on_plane(min_y)
    } else if corner.y > max_y && eye.y < max_y {
        on_plane(max_y)
    } else {
        corner
    }
}

/// Orthographic projection of a view-space box looking down -Z.
///
/// Axes thinner than [`MIN_PROJECTION_EXTENT`] are widened around their
/// center so the matrix stays finite.
pub fn orthographic_projection(aabb: &AABB, clip_zero_to_one: bool) -> Mat4 {
    let (left, right) = widen(aabb.min.x, aabb.max.x);
    let (bottom, top) = widen(aabb.min.y, aabb.max.y);
    let (near, far) = widen(-aabb.max.z, -aabb.min.z);

    if clip_zero_to_one {
        Mat4::orthographic_rh(left, right, bottom, top, near, far)
    } else {
        Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
    }
}

fn widen(low: f32, high: f32) -> (f32, f32) {
    if high - low >= MIN_PROJECTION_EXTENT {
        return (low, high);
    }
    let center = finite_or(0.5 * (low + high), 0.0);
    (center - 0.5 * MIN_PROJECTION_EXTENT, center + 0.5 * MIN_PROJECTION_EXTENT)
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
#[path = "shadow_fitter_tests.rs"]
mod tests;
