//! Camera module — camera roles, frustum planes and frustum corners.
//!
//! Cameras are passive: the caller owns and drives them, the visibility
//! pipeline only reads them.

mod camera;
mod frustum;

pub use camera::{Camera, CameraRole};
pub use frustum::{
    Frustum, FrustumCorners, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
