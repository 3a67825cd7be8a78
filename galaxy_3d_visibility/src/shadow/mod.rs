//! Light-aligned shadow volume fitting.

mod shadow_fitter;

pub use shadow_fitter::{
    clip_to_height_slab, light_basis, orthographic_projection,
    ShadowFit, ShadowFitter, WorldBounds,
    FALLBACK_LIGHT_DIRECTION, MIN_PROJECTION_EXTENT,
};
