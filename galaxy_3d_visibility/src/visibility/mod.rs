//! Per-camera quad visibility: the grid walker and its per-role cache.

mod quad_walker;
mod visibility_cache;

pub use quad_walker::{QuadWalkParams, QuadWalker};
pub use visibility_cache::VisibilityCache;

use crate::objects::{DrawStateKey, ModelType, ObjectKey};

/// One non-empty bin of a visible quad.
#[derive(Debug, Clone, Copy)]
pub struct VisibleBin<'a> {
    pub quad: u32,
    pub model_type: ModelType,
    pub draw_state: DrawStateKey,
    pub objects: &'a [ObjectKey],
}
