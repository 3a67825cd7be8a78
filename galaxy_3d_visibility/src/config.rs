//! Construction-time and per-frame configuration.

use glam::{Vec2, Vec3};
use crate::grid::DEFAULT_CELL_SIZE;
use crate::shadow::FALLBACK_LIGHT_DIRECTION;

/// Default radius of the walked quad window, in world units
pub const DEFAULT_MODEL_DRAW_DISTANCE: f32 = 6000.0;

/// Default vertical widening of quad boxes, in world units
pub const DEFAULT_EXTRA_PADDING_HEIGHT: f32 = 100.0;

/// Grid configuration, fixed for the lifetime of a [`ModelRenderData`](crate::pipeline::ModelRenderData)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Map size along X and Z, in world units
    pub map_size: Vec2,
    /// Edge length of one quad, in world units
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            map_size: Vec2::splat(DEFAULT_CELL_SIZE * 32.0),
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Per-frame configuration, supplied to every `begin_frame`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    /// Radius of the walked quad window for model cameras
    pub model_draw_distance: f32,
    /// Horizontal widening of quad boxes, in cells
    pub extra_padding_xz: u32,
    /// Vertical widening of quad boxes, in world units
    pub extra_padding_height: f32,
    /// Lowest terrain height of the current frame
    pub terrain_min_height: f32,
    /// Highest terrain height of the current frame
    pub terrain_max_height: f32,
    /// Direction light travels in (from the light into the scene)
    pub light_direction: Vec3,
    /// `true` for [0,1] clip depth, `false` for [-1,1]
    pub clip_zero_to_one: bool,
    /// Recompute transforms on rayon's pool
    pub multi_threaded: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            model_draw_distance: DEFAULT_MODEL_DRAW_DISTANCE,
            extra_padding_xz: 0,
            extra_padding_height: DEFAULT_EXTRA_PADDING_HEIGHT,
            terrain_min_height: 0.0,
            terrain_max_height: 0.0,
            light_direction: FALLBACK_LIGHT_DIRECTION,
            clip_zero_to_one: true,
            multi_threaded: true,
        }
    }
}

impl FrameConfig {
    /// Copy with negative or NaN distances clamped to 0, non-finite heights
    /// replaced by 0 and the height range ordered.
    ///
    /// An infinite draw distance is kept and walks the whole grid.
    pub fn sanitized(&self) -> Self {
        let distance = |value: f32| if value.is_nan() { 0.0 } else { value.max(0.0) };
        let height = |value: f32| if value.is_finite() { value } else { 0.0 };

        let (low, high) = (height(self.terrain_min_height), height(self.terrain_max_height));
        let extra_padding_height = distance(self.extra_padding_height);
        Self {
            model_draw_distance: distance(self.model_draw_distance),
            extra_padding_height: if extra_padding_height.is_finite() { extra_padding_height } else { 0.0 },
            terrain_min_height: low.min(high),
            terrain_max_height: low.max(high),
            ..*self
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
