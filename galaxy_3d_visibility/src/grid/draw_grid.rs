//! Draw grid — fixed partition of the map surface into square cells.
//!
//! Cells ("quads") are indexed row-major: `index = cz * width + cx`.
//! Every world position maps to exactly one cell; positions outside the
//! map are clamped to the border cells.

use glam::{Vec2, Vec3};
use crate::bounds::AABB;
use crate::error::Result;
use crate::{engine_bail, engine_info};

/// 32 map squares of 8 world units each
pub const DEFAULT_CELL_SIZE: f32 = 256.0;

/// Upper bound on the number of cells a grid may have
pub const MAX_GRID_CELLS: u64 = 1 << 24;

/// Immutable 2D grid over the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawGrid {
    cell_size: f32,
    width: u32,
    height: u32,
}

impl DrawGrid {
    /// Create a grid covering `map_size` (world units along X and Z).
    ///
    /// Width and height are `map_size / cell_size` rounded down, at least 1.
    pub fn new(map_size: Vec2, cell_size: f32) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            engine_bail!(InvalidConfig, "galaxy3d::DrawGrid",
                "cell size must be finite and positive, got {}", cell_size);
        }
        if !map_size.is_finite() || map_size.x <= 0.0 || map_size.y <= 0.0 {
            engine_bail!(InvalidConfig, "galaxy3d::DrawGrid",
                "map size must be finite and positive, got {:?}", map_size);
        }

        let cells_along = |extent: f32| ((extent / cell_size).floor() as u64).max(1);
        let (width, height) = (cells_along(map_size.x), cells_along(map_size.y));
        if width.saturating_mul(height) > MAX_GRID_CELLS {
            engine_bail!(InvalidConfig, "galaxy3d::DrawGrid",
                "{}x{} cells exceed the limit of {}", width, height, MAX_GRID_CELLS);
        }

        engine_info!("galaxy3d::DrawGrid",
            "Created {}x{} grid, cell size {}", width, height, cell_size);

        Ok(Self {
            cell_size,
            width: width as u32,
            height: height as u32,
        })
    }

    // ===== ACCESSORS =====

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of cells along X
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along Z
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// World extent covered by the cells (may be slightly less than the map).
    pub fn world_extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    // ===== MAPPING =====

    /// Cell containing world position (x, z), clamped into the grid.
    ///
    /// NaN coordinates map to column/row 0.
    pub fn cell_of(&self, x: f32, z: f32) -> (u32, u32) {
        let clamp = |value: f32, cells: u32| -> u32 {
            // `as` saturates and maps NaN to 0
            ((value / self.cell_size).floor() as i64).clamp(0, cells as i64 - 1) as u32
        };
        (clamp(x, self.width), clamp(z, self.height))
    }

    /// Row-major index of the cell containing `position`.
    pub fn cell_index_of(&self, position: Vec3) -> u32 {
        let (cx, cz) = self.cell_of(position.x, position.z);
        self.index(cx, cz)
    }

    pub fn index(&self, cx: u32, cz: u32) -> u32 {
        debug_assert!(cx < self.width && cz < self.height, "cell ({}, {}) outside grid", cx, cz);
        cz * self.width + cx
    }

    pub fn coords(&self, index: u32) -> (u32, u32) {
        (index % self.width, index / self.width)
    }

    // ===== BOUNDS =====

    /// World box of the inclusive cell block `[x0, x1] × [z0, z1]`,
    /// vertically spanning `[min_y, max_y]`, widened by `padding` on X and Z.
    pub fn block_bounds(
        &self,
        (x0, z0): (u32, u32),
        (x1, z1): (u32, u32),
        min_y: f32,
        max_y: f32,
        padding: f32,
    ) -> AABB {
        AABB::new(
            Vec3::new(x0 as f32 * self.cell_size - padding, min_y, z0 as f32 * self.cell_size - padding),
            Vec3::new((x1 + 1) as f32 * self.cell_size + padding, max_y, (z1 + 1) as f32 * self.cell_size + padding),
        )
    }

    /// World box of a single cell.
    pub fn cell_bounds(&self, cx: u32, cz: u32, min_y: f32, max_y: f32) -> AABB {
        self.block_bounds((cx, cz), (cx, cz), min_y, max_y, 0.0)
    }
}

#[cfg(test)]
#[path = "draw_grid_tests.rs"]
mod tests;
