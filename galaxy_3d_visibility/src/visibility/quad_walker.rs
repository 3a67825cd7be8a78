//! Quad visibility walker.
//!
//! Walks the square window of cells within draw distance of the camera's
//! cell. The window is split hierarchically: each block's box is classified
//! against the camera frustum, blocks fully inside emit all their cells,
//! blocks outside are dropped, straddling blocks are split into quarters
//! until single cells remain.

use crate::bounds::AABB;
use crate::camera::{Camera, FrustumTest};
use crate::grid::DrawGrid;

/// Walk parameters for one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadWalkParams {
    /// Radius of the walked window around the camera cell, in world units
    pub max_distance: f32,
    /// Horizontal widening of each cell box, in cells
    pub extra_padding_xz: u32,
    /// Vertical widening of each cell box, in world units
    pub extra_padding_height: f32,
    pub terrain_min_height: f32,
    pub terrain_max_height: f32,
}

/// Inclusive block of cells
#[derive(Debug, Clone, Copy)]
struct Block {
    x0: u32,
    z0: u32,
    x1: u32,
    z1: u32,
}

#[derive(Debug, Default)]
pub struct QuadWalker {
    stack: Vec<Block>,
}

impl QuadWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each cell whose box intersects `camera`'s frustum through
    /// `on_quad`, at most once. Order is unspecified.
    pub fn walk<F: FnMut(u32)>(
        &mut self,
        grid: &DrawGrid,
        camera: &Camera,
        params: &QuadWalkParams,
        mut on_quad: F,
    ) {
        let Some(root) = Self::window(grid, camera, params) else {
            return;
        };

        let padding = params.extra_padding_xz as f32 * grid.cell_size();
        let extra_height = finite_or_zero(params.extra_padding_height).max(0.0);
        let (low, high) = ordered(params.terrain_min_height, params.terrain_max_height);
        let (min_y, max_y) = (low - extra_height, high + extra_height);
        let frustum = camera.frustum();

        self.stack.clear();
        self.stack.push(root);
        while let Some(block) = self.stack.pop() {
            let bounds: AABB = grid.block_bounds((block.x0, block.z0), (block.x1, block.z1), min_y, max_y, padding);
            match frustum.classify_aabb(&bounds) {
                FrustumTest::Outside => {}
                FrustumTest::Inside => {
                    for cz in block.z0..=block.z1 {
                        for cx in block.x0..=block.x1 {
                            on_quad(grid.index(cx, cz));
                        }
                    }
                }
                FrustumTest::Partial if block.x0 == block.x1 && block.z0 == block.z1 => {
                    on_quad(grid.index(block.x0, block.z0));
                }
                FrustumTest::Partial => self.split(block),
            }
        }
    }

    /// Square window of cells around the camera cell, intersected with the grid.
    fn window(grid: &DrawGrid, camera: &Camera, params: &QuadWalkParams) -> Option<Block> {
        let position = camera.position();
        if !position.is_finite() || params.max_distance.is_nan() || params.max_distance <= 0.0 {
            return None;
        }

        // `as` saturates, so an infinite distance covers the whole grid
        let cell_size = grid.cell_size() as f64;
        let radius = ((params.max_distance as f64 / cell_size).floor() as i64).saturating_add(1);
        let cx = (position.x as f64 / cell_size).floor() as i64;
        let cz = (position.z as f64 / cell_size).floor() as i64;

        let x0 = cx.saturating_sub(radius).max(0);
        let z0 = cz.saturating_sub(radius).max(0);
        let x1 = cx.saturating_add(radius).min(grid.width() as i64 - 1);
        let z1 = cz.saturating_add(radius).min(grid.height() as i64 - 1);
        if x0 > x1 || z0 > z1 {
            return None;
        }

        Some(Block { x0: x0 as u32, z0: z0 as u32, x1: x1 as u32, z1: z1 as u32 })
    }

    fn split(&mut self, block: Block) {
        let mid_x = block.x0 + (block.x1 - block.x0) / 2;
        let mid_z = block.z0 + (block.z1 - block.z0) / 2;

        let xs = if block.x0 == block.x1 {
            [(block.x0, block.x1), (1, 0)]
        } else {
            [(block.x0, mid_x), (mid_x + 1, block.x1)]
        };
        let zs = if block.z0 == block.z1 {
            [(block.z0, block.z1), (1, 0)]
        } else {
            [(block.z0, mid_z), (mid_z + 1, block.z1)]
        };

        for &(z0, z1) in &zs {
            for &(x0, x1) in &xs {
                if x0 <= x1 && z0 <= z1 {
                    self.stack.push(Block { x0, z0, x1, z1 });
                }
            }
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    let (a, b) = (finite_or_zero(a), finite_or_zero(b));
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
#[path = "quad_walker_tests.rs"]
mod tests;
