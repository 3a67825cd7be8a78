//! Spatial grid — cells over the map and their per-model-type containers.

mod draw_grid;
mod quad_proxy;
mod render_container;

pub use draw_grid::{DrawGrid, DEFAULT_CELL_SIZE, MAX_GRID_CELLS};
pub use quad_proxy::QuadProxy;
pub use render_container::{ObjectBin, RenderContainer};
