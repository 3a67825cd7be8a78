/*!
# Galaxy 3D Visibility

Spatial visibility core for the Galaxy 3D engine: decides each frame which
model instances need their transforms recomputed and submitted for drawing,
per camera role, and fits a shadow-casting view volume to the player camera.

## Architecture

- **DrawGrid**: fixed partition of the map surface into square quads
- **RenderContainer / QuadProxy**: per quad and model type, objects binned by draw-state key
- **QuadWalker / VisibilityCache**: quads seen by a camera, walked at most once per frame and role
- **ObjectTracker / MatrixArena**: quad membership and per-object matrix slots
- **TransformUpdater**: deduplicated, optionally parallel matrix recompute
- **ShadowFitter**: light-aligned orthographic volume around the player's view
- **ModelRenderData**: owns all of the above and runs a frame

Callers supply object data through the `ObjectProvider` trait and cameras as
view/projection pairs.
*/

// Internal modules
mod error;
pub mod log;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod grid;
pub mod objects;
pub mod pipeline;
pub mod shadow;
pub mod transform;
pub mod utils;
pub mod visibility;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Frame entry point
    pub use crate::pipeline::{FrameStats, ModelRenderData};
    pub use crate::config::{FrameConfig, GridConfig};

    // Logging sub-module (types and logger control, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Visibility sub-module with all spatial types
    pub mod visibility {
        pub use crate::bounds::AABB;
        pub use crate::camera::*;
        pub use crate::grid::*;
        pub use crate::visibility::*;
    }

    // Object sub-module
    pub mod objects {
        pub use crate::objects::*;
        pub use crate::transform::*;
    }

    // Shadow sub-module
    pub mod shadow {
        pub use crate::shadow::*;
    }
}

// Re-export math library at crate root
pub use glam;
