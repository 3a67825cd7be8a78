//! Objects — handles, registration data, quad membership and matrix storage.

mod matrix_arena;
mod object;
mod tracker;

pub use matrix_arena::{MatrixArena, MatrixSlot};
pub use object::{DrawStateKey, ModelType, ObjectDesc, ObjectFlags, ObjectKey, ObjectProvider};
pub use tracker::{ObjectTracker, TrackedObject};
