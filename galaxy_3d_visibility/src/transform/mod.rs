//! Transform recomputation for visible objects.

mod updater;

pub use updater::{TransformUpdateStats, TransformUpdater, MIN_OBJECTS_PER_TASK};
