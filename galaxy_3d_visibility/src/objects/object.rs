//! Object handles, registration data and the object provider interface.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a tracked object
    pub struct ObjectKey;
}

/// Opaque key grouping objects that can be drawn with the same state
/// (texture set, shader variant). Supplied by the caller.
pub type DrawStateKey = u32;

bitflags! {
    /// Capabilities declared once at registration
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        /// The object has a renderable model and goes into a quad container
        const HAS_MODEL = 1 << 0;
        /// Matrices are refreshed every frame regardless of visibility
        const ALWAYS_UPDATE = 1 << 1;
    }
}

/// Model format families; each has its own set of quad containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    ThreeDo = 0,
    S3o = 1,
    Assimp = 2,
}

impl ModelType {
    pub const COUNT: usize = 3;
    pub const ALL: [ModelType; ModelType::COUNT] = [ModelType::ThreeDo, ModelType::S3o, ModelType::Assimp];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Registration data of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDesc {
    pub model_type: ModelType,
    pub draw_state: DrawStateKey,
    /// Number of model pieces; the arena slot holds `piece_count + 1` matrices
    pub piece_count: u32,
    /// Bounding radius around the position, used for drawable bounds
    pub radius: f32,
    pub flags: ObjectFlags,
}

impl ObjectDesc {
    /// A drawable object without special update rules
    pub fn model(model_type: ModelType, draw_state: DrawStateKey, piece_count: u32, radius: f32) -> Self {
        Self {
            model_type,
            draw_state,
            piece_count,
            radius,
            flags: ObjectFlags::HAS_MODEL,
        }
    }

    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn has_model(&self) -> bool {
        self.flags.contains(ObjectFlags::HAS_MODEL)
    }

    pub fn always_update(&self) -> bool {
        self.flags.contains(ObjectFlags::ALWAYS_UPDATE)
    }

    /// Matrices needed in the arena: the whole object plus one per piece
    pub fn matrix_count(&self) -> u32 {
        self.piece_count.saturating_add(1)
    }
}

/// Read-only access to the simulation state of objects.
///
/// Called from rayon worker threads during the transform update, hence
/// `Sync`. Implementations must not mutate object state while a frame's
/// update is running.
pub trait ObjectProvider: Sync {
    /// Current world position
    fn position(&self, object: ObjectKey) -> Vec3;

    /// Whole-object world transform (arena slot 0)
    fn world_transform(&self, object: ObjectKey) -> Mat4;

    /// Current number of model pieces
    fn piece_count(&self, object: ObjectKey) -> u32;

    /// Transform of `piece` relative to its parent piece
    fn piece_local_transform(&self, object: ObjectKey, piece: u32) -> Mat4;

    /// Parent of `piece`, `None` for the root
    fn piece_parent(&self, object: ObjectKey, piece: u32) -> Option<u32>;
}
