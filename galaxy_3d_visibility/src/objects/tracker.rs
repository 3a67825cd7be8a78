//! Object-quad membership tracker.
//!
//! Owns every registered object, the per-model-type quad containers and
//! the matrix arena. Keeps two independent memberships per object:
//! - spatial: the container of the quad under its position (drawable objects only)
//! - matrix tracking: the flat unsorted list plus an arena slot

use glam::{Mat4, Vec3};
use slotmap::SlotMap;
use crate::bounds::AABB;
use crate::camera::CameraRole;
use crate::grid::{DrawGrid, QuadProxy};
use crate::{engine_error, engine_warn};
use super::matrix_arena::{MatrixArena, MatrixSlot};
use super::object::{DrawStateKey, ModelType, ObjectDesc, ObjectKey, ObjectProvider};

/// Per-object bookkeeping.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    desc: ObjectDesc,
    position: Vec3,
    quad: u32,
    in_container: bool,
    matrix_slot: Option<MatrixSlot>,
    unsorted_index: Option<u32>,
    last_update_frame: u32,
}

impl TrackedObject {
    pub fn desc(&self) -> &ObjectDesc {
        &self.desc
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Quad under the last known position
    pub fn quad(&self) -> u32 {
        self.quad
    }

    /// Whether the object currently sits in its quad's container
    pub fn in_container(&self) -> bool {
        self.in_container
    }

    pub fn matrix_slot(&self) -> Option<MatrixSlot> {
        self.matrix_slot
    }

    /// Last frame whose transform update refreshed this object's slot
    pub fn last_update_frame(&self) -> u32 {
        self.last_update_frame
    }

    pub(crate) fn set_last_update_frame(&mut self, frame: u32) {
        self.last_update_frame = frame;
    }
}

pub struct ObjectTracker {
    grid: DrawGrid,
    /// `quads[model_type][quad]`
    quads: [Vec<QuadProxy>; ModelType::COUNT],
    objects: SlotMap<ObjectKey, TrackedObject>,
    unsorted: Vec<ObjectKey>,
    arena: MatrixArena,
}

impl ObjectTracker {
    pub fn new(grid: DrawGrid) -> Self {
        let cells = grid.cell_count();
        Self {
            grid,
            quads: std::array::from_fn(|_| vec![QuadProxy::new(); cells]),
            objects: SlotMap::with_key(),
            unsorted: Vec::new(),
            arena: MatrixArena::new(),
        }
    }

    // ===== REGISTRATION =====

    /// Register an object. It joins no container or list until `add_object`.
    pub fn insert(&mut self, desc: ObjectDesc, position: Vec3) -> ObjectKey {
        let quad = self.grid.cell_index_of(position);
        self.objects.insert(TrackedObject {
            desc,
            position,
            quad,
            in_container: false,
            matrix_slot: None,
            unsorted_index: None,
            last_update_frame: 0,
        })
    }

    /// Remove an object from every membership and forget it.
    pub fn remove(&mut self, key: ObjectKey) -> Option<ObjectDesc> {
        if !self.del_object(key, true) {
            return None;
        }
        self.objects.remove(key).map(|object| object.desc)
    }

    /// Insert into the quad container (drawable objects) and, if
    /// `track_matrices`, into the unsorted list with a fresh arena slot.
    pub fn add_object(&mut self, key: ObjectKey, track_matrices: bool) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            engine_error!("galaxy3d::ObjectTracker", "add_object: unknown object {:?}", key);
            return false;
        };

        if object.desc.has_model() && !object.in_container {
            let quad = Self::checked_quad(&self.grid, object.quad);
            object.quad = quad;
            object.in_container = self.quads[object.desc.model_type.index()][quad as usize]
                .add_object(key, object.desc.draw_state);
        }

        if track_matrices && object.matrix_slot.is_none() {
            object.matrix_slot = Some(self.arena.alloc(object.desc.matrix_count()));
            object.unsorted_index = Some(self.unsorted.len() as u32);
            object.last_update_frame = 0;
            self.unsorted.push(key);
        }
        true
    }

    /// Inverse of `add_object`; frees the arena slot if `untrack_matrices`.
    pub fn del_object(&mut self, key: ObjectKey, untrack_matrices: bool) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            engine_error!("galaxy3d::ObjectTracker", "del_object: unknown object {:?}", key);
            return false;
        };

        if object.in_container {
            self.quads[object.desc.model_type.index()][object.quad as usize].del_object(key);
            object.in_container = false;
        }

        if untrack_matrices {
            if let Some(slot) = object.matrix_slot.take() {
                self.arena.free(slot);
            }
            if let Some(index) = object.unsorted_index.take() {
                self.unsorted.swap_remove(index as usize);
                if let Some(&moved) = self.unsorted.get(index as usize) {
                    if let Some(moved_object) = self.objects.get_mut(moved) {
                        moved_object.unsorted_index = Some(index);
                    }
                }
            }
        }
        true
    }

    /// Take the object out of its container and put it back, keeping its
    /// arena slot. With `init`, matrix tracking starts if it was missing.
    pub fn update_object(&mut self, key: ObjectKey, init: bool) -> bool {
        self.del_object(key, false) && self.add_object(key, init)
    }

    /// Change the draw-state key, moving the object to the matching bin.
    pub fn set_draw_state(&mut self, key: ObjectKey, draw_state: DrawStateKey) -> bool {
        if !self.del_object(key, false) {
            return false;
        }
        if let Some(object) = self.objects.get_mut(key) {
            object.desc.draw_state = draw_state;
        }
        self.add_object(key, false)
    }

    /// Swap the object's model: it moves to `model_type`'s container and,
    /// when the piece count changed, to an arena slot of the new size.
    ///
    /// A reallocated slot starts at identity and is recomputed by the next
    /// transform update that reaches the object.
    pub fn set_model(&mut self, key: ObjectKey, model_type: ModelType, piece_count: u32) -> bool {
        if !self.del_object(key, false) {
            return false;
        }
        if let Some(object) = self.objects.get_mut(key) {
            let resized = object.desc.piece_count != piece_count;
            object.desc.model_type = model_type;
            object.desc.piece_count = piece_count;

            if resized {
                if let Some(slot) = object.matrix_slot.take() {
                    self.arena.free(slot);
                    object.matrix_slot = Some(self.arena.alloc(object.desc.matrix_count()));
                    object.last_update_frame = 0;
                }
            }
        }
        self.add_object(key, false)
    }

    // ===== MOVEMENT =====

    /// Record a new position; moves the object between quad containers
    /// when it crossed a cell boundary. Returns `true` if the quad changed.
    pub fn update_object_quad(&mut self, key: ObjectKey, position: Vec3) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            engine_error!("galaxy3d::ObjectTracker", "update_object_quad: unknown object {:?}", key);
            return false;
        };
        Self::move_object(&self.grid, &mut self.quads, key, object, position)
    }

    /// Pull positions of all objects from `provider` and update quads.
    ///
    /// Returns the number of objects that changed quad.
    pub fn update_positions<P: ObjectProvider + ?Sized>(&mut self, provider: &P) -> usize {
        let mut moved = 0;
        for (key, object) in self.objects.iter_mut() {
            let position = provider.position(key);
            if Self::move_object(&self.grid, &mut self.quads, key, object, position) {
                moved += 1;
            }
        }
        moved
    }

    fn move_object(
        grid: &DrawGrid,
        quads: &mut [Vec<QuadProxy>; ModelType::COUNT],
        key: ObjectKey,
        object: &mut TrackedObject,
        position: Vec3,
    ) -> bool {
        object.position = position;
        let new_quad = Self::checked_quad(grid, grid.cell_index_of(position));
        if new_quad == object.quad {
            return false;
        }

        let containers = &mut quads[object.desc.model_type.index()];
        if object.in_container {
            containers[object.quad as usize].del_object(key);
        }
        object.quad = new_quad;
        if object.in_container {
            containers[new_quad as usize].add_object(key, object.desc.draw_state);
        }
        true
    }

    fn checked_quad(grid: &DrawGrid, quad: u32) -> u32 {
        let count = grid.cell_count() as u32;
        debug_assert!(quad < count, "quad {} outside grid of {} cells", quad, count);
        if quad >= count {
            engine_warn!("galaxy3d::ObjectTracker", "quad {} clamped into grid of {} cells", quad, count);
            return count - 1;
        }
        quad
    }

    // ===== QUADS =====

    pub fn grid(&self) -> &DrawGrid {
        &self.grid
    }

    pub fn quad(&self, model_type: ModelType, quad: u32) -> &QuadProxy {
        &self.quads[model_type.index()][quad as usize]
    }

    pub fn quads(&self, model_type: ModelType) -> &[QuadProxy] {
        &self.quads[model_type.index()]
    }

    /// Stamp `quad` as drawn by `role` in every model type.
    pub(crate) fn mark_quad_drawn(&mut self, quad: u32, role: CameraRole, frame: u32) {
        for containers in &mut self.quads {
            containers[quad as usize].mark_drawn(role, frame);
        }
    }

    /// Total number of objects in `quad` across model types
    pub fn quad_object_count(&self, quad: u32) -> usize {
        self.quads.iter().map(|containers| containers[quad as usize].container().object_count()).sum()
    }

    // ===== OBJECTS =====

    pub fn object(&self, key: ObjectKey) -> Option<&TrackedObject> {
        self.objects.get(key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Matrix-tracked objects in no particular order
    pub fn unsorted_objects(&self) -> &[ObjectKey] {
        &self.unsorted
    }

    pub fn matrices(&self, key: ObjectKey) -> Option<&[Mat4]> {
        let slot = self.objects.get(key)?.matrix_slot?;
        Some(self.arena.get(slot))
    }

    pub fn arena(&self) -> &MatrixArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut MatrixArena {
        &mut self.arena
    }

    pub(crate) fn objects_and_arena_mut(
        &mut self,
    ) -> (&mut SlotMap<ObjectKey, TrackedObject>, &mut MatrixArena) {
        (&mut self.objects, &mut self.arena)
    }

    /// Union of position ± radius over drawable objects, `None` if there are none.
    pub fn drawable_bounds(&self) -> Option<AABB> {
        let mut bounds = AABB::EMPTY;
        for object in self.objects.values().filter(|object| object.desc.has_model()) {
            let radius = if object.desc.radius.is_finite() { object.desc.radius.max(0.0) } else { 0.0 };
            bounds.add_point(object.position - Vec3::splat(radius));
            bounds.add_point(object.position + Vec3::splat(radius));
        }
        bounds.is_valid().then_some(bounds)
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
