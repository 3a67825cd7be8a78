//! Deduplicated transform updater.
//!
//! Gathers the objects of a camera's visible quads, removes duplicates by
//! radix-sorting their handles, and recomputes each survivor's arena slot:
//! slot 0 from the whole-object world transform, slots 1..=N as model-space
//! piece transforms (parent model-space × local). Slot writes are partitioned
//! into disjoint slices so the recompute can run on rayon's pool.

use glam::Mat4;
use rayon::prelude::*;
use rdst::RadixSort;
use slotmap::{Key, KeyData};
use crate::camera::{Camera, CameraRole};
use crate::engine_trace;
use crate::objects::{MatrixSlot, ModelType, ObjectKey, ObjectProvider, ObjectTracker};

/// Objects per rayon task; below this a split costs more than it saves
pub const MIN_OBJECTS_PER_TASK: usize = 128;

/// Counters of one update call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformUpdateStats {
    /// Handles gathered from visible quads, duplicates included
    pub collected: usize,
    /// Distinct handles after deduplication
    pub unique: usize,
    /// Objects whose slot was recomputed
    pub updated: usize,
    /// Objects whose recomputed matrices differed from the stored ones
    pub changed: usize,
}

impl std::ops::AddAssign for TransformUpdateStats {
    fn add_assign(&mut self, other: Self) {
        self.collected += other.collected;
        self.unique += other.unique;
        self.updated += other.updated;
        self.changed += other.changed;
    }
}

/// Scratch buffers reused across frames.
#[derive(Debug, Default)]
pub struct TransformUpdater {
    handles: Vec<u64>,
    work: Vec<(ObjectKey, MatrixSlot)>,
}

impl TransformUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute matrices of every distinct tracked object in `visible_quads`
    /// that passes `should_update` and was not refreshed earlier this frame.
    ///
    /// Only quads stamped visible for `camera`'s role at `frame` and holding
    /// objects are gathered.
    pub fn update_transforms<P, F>(
        &mut self,
        tracker: &mut ObjectTracker,
        visible_quads: &[u32],
        camera: &Camera,
        frame: u32,
        provider: &P,
        should_update: F,
        multi_threaded: bool,
    ) -> TransformUpdateStats
    where
        P: ObjectProvider + ?Sized,
        F: Fn(&Camera, ObjectKey) -> bool,
    {
        let collected = self.collect_visible(tracker, visible_quads, camera.role(), frame);
        let unique = self.handles.len();

        self.work.clear();
        let (objects, _) = tracker.objects_and_arena_mut();
        for &handle in &self.handles {
            let key = ObjectKey::from(KeyData::from_ffi(handle));
            let Some(object) = objects.get_mut(key) else { continue };
            let Some(slot) = object.matrix_slot() else { continue };
            if object.last_update_frame() >= frame || !should_update(camera, key) {
                continue;
            }
            object.set_last_update_frame(frame);
            self.work.push((key, slot));
        }

        let (updated, changed) = self.run(tracker, provider, multi_threaded);
        engine_trace!("galaxy3d::TransformUpdater",
            "{:?}: {} gathered, {} unique, {} updated, {} changed",
            camera.role(), collected, unique, updated, changed);

        TransformUpdateStats { collected, unique, updated, changed }
    }

    /// Refresh objects flagged `ALWAYS_UPDATE`, once per frame, regardless
    /// of visibility.
    pub fn update_always_transforms<P>(
        &mut self,
        tracker: &mut ObjectTracker,
        frame: u32,
        provider: &P,
        multi_threaded: bool,
    ) -> TransformUpdateStats
    where
        P: ObjectProvider + ?Sized,
    {
        self.work.clear();
        let keys = tracker.unsorted_objects().to_vec();
        let (objects, _) = tracker.objects_and_arena_mut();
        for key in keys {
            let Some(object) = objects.get_mut(key) else { continue };
            let Some(slot) = object.matrix_slot() else { continue };
            if !object.desc().always_update() || object.last_update_frame() >= frame {
                continue;
            }
            object.set_last_update_frame(frame);
            self.work.push((key, slot));
        }

        let collected = self.work.len();
        let (updated, changed) = self.run(tracker, provider, multi_threaded);
        TransformUpdateStats { collected, unique: collected, updated, changed }
    }

    /// Gather handles of every model type from the visible, non-empty quads,
    /// then sort and deduplicate them. Returns the count before dedup.
    fn collect_visible(
        &mut self,
        tracker: &ObjectTracker,
        visible_quads: &[u32],
        role: CameraRole,
        frame: u32,
    ) -> usize {
        self.handles.clear();
        for model_type in ModelType::ALL {
            for &quad in visible_quads {
                let proxy = tracker.quad(model_type, quad);
                if !proxy.is_visible(role, frame) || !proxy.has_objects() {
                    continue;
                }
                for bin in proxy.bins() {
                    self.handles.extend(bin.objects().iter().map(|key| key.data().as_ffi()));
                }
            }
        }

        let collected = self.handles.len();
        self.handles.radix_sort_unstable();
        self.handles.dedup();
        collected
    }

    /// Recompute every slot in the work list. Returns (updated, changed).
    fn run<P>(&mut self, tracker: &mut ObjectTracker, provider: &P, multi_threaded: bool) -> (usize, usize)
    where
        P: ObjectProvider + ?Sized,
    {
        if self.work.is_empty() {
            return (0, 0);
        }

        self.work.sort_unstable_by_key(|(_, slot)| slot.offset());
        let slots: Vec<MatrixSlot> = self.work.iter().map(|&(_, slot)| slot).collect();
        let arena = tracker.arena_mut();
        let outputs = arena.disjoint_slots_mut(&slots);

        let changed: Vec<bool> = if multi_threaded {
            outputs
                .into_par_iter()
                .zip(self.work.par_iter())
                .with_min_len(MIN_OBJECTS_PER_TASK)
                .map(|(out, &(key, _))| recompute_object(provider, key, out))
                .collect()
        } else {
            outputs
                .into_iter()
                .zip(self.work.iter())
                .map(|(out, &(key, _))| recompute_object(provider, key, out))
                .collect()
        };

        let mut changed_count = 0;
        for (slot, _) in slots.iter().zip(&changed).filter(|(_, changed)| **changed) {
            arena.mark_dirty(*slot);
            changed_count += 1;
        }
        (self.work.len(), changed_count)
    }
}

/// Write slot 0 and every piece matrix of `key` into `out`.
///
/// Returns `true` if any stored matrix changed. Pieces beyond the slot's
/// capacity (piece count grew since registration) are ignored.
fn recompute_object<P>(provider: &P, key: ObjectKey, out: &mut [Mat4]) -> bool
where
    P: ObjectProvider + ?Sized,
{
    let mut changed = store(&mut out[0], provider.world_transform(key));

    let piece_count = (provider.piece_count(key) as usize).min(out.len() - 1);
    for piece in 0..piece_count {
        let local = provider.piece_local_transform(key, piece as u32);
        let model_space = match provider.piece_parent(key, piece as u32) {
            None => local,
            // Parent already written in this pass
            Some(parent) if (parent as usize) < piece => out[1 + parent as usize] * local,
            Some(_) => walk_parent_chain(provider, key, piece as u32, piece_count as u32),
        };
        changed |= store(&mut out[1 + piece], model_space);
    }
    changed
}

/// Model-space transform of `piece` by accumulating locals up to the root.
///
/// Stops after `piece_count` steps so cyclic parent data cannot hang.
fn walk_parent_chain<P>(provider: &P, key: ObjectKey, piece: u32, piece_count: u32) -> Mat4
where
    P: ObjectProvider + ?Sized,
{
    let mut transform = provider.piece_local_transform(key, piece);
    let mut parent = provider.piece_parent(key, piece);
    let mut steps = 0;
    while let Some(index) = parent {
        if index >= piece_count || steps >= piece_count {
            break;
        }
        transform = provider.piece_local_transform(key, index) * transform;
        parent = provider.piece_parent(key, index);
        steps += 1;
    }
    transform
}

fn store(target: &mut Mat4, value: Mat4) -> bool {
    if *target == value {
        return false;
    }
    *target = value;
    true
}

#[cfg(test)]
#[path = "updater_tests.rs"]
mod tests;
