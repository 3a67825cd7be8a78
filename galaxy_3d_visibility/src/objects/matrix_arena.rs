//! Matrix arena — one flat `Mat4` buffer shared by all tracked objects.
//!
//! Each tracked object owns a contiguous [`MatrixSlot`]: entry 0 is the
//! whole-object world transform, entries 1..=N the model-space piece
//! transforms. Writes go through `update_if_changed` / `update_forced`
//! (or the transform updater's disjoint slices) and are recorded per
//! matrix index, so an uploader only re-sends what changed. The dirty set
//! never holds more entries than the arena has matrices, whether or not
//! anyone drains it.

use std::ops::Range;
use glam::Mat4;
use rustc_hash::FxHashSet;
use crate::utils::RangeAllocator;

/// Contiguous range of matrices owned by one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixSlot {
    offset: u32,
    len: u32,
}

impl MatrixSlot {
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of matrices (piece count + 1)
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.offset as usize..(self.offset + self.len) as usize
    }
}

pub struct MatrixArena {
    matrices: Vec<Mat4>,
    allocator: RangeAllocator,
    dirty: FxHashSet<u32>,
}

impl MatrixArena {
    pub fn new() -> Self {
        Self {
            matrices: Vec::new(),
            allocator: RangeAllocator::new(),
            dirty: FxHashSet::default(),
        }
    }

    // ===== ALLOCATION =====

    /// Allocate `len` matrices initialized to identity.
    pub fn alloc(&mut self, len: u32) -> MatrixSlot {
        let len = len.max(1);
        let offset = self.allocator.alloc(len);
        let end = self.allocator.high_water_mark() as usize;
        if self.matrices.len() < end {
            self.matrices.resize(end, Mat4::IDENTITY);
        }
        let slot = MatrixSlot { offset, len };
        self.matrices[slot.range()].fill(Mat4::IDENTITY);
        self.mark_range(slot.range());
        slot
    }

    /// Release a slot; its matrices are zeroed.
    pub fn free(&mut self, slot: MatrixSlot) {
        self.matrices[slot.range()].fill(Mat4::ZERO);
        self.mark_range(slot.range());
        self.allocator.free(slot.offset, slot.len);
    }

    // ===== ACCESS =====

    pub fn get(&self, slot: MatrixSlot) -> &[Mat4] {
        &self.matrices[slot.range()]
    }

    /// Write `matrix` at `index` of `slot` if it differs from the stored one.
    ///
    /// Returns `true` when the arena changed.
    pub fn update_if_changed(&mut self, slot: MatrixSlot, index: u32, matrix: Mat4) -> bool {
        debug_assert!(index < slot.len, "matrix {} outside slot of {}", index, slot.len);
        let position = slot.offset as usize + index as usize;
        if self.matrices[position] == matrix {
            return false;
        }
        self.matrices[position] = matrix;
        self.dirty.insert(position as u32);
        true
    }

    /// Write `matrix` at `index` of `slot` and mark it dirty unconditionally.
    pub fn update_forced(&mut self, slot: MatrixSlot, index: u32, matrix: Mat4) {
        debug_assert!(index < slot.len, "matrix {} outside slot of {}", index, slot.len);
        let position = slot.offset as usize + index as usize;
        self.matrices[position] = matrix;
        self.dirty.insert(position as u32);
    }

    pub(crate) fn mark_dirty(&mut self, slot: MatrixSlot) {
        self.mark_range(slot.range());
    }

    fn mark_range(&mut self, range: Range<usize>) {
        self.dirty.extend(range.map(|position| position as u32));
    }

    /// Mutable views of `slots`, which must be sorted by offset and disjoint.
    ///
    /// The returned slices are in the same order as `slots` and can be
    /// handed to different threads.
    pub(crate) fn disjoint_slots_mut(&mut self, slots: &[MatrixSlot]) -> Vec<&mut [Mat4]> {
        debug_assert!(
            slots.windows(2).all(|pair| pair[0].offset + pair[0].len <= pair[1].offset),
            "slots must be sorted and disjoint"
        );

        let mut result = Vec::with_capacity(slots.len());
        let mut rest: &mut [Mat4] = &mut self.matrices;
        let mut consumed = 0usize;
        for slot in slots {
            let tail = std::mem::take(&mut rest);
            let (_, tail) = tail.split_at_mut(slot.offset as usize - consumed);
            let (head, tail) = tail.split_at_mut(slot.len as usize);
            result.push(head);
            rest = tail;
            consumed = slot.offset as usize + slot.len as usize;
        }
        result
    }

    // ===== UPLOAD =====

    /// Drain the dirty set as sorted, merged, non-overlapping ranges.
    pub fn take_dirty_ranges(&mut self) -> Vec<Range<usize>> {
        let mut positions: Vec<u32> = self.dirty.drain().collect();
        positions.sort_unstable();

        let mut merged: Vec<Range<usize>> = Vec::new();
        for position in positions {
            let position = position as usize;
            match merged.last_mut() {
                Some(last) if last.end == position => last.end = position + 1,
                _ => merged.push(position..position + 1),
            }
        }
        merged
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Number of matrices waiting for upload
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Whole buffer, including free ranges
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Whole buffer as bytes, ready for a GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    /// Number of live slots
    pub fn slot_count(&self) -> u32 {
        self.allocator.len()
    }

    /// Number of matrices in live slots
    pub fn allocated(&self) -> u32 {
        self.allocator.allocated()
    }
}

impl Default for MatrixArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "matrix_arena_tests.rs"]
mod tests;
