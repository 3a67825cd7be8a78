//! Render container — per-quad buckets of objects sharing a draw-state key.
//!
//! Objects are referenced by handle only; the container never owns them.
//! Add and remove are O(1) amortized: removal swaps the last object of the
//! bin into the freed position, so bin order is not stable under churn.
//! Bins left empty by removals stay allocated for reuse.

use rustc_hash::FxHashMap;
use crate::objects::{DrawStateKey, ObjectKey};

/// Objects of one quad that share a draw-state key.
#[derive(Debug, Clone)]
pub struct ObjectBin {
    key: DrawStateKey,
    objects: Vec<ObjectKey>,
}

impl ObjectBin {
    pub fn key(&self) -> DrawStateKey {
        self.key
    }

    pub fn objects(&self) -> &[ObjectKey] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Position of an object inside the container
#[derive(Debug, Clone, Copy)]
struct BinLocation {
    bin: u32,
    index: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RenderContainer {
    bins: Vec<ObjectBin>,
    bin_lookup: FxHashMap<DrawStateKey, u32>,
    locations: FxHashMap<ObjectKey, BinLocation>,
}

impl RenderContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `object` into the bin of `draw_state`.
    ///
    /// Returns `false` (and changes nothing) if the object is already
    /// present in any bin of this container.
    pub fn add_object(&mut self, object: ObjectKey, draw_state: DrawStateKey) -> bool {
        if self.locations.contains_key(&object) {
            return false;
        }

        let bins = &mut self.bins;
        let bin = *self.bin_lookup.entry(draw_state).or_insert_with(|| {
            bins.push(ObjectBin { key: draw_state, objects: Vec::new() });
            (bins.len() - 1) as u32
        });

        let objects = &mut self.bins[bin as usize].objects;
        objects.push(object);
        self.locations.insert(object, BinLocation { bin, index: (objects.len() - 1) as u32 });
        true
    }

    /// Remove `object`. Returns `false` if it was not present.
    pub fn del_object(&mut self, object: ObjectKey) -> bool {
        let Some(location) = self.locations.remove(&object) else {
            return false;
        };

        let objects = &mut self.bins[location.bin as usize].objects;
        objects.swap_remove(location.index as usize);
        if let Some(&moved) = objects.get(location.index as usize) {
            if let Some(moved_location) = self.locations.get_mut(&moved) {
                moved_location.index = location.index;
            }
        }
        true
    }

    pub fn contains(&self, object: ObjectKey) -> bool {
        self.locations.contains_key(&object)
    }

    /// Draw-state key of the bin holding `object`
    pub fn draw_state_of(&self, object: ObjectKey) -> Option<DrawStateKey> {
        self.locations
            .get(&object)
            .map(|location| self.bins[location.bin as usize].key)
    }

    /// `true` if at least one bin holds an object
    pub fn has_objects(&self) -> bool {
        !self.locations.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.locations.len()
    }

    /// Number of bins, including ones emptied by removals
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// All bins in creation order, empty ones included
    pub fn bins(&self) -> &[ObjectBin] {
        &self.bins
    }

    pub fn bin(&self, draw_state: DrawStateKey) -> Option<&ObjectBin> {
        self.bin_lookup
            .get(&draw_state)
            .map(|&index| &self.bins[index as usize])
    }

    /// Drop every object and bin
    pub fn clear(&mut self) {
        self.bins.clear();
        self.bin_lookup.clear();
        self.locations.clear();
    }
}

#[cfg(test)]
#[path = "render_container_tests.rs"]
mod tests;
