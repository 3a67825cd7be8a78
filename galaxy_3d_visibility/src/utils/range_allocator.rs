use rustc_hash::FxHashMap;

/// Allocates and recycles contiguous `u32` ranges of a flat buffer.
///
/// Backs the matrix arena: each tracked object owns `piece_count + 1`
/// consecutive entries. Freed ranges are recycled only by allocations of
/// exactly the same length, which is the common case since objects of one
/// model share a piece count.
///
/// # Example
///
/// ```ignore
/// let mut alloc = RangeAllocator::new();
/// let a = alloc.alloc(3);  // 0
/// let b = alloc.alloc(2);  // 3
/// alloc.free(a, 3);         // [0, 3) is now available for length 3
/// let c = alloc.alloc(3);  // 0 (recycled)
/// let d = alloc.alloc(2);  // 5 (no free range of length 2)
/// ```
pub struct RangeAllocator {
    free_lists: FxHashMap<u32, Vec<u32>>,
    next_offset: u32,
    len: u32,
    allocated: u32,
}

impl RangeAllocator {
    /// Create a new empty allocator
    pub fn new() -> Self {
        Self {
            free_lists: FxHashMap::default(),
            next_offset: 0,
            len: 0,
            allocated: 0,
        }
    }

    /// Allocate `count` consecutive entries, returning the first offset
    pub fn alloc(&mut self, count: u32) -> u32 {
        debug_assert!(count > 0, "allocating an empty range");
        self.len += 1;
        self.allocated += count;
        if let Some(offset) = self.free_lists.get_mut(&count).and_then(Vec::pop) {
            return offset;
        }
        let offset = self.next_offset;
        self.next_offset += count;
        offset
    }

    /// Return a range to the pool for reuse
    pub fn free(&mut self, offset: u32, count: u32) {
        debug_assert!(offset + count <= self.next_offset, "freeing an unallocated range: {}+{}", offset, count);
        self.len -= 1;
        self.allocated -= count;
        self.free_lists.entry(count).or_default().push(offset);
    }

    /// End of the highest range ever allocated.
    ///
    /// This is the minimum length the backing storage must have.
    pub fn high_water_mark(&self) -> u32 {
        self.next_offset
    }

    /// Number of currently allocated ranges
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Number of entries in currently allocated ranges
    pub fn allocated(&self) -> u32 {
        self.allocated
    }

    /// Whether no ranges are currently allocated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for RangeAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "range_allocator_tests.rs"]
mod tests;
