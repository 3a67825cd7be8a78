mod range_allocator;

pub use range_allocator::RangeAllocator;
