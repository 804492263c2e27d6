//! Raw memory provider for vellum buffers.
//!
//! A [`BufferAllocator`] hands out fixed-size, zero-filled [`MemoryRegion`]s and keeps
//! track of how many bytes are live against an optional limit. Regions are reference
//! counted: cloning a handle (`retain`) adds an owner, dropping it releases one, and the
//! bytes are returned to the allocator when the last owner goes away.
//!
//! Both types are `!Send`: a buffer and the regions it owns belong to a
//! single logical owner, and callers needing concurrent access must serialize externally.

pub mod allocator;
pub mod region;

pub use allocator::{AllocatorConfig, BufferAllocator};
pub use region::MemoryRegion;
