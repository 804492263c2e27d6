use std::{cell::Cell, rc::Rc};

use vellum_bytes::AlignedByteVec;
use vellum_common::{Error, Result, verify_arg};

use crate::region::MemoryRegion;

/// Configuration for a [`BufferAllocator`].
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Name used in diagnostics.
    pub name: String,
    /// Maximum number of bytes that may be live at any one time.
    pub limit: u64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            name: "root".to_string(),
            limit: u64::MAX,
        }
    }
}

impl AllocatorConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(limit, self.limit > 0);
        verify_arg!(name, !self.name.is_empty());
        Ok(())
    }
}

/// Supplies zero-filled memory regions and accounts for the bytes they hold.
///
/// `BufferAllocator` is a cheap handle; clones share the same accounting. Every region
/// keeps the accounting state alive, so regions may outlive the handle that created them.
#[derive(Clone)]
pub struct BufferAllocator(Rc<AllocatorState>);

impl BufferAllocator {
    /// Creates an allocator from the given configuration.
    pub fn new(config: AllocatorConfig) -> Result<BufferAllocator> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Creates an allocator without a limit.
    pub fn unlimited() -> BufferAllocator {
        Self::from_valid_config(AllocatorConfig::default())
    }

    fn from_valid_config(config: AllocatorConfig) -> BufferAllocator {
        BufferAllocator(Rc::new(AllocatorState {
            name: config.name,
            limit: config.limit,
            allocated: Cell::new(0),
            peak: Cell::new(0),
            regions: Cell::new(0),
        }))
    }

    /// Creates an allocator that refuses to hold more than `limit` bytes at once.
    pub fn with_limit(limit: u64) -> Result<BufferAllocator> {
        Self::new(AllocatorConfig::default().with_limit(limit))
    }

    /// Allocates a zero-filled region of exactly `size` bytes.
    ///
    /// A zero `size` yields the [empty](Self::empty) sentinel. Fails with
    /// `AllocationFailed` when the request would exceed the allocator's limit;
    /// there is no retry.
    pub fn allocate(&self, size: usize) -> Result<MemoryRegion> {
        if size == 0 {
            return Ok(self.empty());
        }
        self.0.reserve(size as u64)?;
        log::trace!("{}: allocated region of {} bytes", self.0.name, size);
        Ok(MemoryRegion::new(
            AlignedByteVec::zeroed(size),
            Some(self.0.clone()),
        ))
    }

    /// Returns a zero-capacity region, used as the initial state of a buffer
    /// before its first growth. The sentinel is not accounted.
    pub fn empty(&self) -> MemoryRegion {
        MemoryRegion::new(AlignedByteVec::new(), None)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn limit(&self) -> u64 {
        self.0.limit
    }

    /// Bytes currently held by live regions.
    pub fn allocated_bytes(&self) -> u64 {
        self.0.allocated.get()
    }

    /// Highest value of [`allocated_bytes`](Self::allocated_bytes) observed so far.
    pub fn peak_bytes(&self) -> u64 {
        self.0.peak.get()
    }

    /// Bytes that may still be allocated before hitting the limit.
    pub fn remaining(&self) -> u64 {
        self.0.limit - self.0.allocated.get()
    }

    /// Number of live (non-sentinel) regions.
    pub fn region_count(&self) -> usize {
        self.0.regions.get()
    }
}

impl std::fmt::Debug for BufferAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferAllocator")
            .field("name", &self.0.name)
            .field("limit", &self.0.limit)
            .field("allocated", &self.0.allocated.get())
            .field("regions", &self.0.regions.get())
            .finish()
    }
}

pub(crate) struct AllocatorState {
    name: String,
    limit: u64,
    allocated: Cell<u64>,
    peak: Cell<u64>,
    regions: Cell<usize>,
}

impl AllocatorState {
    fn reserve(&self, amount: u64) -> Result<()> {
        let allocated = self.allocated.get();
        let Some(new_allocated) = allocated
            .checked_add(amount)
            .filter(|&total| total <= self.limit)
        else {
            log::warn!(
                "{}: refused allocation of {} bytes ({} of {} in use)",
                self.name,
                amount,
                allocated,
                self.limit
            );
            return Err(Error::allocation_failed(amount, allocated, self.limit));
        };
        self.allocated.set(new_allocated);
        self.peak.set(self.peak.get().max(new_allocated));
        self.regions.set(self.regions.get() + 1);
        Ok(())
    }

    pub(crate) fn release(&self, amount: u64) {
        log::trace!("{}: released region of {} bytes", self.name, amount);
        self.allocated.set(self.allocated.get() - amount);
        self.regions.set(self.regions.get() - 1);
    }
}
