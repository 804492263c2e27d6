use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    rc::Rc,
};

use vellum_bytes::AlignedByteVec;

use crate::allocator::AllocatorState;

/// A fixed-capacity, reference-counted memory region with reader and writer cursors.
///
/// A `MemoryRegion` is a handle: [`retain`](Self::retain) (or `clone`) produces another
/// owner of the same bytes and cursors, and dropping a handle releases that owner. The
/// bytes go back to the allocator when the last handle is dropped.
///
/// The cursors belong to the region rather than to the handle, so every owner observes
/// the same `reader_index <= writer_index <= capacity` window.
#[derive(Clone)]
pub struct MemoryRegion(Rc<RegionInner>);

struct RegionInner {
    data: RefCell<AlignedByteVec>,
    reader_index: Cell<usize>,
    writer_index: Cell<usize>,
    allocator: Option<Rc<AllocatorState>>,
}

impl Drop for RegionInner {
    fn drop(&mut self) {
        if let Some(allocator) = self.allocator.as_ref() {
            allocator.release(self.data.get_mut().len() as u64);
        }
    }
}

impl MemoryRegion {
    pub(crate) fn new(
        data: AlignedByteVec,
        allocator: Option<Rc<AllocatorState>>,
    ) -> MemoryRegion {
        MemoryRegion(Rc::new(RegionInner {
            data: RefCell::new(data),
            reader_index: Cell::new(0),
            writer_index: Cell::new(0),
            allocator,
        }))
    }

    /// Total number of addressable bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.data.borrow().len()
    }

    /// Returns `true` for a zero-capacity region.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacity() == 0
    }

    /// Adds an owner and returns its handle.
    #[inline]
    pub fn retain(&self) -> MemoryRegion {
        self.clone()
    }

    /// Number of live handles to this region.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Returns `true` if both handles refer to the same region.
    #[inline]
    pub fn ptr_eq(&self, other: &MemoryRegion) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn reader_index(&self) -> usize {
        self.0.reader_index.get()
    }

    #[inline]
    pub fn writer_index(&self) -> usize {
        self.0.writer_index.get()
    }

    /// # Panics
    ///
    /// Panics if `index` exceeds the writer index.
    pub fn set_reader_index(&self, index: usize) {
        assert!(
            index <= self.writer_index(),
            "reader index {index} exceeds writer index {}",
            self.writer_index()
        );
        self.0.reader_index.set(index);
    }

    /// # Panics
    ///
    /// Panics if `index` exceeds the capacity or falls below the reader index.
    pub fn set_writer_index(&self, index: usize) {
        assert!(
            index <= self.capacity(),
            "writer index {index} exceeds capacity {}",
            self.capacity()
        );
        assert!(
            index >= self.reader_index(),
            "writer index {index} is below reader index {}",
            self.reader_index()
        );
        self.0.writer_index.set(index);
    }

    /// Bytes that can be appended before the region is full.
    #[inline]
    pub fn writable_bytes(&self) -> usize {
        self.capacity() - self.writer_index()
    }

    /// Borrows the full capacity of the region.
    ///
    /// # Panics
    ///
    /// Panics if the region is currently borrowed mutably.
    pub fn as_slice(&self) -> Ref<'_, [u8]> {
        Ref::map(self.0.data.borrow(), |data| data.as_slice())
    }

    /// Mutably borrows the full capacity of the region.
    ///
    /// # Panics
    ///
    /// Panics if the region is already borrowed.
    pub fn as_mut_slice(&self) -> RefMut<'_, [u8]> {
        RefMut::map(self.0.data.borrow_mut(), |data| data.as_mut_slice())
    }

    /// Copies `out.len()` bytes starting at `offset` into `out`.
    pub fn get_bytes(&self, offset: usize, out: &mut [u8]) {
        out.copy_from_slice(&self.as_slice()[offset..offset + out.len()]);
    }

    /// Copies `src` into the region at `offset`, leaving the cursors untouched.
    pub fn set_bytes(&self, offset: usize, src: &[u8]) {
        self.as_mut_slice()[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Zeroes `len` bytes starting at `offset`.
    pub fn set_zero(&self, offset: usize, len: usize) {
        self.0.data.borrow_mut().fill(offset, len, 0);
    }

    /// Copies the first `len` bytes of `src` to the start of this region.
    pub fn copy_from(&self, src: &MemoryRegion, len: usize) {
        if len == 0 || self.ptr_eq(src) {
            return;
        }
        self.set_bytes(0, &src.as_slice()[..len]);
    }

}

impl std::fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRegion")
            .field("capacity", &self.capacity())
            .field("reader_index", &self.reader_index())
            .field("writer_index", &self.writer_index())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::BufferAllocator;

    #[test]
    fn test_retain_and_release() {
        let allocator = BufferAllocator::unlimited();
        let region = allocator.allocate(128).unwrap();
        assert_eq!(region.ref_count(), 1);

        let other = region.retain();
        assert_eq!(region.ref_count(), 2);
        assert!(other.ptr_eq(&region));

        drop(region);
        assert_eq!(other.ref_count(), 1);
        assert_eq!(allocator.allocated_bytes(), 128);

        drop(other);
        assert_eq!(allocator.allocated_bytes(), 0);
    }

    #[test]
    fn test_cursors_are_shared_between_handles() {
        let allocator = BufferAllocator::unlimited();
        let region = allocator.allocate(16).unwrap();
        let other = region.retain();

        region.set_writer_index(10);
        region.set_reader_index(4);
        assert_eq!(other.writer_index(), 10);
        assert_eq!(other.reader_index(), 4);
        assert_eq!(other.writable_bytes(), 6);
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn test_writer_index_past_capacity() {
        let allocator = BufferAllocator::unlimited();
        let region = allocator.allocate(16).unwrap();
        region.set_writer_index(17);
    }

    #[test]
    #[should_panic(expected = "exceeds writer index")]
    fn test_reader_index_past_writer() {
        let allocator = BufferAllocator::unlimited();
        let region = allocator.allocate(16).unwrap();
        region.set_writer_index(4);
        region.set_reader_index(5);
    }

    #[test]
    fn test_byte_access() {
        let allocator = BufferAllocator::unlimited();
        let region = allocator.allocate(32).unwrap();
        region.set_bytes(3, &[1, 2, 3, 4]);

        let mut out = [0u8; 6];
        region.get_bytes(2, &mut out);
        assert_eq!(out, [0, 1, 2, 3, 4, 0]);

        region.set_zero(4, 2);
        region.get_bytes(2, &mut out);
        assert_eq!(out, [0, 1, 0, 0, 4, 0]);
    }

    #[test]
    fn test_copy_from() {
        let allocator = BufferAllocator::unlimited();
        let src = allocator.allocate(16).unwrap();
        for (i, b) in src.as_mut_slice().iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        let dst = allocator.allocate(32).unwrap();
        dst.copy_from(&src, 16);
        assert_eq!(&dst.as_slice()[..16], &src.as_slice()[..]);
        assert!(dst.as_slice()[16..].iter().all(|&b| b == 0));

        // Copying a region onto itself is a no-op rather than a double borrow.
        src.copy_from(&src, 16);
        assert_eq!(src.as_slice()[15], 16);
    }

    #[test]
    fn test_random_retain_release_accounting() {
        fastrand::seed(7);
        let allocator = BufferAllocator::unlimited();
        let mut handles = Vec::new();
        for _ in 0..500 {
            match fastrand::u8(0..3) {
                0 => handles.push(allocator.allocate(fastrand::usize(1..512)).unwrap()),
                1 if !handles.is_empty() => {
                    let idx = fastrand::usize(0..handles.len());
                    handles.push(handles[idx].retain());
                }
                _ if !handles.is_empty() => {
                    handles.swap_remove(fastrand::usize(0..handles.len()));
                }
                _ => {}
            }
            let mut distinct: Vec<_> = Vec::new();
            for h in &handles {
                if !distinct.iter().any(|d: &&crate::MemoryRegion| d.ptr_eq(h)) {
                    distinct.push(h);
                }
            }
            let live: usize = distinct.iter().map(|r| r.capacity()).sum();
            assert_eq!(allocator.allocated_bytes(), live as u64);
            assert_eq!(allocator.region_count(), distinct.len());
        }
        handles.clear();
        assert_eq!(allocator.allocated_bytes(), 0);
    }
}
