use crate::align::{align_up, is_aligned_ptr};

/// A fixed-length, zero-initialised byte vector whose data start is aligned to
/// [`ALIGNMENT`](Self::ALIGNMENT) bytes.
///
/// Storage is reserved in 64-byte blocks so that SIMD consumers may safely read whole
/// blocks past the logical end.
pub struct AlignedByteVec {
    /// The underlying byte vector, may include padding at start
    inner: Vec<u8>,
    /// Offset from start of inner vec to maintain alignment
    start: u32,
}

impl AlignedByteVec {
    /// Alignment of the data start, in bytes (the Arrow buffer alignment).
    pub const ALIGNMENT: usize = 64;
    /// Block size for capacity calculations.
    const BLOCK_SIZE: usize = 64;

    /// Creates a new empty vector with no allocation.
    pub fn new() -> AlignedByteVec {
        AlignedByteVec {
            inner: Vec::new(),
            start: 0,
        }
    }

    /// Creates a new vector of specified length, filled with zeros.
    pub fn zeroed(len: usize) -> AlignedByteVec {
        if len == 0 {
            return AlignedByteVec::new();
        }

        let vec_capacity = align_up(len, Self::BLOCK_SIZE)
            .checked_add(Self::ALIGNMENT)
            .expect("add");
        let mut inner = Vec::<u8>::with_capacity(vec_capacity);

        let p = inner.as_ptr() as usize;
        let start = align_up(p, Self::ALIGNMENT) - p;
        inner.resize(start + len, 0);

        let res = AlignedByteVec {
            inner,
            start: start as u32,
        };
        debug_assert!(is_aligned_ptr(res.as_ptr(), Self::ALIGNMENT));
        res
    }

    /// Returns the number of bytes in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len() - self.start_offset()
    }

    /// Returns true if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a raw pointer to the vector's buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.as_slice().as_ptr()
    }

    /// Returns a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[self.start_offset()..]
    }

    /// Returns a mutable slice containing the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let start = self.start_offset();
        &mut self.inner[start..]
    }

    /// Overwrites `len` bytes starting at `offset` with `value`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the vector's length.
    pub fn fill(&mut self, offset: usize, len: usize, value: u8) {
        self.as_mut_slice()[offset..offset + len].fill(value);
    }

    #[inline]
    fn start_offset(&self) -> usize {
        self.start as usize
    }
}

impl std::fmt::Debug for AlignedByteVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedByteVec")
            .field("len", &self.len())
            .field("internal_offset", &self.start)
            .finish_non_exhaustive()
    }
}

impl Default for AlignedByteVec {
    fn default() -> Self {
        Self::new()
    }
}
