/// Aligns a number up to the next multiple of the specified alignment.
///
/// # Examples
///
/// ```
/// use vellum_bytes::align::align_up;
///
/// assert_eq!(align_up(0, 8), 0);
/// assert_eq!(align_up(1, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 64), 64);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if `alignment` is 0 or not a power of 2.
#[inline]
pub fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    n.checked_add(alignment - 1).expect("add") & !(alignment - 1)
}

/// Checks whether a pointer is aligned to the specified power-of-two boundary.
#[inline]
pub fn is_aligned_ptr(ptr: *const u8, alignment: usize) -> bool {
    alignment.is_power_of_two() && ((ptr as usize) & (alignment - 1)) == 0
}

/// Number of bytes needed to hold `bit_count` bits packed eight per byte.
///
/// This is the validity buffer size for `bit_count` rows.
///
/// ```
/// use vellum_bytes::align::bit_bytes;
///
/// assert_eq!(bit_bytes(0), 0);
/// assert_eq!(bit_bytes(1), 1);
/// assert_eq!(bit_bytes(8), 1);
/// assert_eq!(bit_bytes(9), 2);
/// ```
#[inline]
pub fn bit_bytes(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// Byte holding bit `bit_idx`.
#[inline]
pub fn byte_index(bit_idx: usize) -> usize {
    bit_idx >> 3
}

/// Position of bit `bit_idx` within its byte (LSB first).
#[inline]
pub fn bit_offset(bit_idx: usize) -> u32 {
    (bit_idx & 7) as u32
}
