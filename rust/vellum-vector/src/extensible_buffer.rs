//! A growable byte buffer over a single reference-counted memory region.

use byteorder::{ByteOrder, LittleEndian};
use vellum_bytes::align::{bit_bytes, bit_offset, byte_index};
use vellum_common::Result;
use vellum_memory::{BufferAllocator, MemoryRegion};

/// Generates the little-endian `get_*` / `write_*` accessor pairs for multi-byte primitives.
///
/// Reads are random access by element index (`idx * size_of::<T>()`), writes append at
/// the writer cursor. A buffer is filled once, row by row, and later read in any order.
macro_rules! primitive_accessors {
    ($($name:ident: $ty:ty => $read:ident, $write:ident;)*) => {
        paste::paste! {
            $(
                #[doc = concat!("Reads the `", stringify!($ty), "` element at index `idx`.")]
                #[inline]
                pub fn [<get_ $name>](&self, idx: usize) -> $ty {
                    const WIDTH: usize = std::mem::size_of::<$ty>();
                    let offset = idx * WIDTH;
                    LittleEndian::$read(&self.region.as_slice()[offset..offset + WIDTH])
                }

                #[doc = concat!("Appends a `", stringify!($ty), "` at the writer cursor.")]
                #[inline]
                pub fn [<write_ $name>](&mut self, value: $ty) -> Result<()> {
                    const WIDTH: usize = std::mem::size_of::<$ty>();
                    let mut bytes = [0u8; WIDTH];
                    LittleEndian::$write(&mut bytes, value);
                    self.write_bytes(&bytes)
                }
            )*
        }
    };
}

/// Owns exactly one memory region at a time and reallocates it on demand.
///
/// Growth replaces the region with one of `max(128, 2 * capacity)` bytes, copies the
/// whole previous capacity across and carries the writer cursor over. The previous region
/// is released only after the new one is populated, so a failed allocation leaves the
/// buffer untouched.
///
/// The buffer also serves as a validity bitmap: bit `i` (LSB first within each byte)
/// records whether row `i` is present.
#[derive(Debug)]
pub struct ExtensibleBuffer {
    allocator: BufferAllocator,
    region: MemoryRegion,
}

impl ExtensibleBuffer {
    /// Capacity of the first region allocated by a growing buffer.
    pub const MIN_CAPACITY: usize = 128;

    /// Creates an empty buffer (capacity 0) bound to `allocator`.
    pub fn new(allocator: &BufferAllocator) -> ExtensibleBuffer {
        ExtensibleBuffer {
            allocator: allocator.clone(),
            region: allocator.empty(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    #[inline]
    pub fn writer_index(&self) -> usize {
        self.region.writer_index()
    }

    #[inline]
    pub fn reader_index(&self) -> usize {
        self.region.reader_index()
    }

    /// The currently owned region.
    #[inline]
    pub fn region(&self) -> &MemoryRegion {
        &self.region
    }

    /// Grows until at least `len` bytes can be appended at the writer cursor.
    pub fn ensure_writable(&mut self, len: usize) -> Result<()> {
        while self.region.writable_bytes() < len {
            self.realloc()?;
        }
        Ok(())
    }

    /// Grows until the capacity is at least `capacity` bytes, regardless of the
    /// writer cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<()> {
        while self.region.capacity() < capacity {
            self.realloc()?;
        }
        Ok(())
    }

    #[cold]
    fn realloc(&mut self) -> Result<()> {
        let current_capacity = self.region.capacity();
        let new_capacity = Self::MIN_CAPACITY.max(current_capacity.saturating_mul(2));
        let new_region = self.allocator.allocate(new_capacity)?;
        new_region.copy_from(&self.region, current_capacity);
        new_region.set_writer_index(self.region.writer_index());
        log::debug!("reallocated buffer from {current_capacity} to {new_capacity} bytes");
        self.region = new_region;
        Ok(())
    }

    /// Reads bit `idx`.
    ///
    /// # Panics
    ///
    /// Panics if the bit lies beyond the buffer's capacity.
    #[inline]
    pub fn get_bit(&self, idx: usize) -> bool {
        (self.region.as_slice()[byte_index(idx)] >> bit_offset(idx)) & 1 == 1
    }

    /// Sets bit `idx` in place, without touching the capacity or the cursors.
    ///
    /// # Panics
    ///
    /// Panics if the bit lies beyond the buffer's capacity.
    #[inline]
    pub fn set_bit(&mut self, idx: usize, bit: bool) {
        let mask = 1u8 << bit_offset(idx);
        let mut data = self.region.as_mut_slice();
        let byte = &mut data[byte_index(idx)];
        if bit {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Writes bit `idx`, growing the buffer as needed, and moves the writer cursor to
    /// the number of bytes required to address the bit (`ceil((idx + 1) / 8)`).
    pub fn write_bit(&mut self, idx: usize, bit: bool) -> Result<()> {
        let byte_len = bit_bytes(idx + 1);
        self.ensure_capacity(byte_len)?;
        self.set_bit(idx, bit);
        self.region.set_writer_index(byte_len);
        Ok(())
    }

    /// Reads the `i8` element at index `idx`.
    #[inline]
    pub fn get_byte(&self, idx: usize) -> i8 {
        self.region.as_slice()[idx] as i8
    }

    /// Appends an `i8` at the writer cursor.
    #[inline]
    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&[value as u8])
    }

    primitive_accessors! {
        short: i16 => read_i16, write_i16;
        int: i32 => read_i32, write_i32;
        long: i64 => read_i64, write_i64;
        float: f32 => read_f32, write_f32;
        double: f64 => read_f64, write_f64;
    }

    /// Copies `out.len()` bytes starting at byte offset `start` into `out` and returns it.
    pub fn get_bytes<'a>(&self, start: usize, out: &'a mut [u8]) -> &'a mut [u8] {
        self.region.get_bytes(start, out);
        out
    }

    /// Appends `bytes` at the writer cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_writable(bytes.len())?;
        let writer_index = self.region.writer_index();
        self.region.set_bytes(writer_index, bytes);
        self.region.set_writer_index(writer_index + bytes.len());
        Ok(())
    }

    /// Exposes the owned region to an external consumer: rewinds the reader cursor and
    /// pushes a retained handle onto `buffers`.
    ///
    /// This buffer keeps its own reference; both owners release independently.
    pub fn unload_buffer(&self, buffers: &mut Vec<MemoryRegion>) {
        self.region.set_reader_index(0);
        buffers.push(self.region.retain());
    }

    /// Replaces the owned region with a shared reference to `region`, releasing the
    /// previous one. The new reference is taken before the old one is dropped, so the
    /// buffer is never without a live region (and reloading the same region is safe).
    pub fn load_buffer(&mut self, region: &MemoryRegion) {
        let previous = std::mem::replace(&mut self.region, region.retain());
        drop(previous);
    }

    /// Zeroes the full capacity and rewinds both cursors, keeping the allocation.
    pub fn reset(&mut self) {
        self.region.set_zero(0, self.region.capacity());
        self.region.set_reader_index(0);
        self.region.set_writer_index(0);
    }

    /// Releases the owned region, leaving the buffer empty. Calling `close` again is a no-op.
    pub fn close(&mut self) {
        if !self.region.is_empty() {
            self.region = self.allocator.empty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> (BufferAllocator, ExtensibleBuffer) {
        let allocator = BufferAllocator::unlimited();
        let buf = ExtensibleBuffer::new(&allocator);
        (allocator, buf)
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let (allocator, buf) = buffer();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.writer_index(), 0);
        assert_eq!(buf.reader_index(), 0);
        assert_eq!(allocator.allocated_bytes(), 0);
    }

    #[test]
    fn test_growth_policy() {
        let (allocator, mut buf) = buffer();
        buf.write_byte(1).unwrap();
        assert_eq!(buf.capacity(), 128);

        buf.ensure_writable(127).unwrap();
        assert_eq!(buf.capacity(), 128);
        buf.ensure_writable(128).unwrap();
        assert_eq!(buf.capacity(), 256);

        buf.ensure_capacity(257).unwrap();
        assert_eq!(buf.capacity(), 512);
        // The old regions have been released.
        assert_eq!(allocator.allocated_bytes(), 512);
        assert_eq!(allocator.region_count(), 1);
    }

    #[test]
    fn test_large_write_grows_repeatedly() {
        let (_allocator, mut buf) = buffer();
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        buf.write_bytes(&data).unwrap();
        assert_eq!(buf.capacity(), 1024);
        assert_eq!(buf.writer_index(), 1000);

        let mut out = vec![0u8; 1000];
        assert_eq!(buf.get_bytes(0, &mut out), data.as_slice());
    }

    #[test]
    fn test_growth_preserves_full_capacity() {
        let (_allocator, mut buf) = buffer();
        buf.write_long(0x0102_0304_0506_0708).unwrap();
        // Bytes beyond the writer cursor survive a reallocation too.
        buf.set_bit(8 * 100, true);

        buf.ensure_capacity(200).unwrap();
        assert_eq!(buf.capacity(), 256);
        assert_eq!(buf.writer_index(), 8);
        assert_eq!(buf.get_long(0), 0x0102_0304_0506_0708);
        assert!(buf.get_bit(800));
    }

    #[test]
    fn test_primitive_round_trips() {
        let (_allocator, mut buf) = buffer();
        for v in [0i8, 1, -1, i8::MIN, i8::MAX] {
            buf.write_byte(v).unwrap();
        }
        for (i, v) in [0i8, 1, -1, i8::MIN, i8::MAX].into_iter().enumerate() {
            assert_eq!(buf.get_byte(i), v);
        }

        let (_allocator, mut buf) = buffer();
        let values = [0i16, 1, -1, i16::MIN, i16::MAX];
        values.iter().for_each(|&v| buf.write_short(v).unwrap());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(buf.get_short(i), v);
        }

        let (_allocator, mut buf) = buffer();
        let values = [0i32, 1, -1, i32::MIN, i32::MAX];
        values.iter().for_each(|&v| buf.write_int(v).unwrap());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(buf.get_int(i), v);
        }

        let (_allocator, mut buf) = buffer();
        let values = [0i64, 1, -1, i64::MIN, i64::MAX];
        values.iter().for_each(|&v| buf.write_long(v).unwrap());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(buf.get_long(i), v);
        }

        let (_allocator, mut buf) = buffer();
        let values = [0f32, 1.0, -1.0, f32::MIN, f32::MAX];
        values.iter().for_each(|&v| buf.write_float(v).unwrap());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(buf.get_float(i), v);
        }

        let (_allocator, mut buf) = buffer();
        let values = [0f64, 1.0, -1.0, f64::MIN, f64::MAX];
        values.iter().for_each(|&v| buf.write_double(v).unwrap());
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(buf.get_double(i), v);
        }
    }

    #[test]
    fn test_little_endian_layout() {
        let (_allocator, mut buf) = buffer();
        buf.write_int(0x0A0B_0C0D).unwrap();
        buf.write_short(0x0102).unwrap();
        let mut out = [0u8; 6];
        assert_eq!(
            buf.get_bytes(0, &mut out),
            &[0x0D, 0x0C, 0x0B, 0x0A, 0x02, 0x01]
        );
    }

    #[test]
    fn test_bits() {
        let (_allocator, mut buf) = buffer();
        buf.write_bit(0, true).unwrap();
        buf.write_bit(1, false).unwrap();
        buf.write_bit(2, true).unwrap();
        assert_eq!(buf.writer_index(), 1);
        assert!(buf.get_bit(0));
        assert!(!buf.get_bit(1));
        assert!(buf.get_bit(2));

        buf.write_bit(8, true).unwrap();
        assert_eq!(buf.writer_index(), 2);
        assert!(buf.get_bit(0) && !buf.get_bit(1) && buf.get_bit(2));

        buf.set_bit(2, false);
        assert!(!buf.get_bit(2));
        assert_eq!(buf.writer_index(), 2);
    }

    #[test]
    fn test_write_bit_past_capacity_grows() {
        let (_allocator, mut buf) = buffer();
        buf.write_bit(0, true).unwrap();
        buf.write_bit(2000, true).unwrap();
        assert_eq!(buf.capacity(), 256);
        assert_eq!(buf.writer_index(), 251);
        assert!(buf.get_bit(0));
        assert!(buf.get_bit(2000));
        assert!(!buf.get_bit(1999));
    }

    #[test]
    fn test_random_bits_never_disturb_earlier_bits() {
        let (_allocator, mut buf) = buffer();
        let bits: Vec<bool> = (0..5000).map(|_| fastrand::bool()).collect();
        for (i, &bit) in bits.iter().enumerate() {
            buf.write_bit(i, bit).unwrap();
            assert_eq!(buf.get_bit(i), bit);
        }
        for (i, &bit) in bits.iter().enumerate() {
            assert_eq!(buf.get_bit(i), bit, "bit {i}");
        }
        assert_eq!(buf.writer_index(), 625);
    }

    #[test]
    fn test_reset() {
        let (allocator, mut buf) = buffer();
        for i in 0..40 {
            buf.write_int(i + 1).unwrap();
        }
        buf.set_bit(1000, true);
        let capacity = buf.capacity();

        buf.reset();
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(buf.writer_index(), 0);
        assert_eq!(buf.reader_index(), 0);
        assert!(buf.region().as_slice().iter().all(|&b| b == 0));

        let mut fresh = ExtensibleBuffer::new(&allocator);
        fresh.ensure_capacity(capacity).unwrap();
        for i in 0..10 {
            buf.write_int(i * 3).unwrap();
            fresh.write_int(i * 3).unwrap();
        }
        assert_eq!(&*buf.region().as_slice(), &*fresh.region().as_slice());
    }

    #[test]
    fn test_unload_then_load_round_trips() {
        let (_allocator, mut buf) = buffer();
        for i in 0..20 {
            buf.write_short(i * 7).unwrap();
        }
        let before = buf.region().as_slice().to_vec();

        let mut buffers = Vec::new();
        buf.unload_buffer(&mut buffers);
        assert_eq!(buffers.len(), 1);
        assert!(buffers[0].ptr_eq(buf.region()));
        assert_eq!(buffers[0].reader_index(), 0);
        assert_eq!(buffers[0].ref_count(), 2);

        buf.load_buffer(&buffers[0]);
        assert_eq!(buffers[0].ref_count(), 2);
        assert_eq!(&*buf.region().as_slice(), before.as_slice());
        assert_eq!(buf.writer_index(), 40);
        assert_eq!(buf.get_short(19), 19 * 7);
    }

    #[test]
    fn test_load_releases_previous_region() {
        let allocator = BufferAllocator::unlimited();
        let mut source = ExtensibleBuffer::new(&allocator);
        source.write_long(42).unwrap();
        let mut target = ExtensibleBuffer::new(&allocator);
        target.write_long(7).unwrap();
        assert_eq!(allocator.region_count(), 2);

        let mut buffers = Vec::new();
        source.unload_buffer(&mut buffers);
        target.load_buffer(&buffers[0]);
        assert_eq!(allocator.region_count(), 1);
        assert_eq!(buffers[0].ref_count(), 3);
        assert_eq!(target.get_long(0), 42);

        drop(buffers);
        source.close();
        assert_eq!(target.region().ref_count(), 1);
        assert_eq!(allocator.region_count(), 1);
    }

    #[test]
    fn test_allocation_failure_keeps_state() {
        let allocator = BufferAllocator::with_limit(200).unwrap();
        let mut buf = ExtensibleBuffer::new(&allocator);
        for i in 0..16 {
            buf.write_long(i).unwrap();
        }
        assert_eq!(buf.capacity(), 128);

        let err = buf.write_long(16).unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(buf.capacity(), 128);
        assert_eq!(buf.writer_index(), 128);
        assert_eq!(buf.get_long(15), 15);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (allocator, mut buf) = buffer();
        buf.write_double(1.5).unwrap();
        assert_eq!(allocator.allocated_bytes(), 128);
        buf.close();
        assert_eq!(allocator.allocated_bytes(), 0);
        assert_eq!(buf.capacity(), 0);
        buf.close();
        assert_eq!(buf.capacity(), 0);
    }
}
