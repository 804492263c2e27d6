//! The shared machinery behind every fixed-width vector: a data buffer and a
//! validity bitmap addressed by the same row index.

use std::collections::VecDeque;

use vellum_bytes::align::bit_bytes;
use vellum_common::{Error, Result, ValidationConfig};
use vellum_memory::{BufferAllocator, MemoryRegion};

use crate::{extensible_buffer::ExtensibleBuffer, logical_type::LogicalType, vector::FieldNode};

/// Widest supported element; null rows are written from this zeroed prefix.
const ZEROS: [u8; 8] = [0; 8];

/// A column of uniformly sized elements.
///
/// Row `i` occupies bytes `i * width .. (i + 1) * width` of the data buffer and bit `i`
/// of the validity buffer (1 = present, 0 = null). Null rows are still written to the
/// data buffer, as zero bytes, so the row-to-offset mapping stays dense.
#[derive(Debug)]
pub struct FixedWidthVector {
    name: String,
    nullable: bool,
    logical_type: LogicalType,
    config: ValidationConfig,
    value_count: usize,
    validity: ExtensibleBuffer,
    data: ExtensibleBuffer,
}

impl FixedWidthVector {
    pub fn new(
        allocator: &BufferAllocator,
        name: impl Into<String>,
        logical_type: LogicalType,
        nullable: bool,
        config: ValidationConfig,
    ) -> FixedWidthVector {
        FixedWidthVector {
            name: name.into(),
            nullable,
            logical_type,
            config,
            value_count: 0,
            validity: ExtensibleBuffer::new(allocator),
            data: ExtensibleBuffer::new(allocator),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Element width in bytes.
    #[inline]
    pub fn width(&self) -> usize {
        self.logical_type.width()
    }

    #[inline]
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    #[inline]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn data_buffer(&self) -> &ExtensibleBuffer {
        &self.data
    }

    pub(crate) fn data_buffer_mut(&mut self) -> &mut ExtensibleBuffer {
        &mut self.data
    }

    pub fn validity_buffer(&self) -> &ExtensibleBuffer {
        &self.validity
    }

    /// Returns `true` if row `idx` is null. Rows at or past `value_count` are
    /// reported as null.
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        idx >= self.value_count || !self.validity.get_bit(idx)
    }

    pub fn null_count(&self) -> usize {
        (0..self.value_count).filter(|&idx| self.is_null(idx)).count()
    }

    /// Verifies a typed read of row `idx` when null checks are enabled.
    #[inline]
    pub(crate) fn check_read(&self, idx: usize) -> Result<()> {
        if self.config.null_checks {
            if idx >= self.value_count {
                return Err(Error::out_of_bounds(&self.name, idx, self.value_count));
            }
            if !self.validity.get_bit(idx) {
                return Err(Error::null_value(&self.name, idx));
            }
        }
        Ok(())
    }

    /// Makes room for one more row in both buffers, so that the element write and the
    /// validity write that follow cannot fail halfway.
    #[inline]
    pub(crate) fn reserve_row(&mut self) -> Result<()> {
        self.data.ensure_writable(self.width())?;
        self.validity.ensure_capacity(bit_bytes(self.value_count + 1))
    }

    /// Marks the row just written to the data buffer as present.
    #[inline]
    pub(crate) fn write_not_null(&mut self) -> Result<()> {
        self.validity.write_bit(self.value_count, true)?;
        self.value_count += 1;
        Ok(())
    }

    /// Appends a null row: a zeroed element in the data buffer and a cleared
    /// validity bit.
    ///
    /// Fails with `InvalidOperation` if the vector is not nullable.
    pub fn write_null(&mut self) -> Result<()> {
        if !self.nullable {
            return Err(Error::invalid_operation(format!(
                "write_null on non-nullable vector '{}'",
                self.name
            )));
        }
        self.reserve_row()?;
        let width = self.width();
        self.data.write_bytes(&ZEROS[..width])?;
        self.validity.write_bit(self.value_count, false)?;
        self.value_count += 1;
        Ok(())
    }

    /// Copies the raw element bytes of row `idx` into `out`, which must be exactly
    /// one element wide.
    pub fn get_element_bytes<'a>(&self, idx: usize, out: &'a mut [u8]) -> Result<&'a mut [u8]> {
        if out.len() != self.width() {
            return Err(Error::invalid_arg(
                "out",
                format!("expected {} bytes, got {}", self.width(), out.len()),
            ));
        }
        if idx >= self.value_count {
            return Err(Error::out_of_bounds(&self.name, idx, self.value_count));
        }
        Ok(self.data.get_bytes(idx * self.width(), out))
    }

    /// Appends row `idx` of `src`, which must share this vector's logical type.
    /// Null rows are copied as nulls.
    pub fn copy_row_from(&mut self, src: &FixedWidthVector, idx: usize) -> Result<()> {
        if src.logical_type != self.logical_type {
            return Err(Error::invalid_arg(
                "src",
                format!(
                    "cannot copy {} rows into {} vector '{}'",
                    src.logical_type, self.logical_type, self.name
                ),
            ));
        }
        if idx >= src.value_count {
            return Err(Error::out_of_bounds(&src.name, idx, src.value_count));
        }
        if src.is_null(idx) {
            return self.write_null();
        }
        let mut element = [0u8; 8];
        let element = src.get_element_bytes(idx, &mut element[..self.width()])?;
        self.reserve_row()?;
        self.data.write_bytes(element)?;
        self.write_not_null()
    }

    /// Zeroes both buffers and rewinds the vector to zero rows, keeping the allocations.
    pub fn reset(&mut self) {
        self.validity.reset();
        self.data.reset();
        self.value_count = 0;
    }

    /// Releases both buffers.
    pub fn close(&mut self) {
        self.validity.close();
        self.data.close();
        self.value_count = 0;
    }

    /// Exposes this vector's page: one field node, then the validity and data regions.
    pub fn unload_page(&self, nodes: &mut Vec<FieldNode>, buffers: &mut Vec<MemoryRegion>) {
        nodes.push(FieldNode {
            length: self.value_count,
            null_count: self.null_count(),
        });
        self.validity.unload_buffer(buffers);
        self.data.unload_buffer(buffers);
    }

    /// Takes over a page previously produced by [`unload_page`](Self::unload_page),
    /// consuming one field node and two regions from the fronts of the queues.
    ///
    /// The regions' writer cursors must sit exactly at the end of `node.length` rows.
    /// Nothing is consumed or replaced if the page is malformed.
    pub fn load_page(
        &mut self,
        nodes: &mut VecDeque<FieldNode>,
        buffers: &mut VecDeque<MemoryRegion>,
    ) -> Result<()> {
        let Some(node) = nodes.front().copied() else {
            return Err(Error::invalid_arg("nodes", "missing field node"));
        };
        if buffers.len() < 2 {
            return Err(Error::invalid_arg(
                "buffers",
                format!("expected validity and data buffers, got {}", buffers.len()),
            ));
        }
        let (validity, data) = (&buffers[0], &buffers[1]);
        if validity.capacity() < bit_bytes(node.length) {
            return Err(Error::invalid_arg(
                "buffers",
                format!("validity buffer too small for {} rows", node.length),
            ));
        }
        if data.capacity() < node.length * self.width() {
            return Err(Error::invalid_arg(
                "buffers",
                format!("data buffer too small for {} rows", node.length),
            ));
        }
        // Appends continue at the writer cursors, so they must sit right after the
        // last row or the next row would overwrite an existing one.
        if data.writer_index() != node.length * self.width() {
            return Err(Error::invalid_arg(
                "buffers",
                format!(
                    "data writer index {} does not match {} rows of width {}",
                    data.writer_index(),
                    node.length,
                    self.width()
                ),
            ));
        }
        if validity.writer_index() != bit_bytes(node.length) {
            return Err(Error::invalid_arg(
                "buffers",
                format!(
                    "validity writer index {} does not match {} rows",
                    validity.writer_index(),
                    node.length
                ),
            ));
        }

        self.validity.load_buffer(validity);
        self.data.load_buffer(data);
        self.value_count = node.length;
        nodes.pop_front();
        buffers.drain(..2);
        Ok(())
    }
}
