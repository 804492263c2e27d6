//! The capability interface shared by all typed vectors.

use std::collections::VecDeque;

use vellum_common::{Error, Result};
use vellum_memory::MemoryRegion;

use crate::{fixed_width::FixedWidthVector, logical_type::LogicalType, value::Value};

/// Row count and null count of one vector page, accompanying its buffers across
/// the interop boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNode {
    pub length: usize,
    pub null_count: usize,
}

/// Common interface of the typed fixed-width vectors.
///
/// Implementors supply their [`FixedWidthVector`] and the two loosely-typed entry
/// points; everything else is provided on top of them.
pub trait Vector {
    fn base(&self) -> &FixedWidthVector;

    fn base_mut(&mut self) -> &mut FixedWidthVector;

    /// Reads row `idx` as a [`Value`] of the vector's kind.
    ///
    /// Null rows and out-of-range indices are rejected only when `null_checks` is
    /// enabled; otherwise the stored bytes are returned as-is.
    fn get_object0(&self, idx: usize) -> Result<Value>;

    /// Appends `value`, which must be of the vector's kind. A mismatching kind fails
    /// with `UnsupportedValueKind` before anything is written.
    fn write_object0(&mut self, value: Value) -> Result<()>;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn nullable(&self) -> bool {
        self.base().nullable()
    }

    fn set_nullable(&mut self, nullable: bool) {
        self.base_mut().set_nullable(nullable);
    }

    fn logical_type(&self) -> LogicalType {
        self.base().logical_type()
    }

    fn width(&self) -> usize {
        self.base().width()
    }

    fn value_count(&self) -> usize {
        self.base().value_count()
    }

    fn is_null(&self, idx: usize) -> bool {
        self.base().is_null(idx)
    }

    fn null_count(&self) -> usize {
        self.base().null_count()
    }

    fn write_null(&mut self) -> Result<()> {
        self.base_mut().write_null()
    }

    /// Reads row `idx`, returning `None` for a null row.
    ///
    /// Unlike the typed getters, this always rejects rows past `value_count`.
    fn get_object(&self, idx: usize) -> Result<Option<Value>> {
        if idx >= self.value_count() {
            return Err(Error::out_of_bounds(self.name(), idx, self.value_count()));
        }
        if self.is_null(idx) {
            return Ok(None);
        }
        self.get_object0(idx).map(Some)
    }

    /// Appends `value`, or a null row for `None`.
    fn write_object(&mut self, value: Option<Value>) -> Result<()> {
        match value {
            Some(value) => self.write_object0(value),
            None => self.write_null(),
        }
    }

    /// Appends row `idx` of `src` without going through [`Value`].
    fn copy_row(&mut self, src: &dyn Vector, idx: usize) -> Result<()> {
        self.base_mut().copy_row_from(src.base(), idx)
    }

    fn reset(&mut self) {
        self.base_mut().reset();
    }

    fn close(&mut self) {
        self.base_mut().close();
    }

    fn unload_page(&self, nodes: &mut Vec<FieldNode>, buffers: &mut Vec<MemoryRegion>) {
        self.base().unload_page(nodes, buffers);
    }

    fn load_page(
        &mut self,
        nodes: &mut VecDeque<FieldNode>,
        buffers: &mut VecDeque<MemoryRegion>,
    ) -> Result<()> {
        self.base_mut().load_page(nodes, buffers)
    }
}
