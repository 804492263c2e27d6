//! Growable byte buffers and the fixed-width typed vectors built on them.
//!
//! An [`ExtensibleBuffer`] owns one [`MemoryRegion`](vellum_memory::MemoryRegion) at a
//! time, appending little-endian primitives at its writer cursor and doubling its
//! capacity on demand. A [`FixedWidthVector`] pairs two such buffers, one holding element
//! data and one holding the validity bitmap, and the typed vectors in [`typed`] expose
//! it for a single primitive type each.
//!
//! Callers that only know the element type at runtime go through [`AnyVector`] and the
//! [`Vector`] trait, exchanging [`Value`]s.

pub mod extensible_buffer;
pub mod fixed_width;
pub mod logical_type;
pub mod typed;
pub mod value;
pub mod vector;

pub use extensible_buffer::ExtensibleBuffer;
pub use fixed_width::FixedWidthVector;
pub use logical_type::LogicalType;
pub use typed::{
    AnyVector, ByteVector, DoubleVector, FloatVector, IntVector, LongVector, ShortVector,
};
pub use value::Value;
pub use vector::{FieldNode, Vector};
