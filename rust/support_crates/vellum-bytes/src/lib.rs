//! Aligned, zero-initialised byte storage backing vellum memory regions,
//! together with the alignment and bit-sizing arithmetic shared by the buffer layer.

pub mod align;
pub mod buffer;

pub use buffer::AlignedByteVec;
