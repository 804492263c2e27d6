//! # Vellum: growable byte buffers and fixed-width columnar vectors
//!
//! Vellum provides the lowest layer of a columnar data engine: raw byte buffers that
//! grow on demand, a validity bitmap per column, and typed vectors of fixed-width
//! primitives assembled from the two.
//!
//! ## Module Organization
//!
//! * [`common`] - Error types and the validation configuration
//! * [`memory`] - The allocator and its reference-counted memory regions
//! * [`vector`] - Extensible buffers, typed vectors and page interop
//!
//! ### Support Modules
//!
//! * [`support::bytes`] - Aligned byte storage and bit addressing helpers
//!
//! ## Getting Started
//!
//! ```
//! use vellum::common::ValidationConfig;
//! use vellum::memory::BufferAllocator;
//! use vellum::vector::{IntVector, Vector};
//!
//! let allocator = BufferAllocator::unlimited();
//! let mut ints = IntVector::new(&allocator, "ints", true, ValidationConfig::default());
//! ints.write_int(17).unwrap();
//! ints.write_null().unwrap();
//! assert_eq!(ints.get_int(0).unwrap(), 17);
//! assert!(ints.is_null(1));
//! ```

pub use vellum_common as common;
pub use vellum_memory as memory;
pub use vellum_vector as vector;

pub mod support {
    pub use vellum_bytes as bytes;
}
