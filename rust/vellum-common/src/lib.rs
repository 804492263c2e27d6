//! Core definitions (errors, results and shared configuration), relied upon by all vellum-* crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::ValidationConfig;
pub use error::{Error, ErrorKind};
pub use result::Result;
