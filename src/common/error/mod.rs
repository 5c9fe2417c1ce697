//! Unified error types for the converter crate.
//!
//! The conversion core never fails; errors only come from the layers around
//! it (tokenizing raw markup, decoding page payloads, writing artifacts).

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
