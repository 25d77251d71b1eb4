//! Common types and utilities shared across the reader pipeline.
//!
//! This module provides the unified error type and the format sniffer used by
//! the dispatcher before either pipeline runs.

// Submodule declarations
pub mod detection;
pub mod error;

// Re-exports for convenience
pub use detection::{FileKind, classify};
pub use error::{Error, Result};
