//! Shared primitives: error taxonomy and canvas-level metadata.

/// Canvas metadata and RGBA buffer helpers.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
