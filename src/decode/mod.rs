//! Container parsing and disposal compositing.

/// Disposal-method state machine producing full-canvas frames.
pub mod compositor;
/// Codec adapter: whole-buffer GIF parsing into raw frame records.
pub mod reader;
