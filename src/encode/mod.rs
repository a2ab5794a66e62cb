//! Output-container assembly.

/// Frame-by-frame output assembler over the codec's frame-writer.
pub mod assembler;
