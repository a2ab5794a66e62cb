use serde::{Deserialize, Serialize};

use crate::foundation::error::{LoopcutError, LoopcutResult};

/// Bytes per RGBA pixel in composited bitmaps.
pub const RGBA_BYTES: usize = 4;

/// Canvas-level animation metadata, written once from the container header
/// and immutable for the lifetime of a decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Canvas width in pixels.
    pub width: u16,
    /// Canvas height in pixels.
    pub height: u16,
    /// Number of frames in the animation.
    pub frame_count: usize,
    /// Loop count from the container; `0` means "loop forever".
    pub loop_count: u16,
}

impl ImageMetadata {
    /// Construct metadata, validating that the canvas is non-degenerate.
    pub fn new(
        width: u16,
        height: u16,
        frame_count: usize,
        loop_count: u16,
    ) -> LoopcutResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoopcutError::validation(
                "canvas dimensions must be positive",
            ));
        }
        Ok(Self {
            width,
            height,
            frame_count,
            loop_count,
        })
    }

    /// Length in bytes of one full-canvas RGBA bitmap.
    pub fn bitmap_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * RGBA_BYTES
    }
}
