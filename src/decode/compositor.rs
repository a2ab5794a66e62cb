use crate::decode::reader::{Disposal, RawFrame, RawFrameDescriptor};
use crate::foundation::core::RGBA_BYTES;
use crate::foundation::error::{LoopcutError, LoopcutResult};
use crate::palette::table::{PaletteTable, unpack};

/// A full-canvas RGBA bitmap reconstructed from a partial frame update plus
/// the canvas state its predecessors left behind.
///
/// Each value is a frozen, independent copy: later compositing steps never
/// alter an already-emitted frame, so ownership can move freely across
/// pipeline stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositedFrame {
    /// 0-based position in the animation.
    pub index: usize,
    /// Frame delay in centiseconds.
    pub delay_cs: u16,
    /// Full-canvas RGBA8 pixels, `width * height * 4` bytes.
    pub bitmap: Vec<u8>,
    /// `true` when `palette` is the file's global table.
    pub palette_is_global: bool,
    /// The palette this frame's pixels were resolved against.
    pub palette: PaletteTable,
    /// The frame's transparent palette index, if any; carried through so the
    /// encoder can map transparent canvas pixels back to it.
    pub transparent: Option<u8>,
}

/// The disposal-method state machine that turns per-frame partial updates
/// into full-canvas bitmaps.
///
/// Frames are *not* independent images: each is a diff applied to the canvas
/// left by its predecessor, so [`FrameCompositor::composite_next`] must be
/// called once per frame in strictly increasing order, and a run cannot be
/// restarted from the middle. A fresh compositor is created per file.
#[derive(Debug)]
pub struct FrameCompositor {
    width: u16,
    height: u16,
    /// The persistent shared canvas, mutated in place across frames.
    canvas: Vec<u8>,
    /// Snapshot of the canvas after the most recent non-`Previous` frame.
    restore_point: Option<Vec<u8>>,
    previous: Option<RawFrameDescriptor>,
    next_index: usize,
}

impl FrameCompositor {
    /// Create a compositor for a canvas of the given size, starting from a
    /// fully transparent canvas.
    pub fn new(width: u16, height: u16) -> Self {
        let canvas = vec![0u8; usize::from(width) * usize::from(height) * RGBA_BYTES];
        Self {
            width,
            height,
            canvas,
            restore_point: None,
            previous: None,
            next_index: 0,
        }
    }

    /// Number of frames composited so far.
    pub fn frames_composited(&self) -> usize {
        self.next_index
    }

    /// Composite the next frame in sequence.
    ///
    /// Applies the previous frame's disposal to the shared canvas, paints the
    /// new frame's sub-rectangle (transparent-index pixels leave the canvas
    /// untouched), and emits a defensive full-canvas copy.
    ///
    /// Fails with [`LoopcutError::NoRestorePoint`] when the previous frame
    /// declared restore-to-previous but no restore point exists, which only a
    /// file whose first frame declares it can produce. No further frames can
    /// be composited after a failure.
    pub fn composite_next(&mut self, raw: &RawFrame) -> LoopcutResult<CompositedFrame> {
        if let Some(prev) = self.previous {
            match prev.disposal {
                Disposal::None | Disposal::Keep | Disposal::Unknown => {}
                Disposal::Background => self.clear_rect(&prev),
                Disposal::Previous => {
                    let restore = self.restore_point.as_ref().ok_or(
                        LoopcutError::NoRestorePoint {
                            frame: self.next_index - 1,
                        },
                    )?;
                    self.canvas.copy_from_slice(restore);
                }
            }
        }

        self.paint(raw);

        let bitmap = self.canvas.clone();
        // Restore-to-previous frames never become restore targets themselves,
        // which rules out restore-to-restore chains.
        if raw.descriptor.disposal != Disposal::Previous {
            self.restore_point = Some(bitmap.clone());
        }

        let frame = CompositedFrame {
            index: self.next_index,
            delay_cs: raw.descriptor.delay_cs,
            bitmap,
            palette_is_global: raw.palette_is_global,
            palette: raw.palette.clone(),
            transparent: raw.descriptor.transparent,
        };
        self.previous = Some(raw.descriptor);
        self.next_index += 1;
        Ok(frame)
    }

    /// Clear a descriptor's sub-rectangle (clipped to the canvas) back to
    /// fully transparent.
    fn clear_rect(&mut self, desc: &RawFrameDescriptor) {
        let (x0, y0, x1, y1) = self.clip(desc);
        let row_len = usize::from(self.width) * RGBA_BYTES;
        for y in y0..y1 {
            let start = y * row_len + x0 * RGBA_BYTES;
            let end = y * row_len + x1 * RGBA_BYTES;
            self.canvas[start..end].fill(0);
        }
    }

    /// Paint a frame's indexed pixel block onto the canvas at its offset.
    /// Transparent-index and out-of-range-index pixels are skipped.
    fn paint(&mut self, raw: &RawFrame) {
        let desc = &raw.descriptor;
        let (x0, y0, x1, y1) = self.clip(desc);
        let canvas_row = usize::from(self.width) * RGBA_BYTES;
        let block_row = usize::from(desc.width);

        for y in y0..y1 {
            let src_row = (y - usize::from(desc.top)) * block_row;
            for x in x0..x1 {
                let Some(&index) = raw.pixels.get(src_row + (x - usize::from(desc.left))) else {
                    continue;
                };
                if desc.transparent == Some(index) {
                    continue;
                }
                let Some(color) = raw.palette.color(index) else {
                    continue;
                };
                let (r, g, b) = unpack(color);
                let dst = y * canvas_row + x * RGBA_BYTES;
                self.canvas[dst] = r;
                self.canvas[dst + 1] = g;
                self.canvas[dst + 2] = b;
                self.canvas[dst + 3] = 255;
            }
        }
    }

    /// Intersect a descriptor's rectangle with the canvas, as
    /// `(x0, y0, x1, y1)` with exclusive upper bounds.
    fn clip(&self, desc: &RawFrameDescriptor) -> (usize, usize, usize, usize) {
        let x0 = usize::from(desc.left).min(usize::from(self.width));
        let y0 = usize::from(desc.top).min(usize::from(self.height));
        let x1 = (usize::from(desc.left) + usize::from(desc.width)).min(usize::from(self.width));
        let y1 = (usize::from(desc.top) + usize::from(desc.height)).min(usize::from(self.height));
        (x0, y0, x1.max(x0), y1.max(y0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/compositor.rs"]
mod tests;
