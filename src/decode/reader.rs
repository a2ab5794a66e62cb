use std::io::Cursor;

use crate::foundation::core::ImageMetadata;
use crate::foundation::error::LoopcutResult;
use crate::palette::table::PaletteTable;

/// Per-frame canvas-preparation instruction from the container.
///
/// The disposal method describes what happens to the shared canvas *after*
/// a frame has been shown, i.e. before the next frame is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// No disposal specified; the canvas keeps the frame's pixels.
    None,
    /// Keep the frame's pixels in place.
    Keep,
    /// Clear the frame's sub-rectangle back to transparent.
    Background,
    /// Restore the canvas to the most recent restore point.
    Previous,
    /// Reserved disposal value; treated as a no-op. The codec normalizes
    /// reserved disposal bytes before they reach this crate, so this variant
    /// only arises from descriptors built in code.
    Unknown,
}

impl Disposal {
    fn from_codec(dispose: gif::DisposalMethod) -> Self {
        match dispose {
            gif::DisposalMethod::Any => Disposal::None,
            gif::DisposalMethod::Keep => Disposal::Keep,
            gif::DisposalMethod::Background => Disposal::Background,
            gif::DisposalMethod::Previous => Disposal::Previous,
        }
    }
}

/// Per-frame record from the container, read-only to the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrameDescriptor {
    /// Left edge of the frame's sub-rectangle within the canvas.
    pub left: u16,
    /// Top edge of the frame's sub-rectangle within the canvas.
    pub top: u16,
    /// Sub-rectangle width in pixels.
    pub width: u16,
    /// Sub-rectangle height in pixels.
    pub height: u16,
    /// Whether the frame carries its own color table.
    pub has_local_palette: bool,
    /// Transparent palette index, if the frame declares one.
    pub transparent: Option<u8>,
    /// Whether the frame was stored interlaced. The codec hands the core
    /// de-interlaced pixel data either way; this flag is informational.
    pub interlaced: bool,
    /// Frame delay in centiseconds.
    pub delay_cs: u16,
    /// Disposal method applied to the canvas after this frame.
    pub disposal: Disposal,
}

/// One frame as delivered by the codec: descriptor, indexed pixel block for
/// the sub-rectangle, and the effective palette the indices refer to.
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// The frame's container record.
    pub descriptor: RawFrameDescriptor,
    /// Indexed pixels, one byte per pixel, row-major over the sub-rectangle.
    pub pixels: Vec<u8>,
    /// The palette the indices resolve against (local, or the global table).
    pub palette: PaletteTable,
    /// `true` when `palette` is the file's global table.
    pub palette_is_global: bool,
}

/// A fully parsed container: header metadata plus every frame's raw data.
#[derive(Clone, Debug)]
pub struct DecodedGif {
    /// Canvas metadata from the header.
    pub metadata: ImageMetadata,
    /// The file's global color table, if present.
    pub global_palette: Option<PaletteTable>,
    /// All frames in container order.
    pub frames: Vec<RawFrame>,
}

/// Parse a complete GIF byte buffer via the codec.
///
/// The container is not incrementally parseable, so the full buffer is
/// required up front; frame pixel blocks come back de-interlaced and in
/// indexed form, ready for the compositor.
///
/// Fails with [`crate::LoopcutError::MalformedContainer`] on any codec-level
/// parse error, with no partial result.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse_gif(bytes: &[u8]) -> LoopcutResult<DecodedGif> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(Cursor::new(bytes))?;

    let width = decoder.width();
    let height = decoder.height();
    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite => 0,
        gif::Repeat::Finite(n) => n,
    };
    let global_palette = decoder.global_palette().map(PaletteTable::from_raw);

    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame()? {
        let palette = match (frame.palette.as_deref(), &global_palette) {
            (Some(local), _) => PaletteTable::from_raw(local),
            (None, Some(global)) => global.clone(),
            (None, None) => PaletteTable::default(),
        };
        frames.push(RawFrame {
            descriptor: RawFrameDescriptor {
                left: frame.left,
                top: frame.top,
                width: frame.width,
                height: frame.height,
                has_local_palette: frame.palette.is_some(),
                transparent: frame.transparent,
                interlaced: frame.interlaced,
                delay_cs: frame.delay,
                disposal: Disposal::from_codec(frame.dispose),
            },
            pixels: frame.buffer.to_vec(),
            palette_is_global: frame.palette.is_none(),
            palette,
        });
    }

    let metadata = ImageMetadata::new(width, height, frames.len(), loop_count)?;
    Ok(DecodedGif {
        metadata,
        global_palette,
        frames,
    })
}
