use std::borrow::Cow;

use crate::decode::compositor::CompositedFrame;
use crate::foundation::core::{ImageMetadata, RGBA_BYTES};
use crate::foundation::error::LoopcutResult;
use crate::palette::table::PaletteTable;

/// Container overhead reserved per frame when sizing the output buffer:
/// graphic-control and image-descriptor blocks plus a worst-case local table.
const PER_FRAME_OVERHEAD: usize = 8 + 10 + 768 + 8;

/// Header, logical screen descriptor, worst-case global table, trailer.
const CONTAINER_OVERHEAD: usize = 6 + 7 + 768 + 32;

/// Drives the codec's frame-writer to assemble the output container.
///
/// The assembler always re-encodes full frames: every frame is written at
/// offset (0,0) with the full canvas size, trading file size for encoder
/// simplicity. Frames must be added in their final order; the assembler is a
/// sequential state machine and tracks a remaining-frame counter declared up
/// front by the metadata.
pub struct EncodeAssembler {
    encoder: gif::Encoder<Vec<u8>>,
    width: u16,
    height: u16,
    remaining: usize,
}

impl std::fmt::Debug for EncodeAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeAssembler")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl EncodeAssembler {
    /// Start a new container: pre-allocate the output buffer (canvas area x
    /// frame count plus fixed per-frame overhead, to bound reallocation) and
    /// write the header, loop count, and optional global color table.
    pub fn begin(
        metadata: &ImageMetadata,
        global_palette: Option<&PaletteTable>,
    ) -> LoopcutResult<Self> {
        let area = usize::from(metadata.width) * usize::from(metadata.height);
        let capacity =
            CONTAINER_OVERHEAD + metadata.frame_count * (area + PER_FRAME_OVERHEAD);
        let buffer = Vec::with_capacity(capacity);

        let global_raw = global_palette.map(PaletteTable::to_raw).unwrap_or_default();
        let mut encoder =
            gif::Encoder::new(buffer, metadata.width, metadata.height, &global_raw)?;
        encoder.set_repeat(if metadata.loop_count == 0 {
            gif::Repeat::Infinite
        } else {
            gif::Repeat::Finite(metadata.loop_count)
        })?;

        Ok(Self {
            encoder,
            width: metadata.width,
            height: metadata.height,
            remaining: metadata.frame_count,
        })
    }

    /// Encode one composited frame against its own palette and hand it to
    /// the codec's frame-serializer, full canvas at (0,0). Frames whose
    /// palette was local at decode time are written with a local table;
    /// global-palette frames rely on the table written by
    /// [`EncodeAssembler::begin`].
    ///
    /// A frame can hold unpainted (fully transparent) canvas pixels without
    /// declaring container transparency, which happens whenever a source
    /// frame covers a sub-rectangle and declares no transparent index. Such
    /// a frame gets a transparent slot appended to its palette and is
    /// written with a local table, so unpainted pixels survive a re-encode
    /// instead of matching an opaque color.
    ///
    /// Fails with [`crate::LoopcutError::ColorNotInPalette`] when a pixel
    /// has no exact palette entry, or when an unpainted pixel cannot get a
    /// transparent slot because the palette is already full; nothing is
    /// written to the container for a failed frame.
    ///
    /// # Panics
    ///
    /// Panics if called after the declared frame count has been written.
    pub fn add_frame(
        &mut self,
        frame: &CompositedFrame,
        effective_delay_cs: u16,
    ) -> LoopcutResult<()> {
        assert!(
            self.remaining > 0,
            "add_frame called after the declared frame count was written"
        );

        let needs_transparent_slot = frame.transparent.is_none()
            && frame
                .bitmap
                .chunks_exact(RGBA_BYTES)
                .any(|px| px[3] == 0);
        let (palette, transparent, force_local) =
            if needs_transparent_slot && frame.palette.len() < 256 {
                // Append a dedicated transparent slot; the frame switches to
                // a local table since the shared global one lacks the slot.
                let mut raw = frame.palette.to_raw();
                raw.extend_from_slice(&[0, 0, 0]);
                let table = PaletteTable::from_raw(&raw);
                let slot = (table.len() - 1) as u8;
                (Cow::Owned(table), Some(slot), true)
            } else {
                (Cow::Borrowed(&frame.palette), frame.transparent, false)
            };

        // Index the whole bitmap before touching the encoder so a palette
        // miss cannot leave a partially written frame behind.
        let indices = palette.to_index_stream_with_transparency(&frame.bitmap, transparent)?;

        let mut out = gif::Frame::default();
        out.left = 0;
        out.top = 0;
        out.width = self.width;
        out.height = self.height;
        out.delay = effective_delay_cs;
        // Every output frame repaints the full canvas, so each one clears the
        // canvas behind it; transparent pixels then replay as transparent
        // instead of exposing the previous frame.
        out.dispose = gif::DisposalMethod::Background;
        out.transparent = transparent;
        if force_local || !frame.palette_is_global {
            out.palette = Some(palette.to_raw());
        }
        out.buffer = Cow::Owned(indices);

        self.encoder.write_frame(&out)?;
        self.remaining -= 1;
        Ok(())
    }

    /// Whether every declared frame has been written.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Finish the container and return the output bytes, sized to exactly
    /// what the codec wrote.
    ///
    /// # Panics
    ///
    /// Panics if called before every declared frame has been written.
    pub fn finalize(self) -> LoopcutResult<Vec<u8>> {
        assert!(
            self.remaining == 0,
            "finalize called with {} frame(s) still outstanding",
            self.remaining
        );
        let buffer = self
            .encoder
            .into_inner()
            .map_err(gif::EncodingError::from)?;
        Ok(buffer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assembler.rs"]
mod tests;
