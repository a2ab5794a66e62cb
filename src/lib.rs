//! Loopcut is a frame-level editor for animated GIFs.
//!
//! It decodes a GIF into a sequence of fully-composited RGBA bitmaps, lets a
//! caller mark frames kept or dropped, and re-encodes the survivors into a
//! new valid GIF whose surviving frames absorb the timing of their dropped
//! neighbors. The bit-level codec (LZW, container parsing) is the `gif`
//! crate; this crate owns everything between the codec and the caller.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: [`parse_gif`] reads the whole byte buffer through the codec
//!    into raw per-frame records.
//! 2. **Composite**: [`FrameCompositor`] folds the disposal-method state
//!    machine over those records, emitting one frozen [`CompositedFrame`]
//!    per frame.
//! 3. **Edit**: [`FrameMarks`] tracks keep/drop flags;
//!    [`build_encode_sequence`] merges dropped frames' delays into their
//!    surviving neighbor.
//! 4. **Encode**: [`EncodeAssembler`] re-indexes each surviving bitmap
//!    against its own palette and drives the codec's frame-writer.
//!
//! Steps 1–2 and 4 each also run as a streaming pipeline
//! ([`DecodePipeline`], [`EncodePipeline`]): one producer and one consumer
//! joined by a bounded, ordered channel, so large files decode and encode
//! without blocking the interactive caller.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Strictly ordered compositing**: frames are diffs against the shared
//!   canvas; they are produced and consumed in index order, never skipped.
//! - **Frozen outputs**: every emitted bitmap is an independent copy whose
//!   ownership moves across the channel, never a view into shared state.
//! - **No storage I/O**: mark persistence goes through the injected
//!   [`MarkStore`] collaborator.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod decode;
mod edit;
mod encode;
mod foundation;
mod palette;
mod pipeline;

pub use decode::compositor::{CompositedFrame, FrameCompositor};
pub use decode::reader::{DecodedGif, Disposal, RawFrame, RawFrameDescriptor, parse_gif};
pub use edit::marks::{FrameMarks, MarkKey, MarkStore, MemoryMarkStore, build_encode_sequence};
pub use encode::assembler::EncodeAssembler;
pub use foundation::core::{ImageMetadata, RGBA_BYTES};
pub use foundation::error::{LoopcutError, LoopcutResult};
pub use palette::table::{PaletteTable, pack, unpack};
pub use pipeline::PipelineOpts;
pub use pipeline::decode::{DecodeEvent, DecodePipeline, decode_frames};
pub use pipeline::encode::{EncodeHeader, EncodePipeline, encode_edited};
