use std::sync::mpsc;
use std::thread;

use crate::decode::compositor::CompositedFrame;
use crate::edit::marks::{FrameMarks, build_encode_sequence};
use crate::encode::assembler::EncodeAssembler;
use crate::foundation::core::ImageMetadata;
use crate::foundation::error::{LoopcutError, LoopcutResult};
use crate::palette::table::PaletteTable;
use crate::pipeline::PipelineOpts;

/// Everything the encode consumer needs before the first frame arrives.
/// `metadata.frame_count` is the surviving-frame count, not the source count.
#[derive(Clone, Debug)]
pub struct EncodeHeader {
    /// Output canvas metadata with the post-edit frame count.
    pub metadata: ImageMetadata,
    /// Shared global color table for frames classified as global at decode
    /// time; `None` when every frame carries a local table.
    pub global_palette: Option<PaletteTable>,
}

/// Handle to a running encode pipeline.
///
/// The caller is the producer: it sends frames in their final order and each
/// one is assembled synchronously on arrival — there is no reordering buffer.
/// Once the declared frame count has been written the consumer emits exactly
/// one output-buffer message, returned by [`EncodePipeline::finish`].
/// Dropping the handle before `finish` abandons the run; the partially
/// filled buffer is discarded and never surfaced.
#[derive(Debug)]
pub struct EncodePipeline {
    frames: Option<mpsc::SyncSender<(CompositedFrame, u16)>>,
    output: mpsc::Receiver<LoopcutResult<Vec<u8>>>,
    consumer: Option<thread::JoinHandle<()>>,
}

impl EncodePipeline {
    /// Start an encode consumer for `header` on its own thread.
    pub fn spawn(header: EncodeHeader, opts: &PipelineOpts) -> Self {
        let (frame_tx, frame_rx) = mpsc::sync_channel(opts.channel_capacity.max(1));
        let (out_tx, out_rx) = mpsc::sync_channel(1);
        let consumer = thread::spawn(move || consume(header, frame_rx, out_tx));
        Self {
            frames: Some(frame_tx),
            output: out_rx,
            consumer: Some(consumer),
        }
    }

    /// Send the next frame and its effective delay, transferring ownership of
    /// the bitmap to the consumer.
    ///
    /// Fails with a pipeline error when the consumer has already stopped
    /// (typically because an earlier frame failed to encode); the underlying
    /// cause is reported by [`EncodePipeline::finish`].
    pub fn send_frame(&self, frame: CompositedFrame, delay_cs: u16) -> LoopcutResult<()> {
        let tx = self
            .frames
            .as_ref()
            .ok_or_else(|| LoopcutError::pipeline("encode pipeline already finished"))?;
        tx.send((frame, delay_cs))
            .map_err(|_| LoopcutError::pipeline("encode consumer is not accepting frames"))
    }

    /// Close the frame stream and wait for the single output message: the
    /// finished container bytes, or the error that aborted the consumer.
    pub fn finish(mut self) -> LoopcutResult<Vec<u8>> {
        drop(self.frames.take());
        let result = self.output.recv().map_err(|_| {
            LoopcutError::pipeline("encode consumer exited without producing output")
        });
        if let Some(handle) = self.consumer.take() {
            let _ = handle.join();
        }
        result?
    }
}

impl Drop for EncodePipeline {
    fn drop(&mut self) {
        drop(self.frames.take());
        if let Some(handle) = self.consumer.take() {
            let _ = handle.join();
        }
    }
}

fn consume(
    header: EncodeHeader,
    frames: mpsc::Receiver<(CompositedFrame, u16)>,
    output: mpsc::SyncSender<LoopcutResult<Vec<u8>>>,
) {
    let mut assembler =
        match EncodeAssembler::begin(&header.metadata, header.global_palette.as_ref()) {
            Ok(assembler) => assembler,
            Err(err) => {
                let _ = output.send(Err(err));
                return;
            }
        };

    while !assembler.is_complete() {
        // A closed channel before the declared count means the producer
        // abandoned the run; the partial buffer is dropped, never surfaced.
        let Ok((frame, delay_cs)) = frames.recv() else {
            return;
        };
        if let Err(err) = assembler.add_frame(&frame, delay_cs) {
            let _ = output.send(Err(err));
            return;
        }
    }

    let _ = output.send(assembler.finalize());
}

/// Re-encode the surviving frames of an edited animation.
///
/// Builds the drop-merged `(frame, effective delay)` sequence first, so
/// [`LoopcutError::EmptySequence`] is reported before any pipeline or output
/// buffer exists, then streams the survivors through an [`EncodePipeline`].
/// The output global table is the palette of the first surviving frame that
/// used the source's global table.
#[tracing::instrument(skip_all, fields(frames = frames.len()))]
pub fn encode_edited(
    metadata: &ImageMetadata,
    frames: &[CompositedFrame],
    marks: &FrameMarks,
    opts: &PipelineOpts,
) -> LoopcutResult<Vec<u8>> {
    let sequence = build_encode_sequence(frames, marks)?;
    let global_palette = sequence
        .iter()
        .find(|(frame, _)| frame.palette_is_global)
        .map(|(frame, _)| frame.palette.clone());
    let metadata = ImageMetadata {
        frame_count: sequence.len(),
        ..*metadata
    };

    let pipeline = EncodePipeline::spawn(
        EncodeHeader {
            metadata,
            global_palette,
        },
        opts,
    );
    for (frame, delay_cs) in sequence {
        if pipeline.send_frame(frame.clone(), delay_cs).is_err() {
            // Consumer stopped early; finish() surfaces its error.
            break;
        }
    }
    pipeline.finish()
}
