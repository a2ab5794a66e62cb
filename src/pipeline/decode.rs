use std::sync::mpsc;
use std::thread;

use crate::decode::compositor::{CompositedFrame, FrameCompositor};
use crate::decode::reader::parse_gif;
use crate::foundation::core::ImageMetadata;
use crate::foundation::error::{LoopcutError, LoopcutResult};
use crate::pipeline::PipelineOpts;

/// Messages emitted by the decode producer, in a fixed protocol: exactly one
/// [`DecodeEvent::Metadata`] first, then one [`DecodeEvent::Frame`] per frame
/// in strictly increasing index order. A fatal error emits one
/// [`DecodeEvent::Failed`] and ends the stream; a parse failure emits it with
/// no preceding metadata.
#[derive(Debug)]
pub enum DecodeEvent {
    /// Canvas metadata, sent once before any frame.
    Metadata(ImageMetadata),
    /// The next composited frame, ownership transferred to the receiver.
    Frame(CompositedFrame),
    /// Terminal failure; no further events follow.
    Failed(LoopcutError),
}

/// Handle to a running decode pipeline.
///
/// The producer thread parses the container and composites frames to
/// completion independently of the consumer, blocking only on the bounded
/// channel. Frame 0 is available for display while later frames are still
/// being produced. Dropping the handle cancels the run: the channel closes,
/// the producer's next send fails, and the thread exits without surfacing
/// partial output.
#[derive(Debug)]
pub struct DecodePipeline {
    events: Option<mpsc::Receiver<DecodeEvent>>,
    producer: Option<thread::JoinHandle<()>>,
}

impl DecodePipeline {
    /// Start decoding `bytes` on a producer thread.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn spawn(bytes: Vec<u8>, opts: &PipelineOpts) -> Self {
        let (tx, rx) = mpsc::sync_channel(opts.channel_capacity.max(1));
        let producer = thread::spawn(move || produce(bytes, tx));
        Self {
            events: Some(rx),
            producer: Some(producer),
        }
    }

    /// Block for the next event; `None` once the stream has ended.
    pub fn recv(&self) -> Option<DecodeEvent> {
        self.events.as_ref().and_then(|rx| rx.recv().ok())
    }

    /// Non-blocking variant of [`DecodePipeline::recv`]; `None` when no event
    /// is ready yet or the stream has ended.
    pub fn try_recv(&self) -> Option<DecodeEvent> {
        self.events.as_ref().and_then(|rx| rx.try_recv().ok())
    }
}

impl Drop for DecodePipeline {
    fn drop(&mut self) {
        // Closing the channel is the cancellation signal: the producer's next
        // send fails and it exits, so the join cannot hang.
        drop(self.events.take());
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}

fn produce(bytes: Vec<u8>, tx: mpsc::SyncSender<DecodeEvent>) {
    let decoded = match parse_gif(&bytes) {
        Ok(decoded) => decoded,
        Err(err) => {
            let _ = tx.send(DecodeEvent::Failed(err));
            return;
        }
    };
    let metadata = decoded.metadata;
    if tx.send(DecodeEvent::Metadata(metadata)).is_err() {
        return;
    }

    let mut compositor = FrameCompositor::new(metadata.width, metadata.height);
    for raw in &decoded.frames {
        match compositor.composite_next(raw) {
            Ok(frame) => {
                if tx.send(DecodeEvent::Frame(frame)).is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(DecodeEvent::Failed(err));
                return;
            }
        }
    }
}

/// Parse and composite a whole file synchronously on the calling thread.
///
/// Convenience for callers that do not need streaming; the result is
/// identical to collecting a [`DecodePipeline`] run.
pub fn decode_frames(bytes: &[u8]) -> LoopcutResult<(ImageMetadata, Vec<CompositedFrame>)> {
    let decoded = parse_gif(bytes)?;
    let mut compositor = FrameCompositor::new(decoded.metadata.width, decoded.metadata.height);
    let mut frames = Vec::with_capacity(decoded.frames.len());
    for raw in &decoded.frames {
        frames.push(compositor.composite_next(raw)?);
    }
    Ok((decoded.metadata, frames))
}
