//! Producer/consumer streaming pipelines.
//!
//! Both directions are structured the same way: a single producer stage and a
//! single consumer stage connected by a bounded, ordered channel, running on
//! their own thread so decode/encode of large files never blocks the caller.
//! Buffer ownership moves with each message; a stage never touches a buffer
//! it has already sent.

/// Decode pipeline: codec parse + compositor producing ordered frame events.
pub mod decode;
/// Encode pipeline: caller-fed frames assembled into the output container.
pub mod encode;

/// Channel controls shared by both pipeline directions.
#[derive(Clone, Copy, Debug)]
pub struct PipelineOpts {
    /// Bounded channel capacity between producer and consumer, in frames.
    pub channel_capacity: usize,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            channel_capacity: 4,
        }
    }
}
