/// Convenience result type used across loopcut.
pub type LoopcutResult<T> = Result<T, LoopcutError>;

/// Top-level error taxonomy used by the decode, edit, and encode APIs.
///
/// Every fatal condition aborts the pipeline instance that produced it and is
/// reported exactly once to the caller; there is no automatic retry, since the
/// source bytes do not change between attempts.
#[derive(thiserror::Error, Debug)]
pub enum LoopcutError {
    /// Codec-level parse failure: corrupt header, truncated data, bad block.
    #[error("malformed container: {0}")]
    MalformedContainer(#[from] gif::DecodingError),

    /// A restore-to-previous disposal references a restore point that does
    /// not exist. Only a malformed file whose first frame declares
    /// restore-to-previous can produce this.
    #[error("frame {frame} applies restore-to-previous but no restore point exists")]
    NoRestorePoint {
        /// Index of the frame whose composite step failed.
        frame: usize,
    },

    /// A pixel's color has no exact entry in the frame's palette at encode
    /// time. The encoder performs no nearest-color fallback.
    #[error("color #{r:02x}{g:02x}{b:02x} has no exact palette entry")]
    ColorNotInPalette {
        /// Red component of the unmatched color.
        r: u8,
        /// Green component of the unmatched color.
        g: u8,
        /// Blue component of the unmatched color.
        b: u8,
    },

    /// Every frame is marked deleted at export time.
    #[error("every frame is marked deleted; nothing to encode")]
    EmptySequence,

    /// Codec-level serialization failure while writing the output container.
    #[error("encode error: {0}")]
    Encode(#[from] gif::EncodingError),

    /// A pipeline stage disconnected or misbehaved (consumer dropped, thread
    /// panicked, message out of protocol).
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Invalid caller-provided data (dimensions, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopcutError {
    /// Build a [`LoopcutError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Build a [`LoopcutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
