//! Encoder errors.
use thiserror::Error;

/// Errors thrown by the encoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncoderError {
    /// The sample buffer is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The requested bit depth is not supported.
    #[error("unsupported format: {0}-bit samples")]
    UnsupportedFormat(u16),
    /// The output buffer is too small.
    #[error("output buffer is too small: {required} bytes required, {available} available")]
    BufferTooSmall {
        /// Bytes needed for the encoded stream.
        required: usize,
        /// Bytes provided by the caller.
        available: usize,
    },
}
