#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
//! Converts planar floating point audio into interleaved PCM byte streams.
//!
//! Decoders usually hand out audio as one float vector per channel, while playback
//! APIs expect a single buffer of fixed width integers with the channels interleaved
//! frame by frame. This crate performs that conversion:
//!
//! * Mono and stereo output (any further channels are ignored)
//! * Signed 8 bit and signed 16 bit samples
//! * `f32` and `f64` input
//! * Input is clamped to `[-1.0, 1.0]` and truncated toward zero
//! * Samples are always stored little-endian, independent of the host platform
//!
//! The encoder is a pure function: it owns no state, performs no I/O and can be
//! called from any number of threads at once. With the `parallel` feature large
//! buffers can additionally be split across the rayon thread pool.
//!
//! ```
//! use pcm_native::{encode, BitDepth};
//!
//! let left = [1.0_f32, -1.0];
//! let right = [-1.0_f32, 1.0];
//! let pcm = encode(&[&left[..], &right[..]], BitDepth::Sixteen).unwrap();
//!
//! assert_eq!(pcm, [0xFF, 0x7F, 0x01, 0x80, 0x01, 0x80, 0xFF, 0x7F]);
//! ```
//!
pub use buffer::*;
pub use encoder::{encode, encode_into, encoded_len};
pub use error::*;
pub use format::*;
#[cfg(feature = "parallel")]
pub use parallel::*;
pub use quantize::Sample;

mod buffer;
mod encoder;
mod error;
mod format;
#[cfg(feature = "parallel")]
mod parallel;
mod quantize;
