//! Clamps floating point samples and packs them into fixed width integers.
//!
//! Every quantizer follows the same formula: clamp to `[-1.0, 1.0]`, scale by the
//! largest positive value of the target width and truncate toward zero. This keeps
//! the output symmetric, so `-1.0` maps to `-32767` and not to `i16::MIN`.
//!
//! Encoded samples are always written little-endian.
use num_traits::{AsPrimitive, Float};

/// Floating point sample types the encoder accepts.
pub trait Sample: Float + AsPrimitive<f64> + Send + Sync {}

impl Sample for f32 {}

impl Sample for f64 {}

/// Writes a single quantized sample into its slot of the output stream.
pub(crate) trait Quantizer {
    /// Size of one encoded sample in bytes.
    const WIDTH: usize;

    /// `out` must be exactly `WIDTH` bytes long.
    fn write<S: Sample>(sample: S, out: &mut [u8]);
}

/// Signed 8 bit samples.
pub(crate) struct Pcm8;

/// Signed 16 bit little-endian samples.
pub(crate) struct Pcm16;

impl Quantizer for Pcm8 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn write<S: Sample>(sample: S, out: &mut [u8]) {
        out[0] = quantize_i8(sample).to_le_bytes()[0];
    }
}

impl Quantizer for Pcm16 {
    const WIDTH: usize = 2;

    #[inline(always)]
    fn write<S: Sample>(sample: S, out: &mut [u8]) {
        out.copy_from_slice(&quantize_i16(sample).to_le_bytes());
    }
}

/// Clamps the sample and scales it to `[-max, max]`. NaN stays NaN and
/// becomes silence on the integer cast.
#[inline(always)]
fn scale<S: Sample>(sample: S, max: f64) -> f64 {
    let value: f64 = sample.as_();
    value.clamp(-1.0, 1.0) * max
}

/// Quantizes a sample to a signed 8 bit integer in `[-127, 127]`.
#[inline(always)]
pub(crate) fn quantize_i8<S: Sample>(sample: S) -> i8 {
    scale(sample, f64::from(i8::MAX)) as i8
}

/// Quantizes a sample to a signed 16 bit integer in `[-32767, 32767]`.
#[inline(always)]
pub(crate) fn quantize_i16<S: Sample>(sample: S) -> i16 {
    scale(sample, f64::from(i16::MAX)) as i16
}
