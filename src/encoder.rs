//! Implements the PCM encoder.
//!
//! The encoder turns planar float channels into a single interleaved byte stream.
//! The layout (mono or stereo) and the sample width are resolved once per call into
//! a monomorphized layout function, so the per-sample loop never branches on either.
use log::{debug, warn};

use crate::quantize::{Pcm16, Pcm8, Quantizer};
use crate::{BitDepth, Channels, EncoderError, Sample};

/// Writes `frames` interleaved frames of the given planar inputs into `out`.
///
/// `out` must hold exactly `frames * inputs.len() * width` bytes.
pub(crate) type Layout<S> = fn(inputs: &[&[S]], out: &mut [u8]);

/// The validated view of a sample buffer that an encode operates on.
pub(crate) struct Plan<'a, S> {
    pub(crate) channels: Channels,
    /// The participating channels only, at most two.
    pub(crate) inputs: Vec<&'a [S]>,
    pub(crate) frames: usize,
}

impl<'a, S: Sample> Plan<'a, S> {
    /// Validates the planar input.
    ///
    /// Returns `None` when there is no channel at all, which encodes to an empty stream.
    pub(crate) fn new<C: AsRef<[S]>>(samples: &'a [C]) -> Result<Option<Self>, EncoderError> {
        let first = match samples.first() {
            Some(first) => first.as_ref(),
            None => return Ok(None),
        };
        let frames = first.len();

        if let Some((index, len)) = samples
            .iter()
            .map(|channel| channel.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != frames)
        {
            return Err(EncoderError::InvalidInput(format!(
                "channel {} has {} samples, channel 0 has {}",
                index, len, frames
            )));
        }

        let channels = Channels::from_count(samples.len())?;
        if samples.len() > channels.count() {
            warn!(
                "Only the first {} of {} channels are encoded",
                channels.count(),
                samples.len()
            );
        }

        let inputs = samples
            .iter()
            .take(channels.count())
            .map(|channel| channel.as_ref())
            .collect();

        Ok(Some(Self {
            channels,
            inputs,
            frames,
        }))
    }

    /// Size of the encoded stream in bytes.
    pub(crate) fn encoded_len(&self, bit_depth: BitDepth) -> usize {
        self.frames * self.channels.count() * bit_depth.bytes_per_sample()
    }

    pub(crate) fn layout(&self, bit_depth: BitDepth) -> Layout<S> {
        select_layout(self.channels, bit_depth)
    }
}

/// Picks the layout function for the given topology and depth.
pub(crate) fn select_layout<S: Sample>(channels: Channels, bit_depth: BitDepth) -> Layout<S> {
    match (channels, bit_depth) {
        (Channels::Mono, BitDepth::Eight) => interleave_mono::<Pcm8, S>,
        (Channels::Mono, BitDepth::Sixteen) => interleave_mono::<Pcm16, S>,
        (Channels::Stereo, BitDepth::Eight) => interleave_stereo::<Pcm8, S>,
        (Channels::Stereo, BitDepth::Sixteen) => interleave_stereo::<Pcm16, S>,
    }
}

fn interleave_mono<Q: Quantizer, S: Sample>(inputs: &[&[S]], out: &mut [u8]) {
    out.chunks_exact_mut(Q::WIDTH)
        .zip(inputs[0].iter())
        .for_each(|(slot, &sample)| Q::write(sample, slot));
}

fn interleave_stereo<Q: Quantizer, S: Sample>(inputs: &[&[S]], out: &mut [u8]) {
    let left = inputs[0];
    let right = inputs[1];

    out.chunks_exact_mut(2 * Q::WIDTH)
        .zip(left.iter().zip(right.iter()))
        .for_each(|(frame, (&l, &r))| {
            let (l_slot, r_slot) = frame.split_at_mut(Q::WIDTH);
            Q::write(l, l_slot);
            Q::write(r, r_slot);
        });
}

/// Returns the size in bytes `encode()` would produce for the given input.
///
/// # Arguments
/// * `samples`   - Planar input, one slice per channel.
/// * `bit_depth` - Target precision.
///
pub fn encoded_len<S: Sample, C: AsRef<[S]>>(
    samples: &[C],
    bit_depth: BitDepth,
) -> Result<usize, EncoderError> {
    Ok(Plan::new(samples)?
        .map(|plan| plan.encoded_len(bit_depth))
        .unwrap_or(0))
}

/// Encodes planar float samples into an interleaved little-endian PCM stream.
///
/// A single channel is encoded as mono. Two or more channels are encoded as
/// stereo from the first two channels. Samples are clamped to `[-1.0, 1.0]`
/// before they are quantized.
///
/// Returns an empty stream if there are no channels or the channels are empty.
///
/// # Arguments
/// * `samples`   - Planar input, one slice per channel. All channels must have the same length.
/// * `bit_depth` - Target precision.
///
pub fn encode<S: Sample, C: AsRef<[S]>>(
    samples: &[C],
    bit_depth: BitDepth,
) -> Result<Vec<u8>, EncoderError> {
    let plan = match Plan::new(samples)? {
        Some(plan) => plan,
        None => return Ok(Vec::new()),
    };

    let mut out = vec![0_u8; plan.encoded_len(bit_depth)];
    run(&plan, bit_depth, &mut out);
    Ok(out)
}

/// Encodes planar float samples into a caller provided buffer.
///
/// Behaves like `encode()`, but writes into `out` instead of allocating.
/// Nothing is written if the input is invalid or `out` is too small.
///
/// Returns the number of bytes written.
///
/// # Arguments
/// * `samples`   - Planar input, one slice per channel. All channels must have the same length.
/// * `bit_depth` - Target precision.
/// * `out`       - Output buffer. Must hold at least `encoded_len()` bytes.
///
pub fn encode_into<S: Sample, C: AsRef<[S]>>(
    samples: &[C],
    bit_depth: BitDepth,
    out: &mut [u8],
) -> Result<usize, EncoderError> {
    let plan = match Plan::new(samples)? {
        Some(plan) => plan,
        None => return Ok(0),
    };

    let required = plan.encoded_len(bit_depth);
    if out.len() < required {
        return Err(EncoderError::BufferTooSmall {
            required,
            available: out.len(),
        });
    }

    run(&plan, bit_depth, &mut out[..required]);
    Ok(required)
}

/// Runs the selected layout over the whole plan. `out` is exactly `encoded_len()` long.
fn run<S: Sample>(plan: &Plan<'_, S>, bit_depth: BitDepth, out: &mut [u8]) {
    debug!(
        "Encoding {} frames as {:?} {}-bit PCM",
        plan.frames,
        plan.channels,
        bit_depth.bits()
    );
    let layout = plan.layout(bit_depth);
    layout(&plan.inputs, out);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use nanorand::RNG;

    use super::*;
    use crate::quantize::{quantize_i16, quantize_i8};

    fn random_channel(rng: &mut nanorand::WyRand, len: usize) -> Vec<f32> {
        (0..len)
            .into_iter()
            .map(|_| rng.generate_range::<u32>(0, 50001) as f32 / 20000.0 - 1.25)
            .collect()
    }

    fn read_i16(bytes: &[u8], index: usize) -> i16 {
        i16::from_le_bytes([bytes[index * 2], bytes[index * 2 + 1]])
    }

    #[test]
    fn test_encode_mono_16() {
        let out = encode(&[vec![0.0_f32, 0.5, -1.0]], BitDepth::Sixteen).unwrap();

        assert_eq!(out.len(), 6);
        assert_eq!(&out[0..2], &0_i16.to_le_bytes());
        assert_eq!(&out[2..4], &16383_i16.to_le_bytes());
        assert_eq!(&out[4..6], &(-32767_i16).to_le_bytes());
    }

    #[test]
    fn test_encode_stereo_16() {
        let left = [1.0_f32, -1.0];
        let right = [-1.0_f32, 1.0];
        let out = encode(&[&left[..], &right[..]], BitDepth::Sixteen).unwrap();

        assert_eq!(out.len(), 8);
        assert_eq!(read_i16(&out, 0), 32767);
        assert_eq!(read_i16(&out, 1), -32767);
        assert_eq!(read_i16(&out, 2), -32767);
        assert_eq!(read_i16(&out, 3), 32767);
    }

    #[test]
    fn test_encode_mono_8() {
        let out = encode(&[vec![0.0_f64, 1.0, -1.0, 3.0]], BitDepth::Eight).unwrap();
        assert_eq!(out, vec![0x00, 0x7F, 0x81, 0x7F]);
    }

    #[test]
    fn test_encode_stereo_8() {
        let out = encode(&[vec![1.0_f32, 0.0], vec![-1.0_f32, 0.5]], BitDepth::Eight).unwrap();
        assert_eq!(out, vec![0x7F, 0x81, 0x00, 63]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let clamped = encode(&[vec![1.5_f32, -1.5]], BitDepth::Sixteen).unwrap();
        let limits = encode(&[vec![1.0_f32, -1.0]], BitDepth::Sixteen).unwrap();
        assert_eq!(clamped, limits);
    }

    #[test]
    fn test_empty_input() {
        let no_channels: [Vec<f32>; 0] = [];
        assert!(encode(&no_channels, BitDepth::Sixteen).unwrap().is_empty());

        let empty_mono: [Vec<f32>; 1] = [vec![]];
        assert!(encode(&empty_mono, BitDepth::Sixteen).unwrap().is_empty());

        let empty_stereo: [Vec<f32>; 2] = [vec![], vec![]];
        assert!(encode(&empty_stereo, BitDepth::Eight).unwrap().is_empty());
        assert_eq!(encoded_len(&empty_stereo, BitDepth::Eight).unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch() {
        let samples = [vec![0.0_f32, 0.1, 0.2], vec![0.0_f32, 0.1]];
        assert!(matches!(
            encode(&samples, BitDepth::Sixteen),
            Err(EncoderError::InvalidInput(_))
        ));

        let samples = [vec![0.0_f32, 0.1], vec![0.0_f32, 0.1, 0.2]];
        assert!(matches!(
            encode(&samples, BitDepth::Eight),
            Err(EncoderError::InvalidInput(_))
        ));
        assert!(matches!(
            encoded_len(&samples, BitDepth::Eight),
            Err(EncoderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extra_channels_are_dropped() {
        let left = vec![0.25_f32, -0.25];
        let right = vec![0.75_f32, -0.75];
        let extra = vec![1.0_f32, 1.0];

        let stereo = encode(&[&left, &right], BitDepth::Sixteen).unwrap();
        let surround = encode(&[&left, &right, &extra], BitDepth::Sixteen).unwrap();
        assert_eq!(stereo, surround);
        assert_eq!(surround.len(), 8);
    }

    #[test]
    fn test_extra_channel_length_is_checked() {
        let samples = [vec![0.0_f32; 4], vec![0.0_f32; 4], vec![0.0_f32; 3]];
        assert!(matches!(
            encode(&samples, BitDepth::Sixteen),
            Err(EncoderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mono_layout() {
        let mut rng = nanorand::WyRand::new_seed(42);
        let channel = random_channel(&mut rng, 1000);

        let out = encode(&[&channel], BitDepth::Sixteen).unwrap();
        assert_eq!(out.len(), channel.len() * 2);
        channel.iter().enumerate().for_each(|(k, &sample)| {
            assert_eq!(read_i16(&out, k), quantize_i16(sample), "sample {}", k);
        });

        let out = encode(&[&channel], BitDepth::Eight).unwrap();
        assert_eq!(out.len(), channel.len());
        channel.iter().enumerate().for_each(|(k, &sample)| {
            assert_eq!(out[k] as i8, quantize_i8(sample), "sample {}", k);
        });
    }

    #[test]
    fn test_stereo_layout() {
        let mut rng = nanorand::WyRand::new_seed(7);
        let left = random_channel(&mut rng, 1000);
        let right = random_channel(&mut rng, 1000);

        let out = encode(&[&left, &right], BitDepth::Sixteen).unwrap();
        assert_eq!(out.len(), left.len() * 4);
        (0..left.len()).into_iter().for_each(|i| {
            assert_eq!(read_i16(&out, 2 * i), quantize_i16(left[i]), "left {}", i);
            assert_eq!(read_i16(&out, 2 * i + 1), quantize_i16(right[i]), "right {}", i);
        });

        let out = encode(&[&left, &right], BitDepth::Eight).unwrap();
        assert_eq!(out.len(), left.len() * 2);
        (0..left.len()).into_iter().for_each(|i| {
            assert_eq!(out[2 * i] as i8, quantize_i8(left[i]), "left {}", i);
            assert_eq!(out[2 * i + 1] as i8, quantize_i8(right[i]), "right {}", i);
        });
    }

    #[test]
    fn test_idempotent() {
        let mut rng = nanorand::WyRand::new_seed(1337);
        let left = random_channel(&mut rng, 4096);
        let right = random_channel(&mut rng, 4096);

        let first = encode(&[&left, &right], BitDepth::Sixteen).unwrap();
        let second = encode(&[&left, &right], BitDepth::Sixteen).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_into() {
        let samples = [vec![1.0_f32, -1.0], vec![-1.0_f32, 1.0]];
        let mut out = vec![0xAA_u8; 10];

        let written = encode_into(&samples, BitDepth::Sixteen, &mut out).unwrap();
        assert_eq!(written, 8);
        assert_eq!(&out[..8], &encode(&samples, BitDepth::Sixteen).unwrap()[..]);
        assert_eq!(&out[8..], &[0xAA, 0xAA]);
    }

    #[test]
    fn test_encode_into_too_small() {
        let samples = [vec![0.5_f32; 3]];
        let mut out = vec![0xAA_u8; 5];

        assert_eq!(
            encode_into(&samples, BitDepth::Sixteen, &mut out),
            Err(EncoderError::BufferTooSmall {
                required: 6,
                available: 5
            })
        );
        assert!(out.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_encode_into_invalid_input_writes_nothing() {
        let samples = [vec![0.5_f32; 3], vec![0.5_f32; 2]];
        let mut out = vec![0xAA_u8; 16];

        assert!(matches!(
            encode_into(&samples, BitDepth::Sixteen, &mut out),
            Err(EncoderError::InvalidInput(_))
        ));
        assert!(out.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_encoded_len() {
        let samples = [vec![0.0_f32; 100], vec![0.0_f32; 100]];
        assert_eq!(encoded_len(&samples, BitDepth::Sixteen).unwrap(), 400);
        assert_eq!(encoded_len(&samples, BitDepth::Eight).unwrap(), 200);
        assert_eq!(encoded_len(&samples[..1], BitDepth::Sixteen).unwrap(), 200);
    }
}
