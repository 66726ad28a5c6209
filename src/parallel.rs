//! Splits large encodes across the rayon thread pool.
//!
//! The output is cut into chunks of whole frames. Every chunk is filled by the same
//! layout function the serial encoder uses, fed with the matching range of each
//! input channel, so the produced stream is byte-identical to `encode()`.
use log::{debug, trace};
use rayon::prelude::*;

use crate::encoder::Plan;
use crate::{BitDepth, EncoderError, Sample};

/// Inputs shorter than this are encoded on the calling thread.
const MIN_PARALLEL_FRAMES: usize = 1 << 16;
/// Number of frames a single task encodes.
const FRAMES_PER_TASK: usize = 1 << 14;

/// Parallel version of `encode()`.
///
/// # Arguments
/// * `samples`   - Planar input, one slice per channel. All channels must have the same length.
/// * `bit_depth` - Target precision.
///
pub fn encode_parallel<S: Sample, C: AsRef<[S]>>(
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

/// Parallel version of `encode_into()`.
///
/// Returns the number of bytes written.
///
/// # Arguments
/// * `samples`   - Planar input, one slice per channel. All channels must have the same length.
/// * `bit_depth` - Target precision.
/// * `out`       - Output buffer. Must hold at least `encoded_len()` bytes.
///
pub fn encode_into_parallel<S: Sample, C: AsRef<[S]>>(
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

fn run<S: Sample>(plan: &Plan<'_, S>, bit_depth: BitDepth, out: &mut [u8]) {
    debug!(
        "Encoding {} frames as {:?} {}-bit PCM in parallel",
        plan.frames,
        plan.channels,
        bit_depth.bits()
    );

    if plan.frames < MIN_PARALLEL_FRAMES {
        let layout = plan.layout(bit_depth);
        layout(&plan.inputs, out);
    } else {
        split(plan, bit_depth, out, FRAMES_PER_TASK);
    }
}

/// Encodes `plan` in tasks of `frames_per_task` frames. `out` is exactly `encoded_len()` long.
fn split<S: Sample>(plan: &Plan<'_, S>, bit_depth: BitDepth, out: &mut [u8], frames_per_task: usize) {
    let layout = plan.layout(bit_depth);
    let frame_bytes = plan.channels.count() * bit_depth.bytes_per_sample();

    trace!(
        "Splitting {} frames into {} tasks",
        plan.frames,
        (plan.frames + frames_per_task - 1) / frames_per_task
    );

    out.par_chunks_mut(frames_per_task * frame_bytes)
        .enumerate()
        .for_each(|(task, chunk)| {
            let start = task * frames_per_task;
            let end = start + chunk.len() / frame_bytes;
            let inputs: Vec<&[S]> = plan
                .inputs
                .iter()
                .map(|input| &input[start..end])
                .collect();
            layout(&inputs, chunk);
        });
}
