//! Owned input and output buffers.
//!
//! `SampleBuffer` is what a decoder hands over: planar float channels together with
//! their sample rate. `PcmBuffer` is what playback consumes: the interleaved bytes
//! plus the `PcmFormat` needed to interpret them.
use std::time::Duration;

use crate::encoder::{encode, Plan};
use crate::{BitDepth, Channels, EncoderError, PcmFormat, Sample};

/// Decoded, planar audio.
///
/// All channels are guaranteed to have the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer<S> {
    channels: Vec<Vec<S>>,
    sample_rate: u32,
}

impl<S: Sample> SampleBuffer<S> {
    /// Creates a new `SampleBuffer`.
    ///
    /// # Arguments
    /// * `channels`    - One sample vector per channel. Needs at least one channel.
    /// * `sample_rate` - Frames per second. Must not be zero.
    ///
    pub fn new(channels: Vec<Vec<S>>, sample_rate: u32) -> Result<Self, EncoderError> {
        if sample_rate == 0 {
            return Err(EncoderError::InvalidInput(
                "sample rate must not be zero".to_string(),
            ));
        }
        Channels::from_count(channels.len())?;
        Plan::new(&channels)?;

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Creates a single channel `SampleBuffer`.
    pub fn mono(samples: Vec<S>, sample_rate: u32) -> Result<Self, EncoderError> {
        Self::new(vec![samples], sample_rate)
    }

    /// Creates a two channel `SampleBuffer`.
    pub fn stereo(left: Vec<S>, right: Vec<S>, sample_rate: u32) -> Result<Self, EncoderError> {
        Self::new(vec![left, right], sample_rate)
    }

    /// The planar channels.
    pub fn channels(&self) -> &[Vec<S>] {
        &self.channels
    }

    /// Consumes the buffer and returns the planar channels.
    pub fn into_channels(self) -> Vec<Vec<S>> {
        self.channels
    }

    /// Number of samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Gets the sample rate the buffer was decoded with.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel topology of the encoded output.
    pub fn output_channels(&self) -> Channels {
        if self.channels.len() > 1 {
            Channels::Stereo
        } else {
            Channels::Mono
        }
    }

    /// The format an encode with the given depth produces.
    pub fn format(&self, bit_depth: BitDepth) -> PcmFormat {
        PcmFormat {
            channels: self.output_channels(),
            bit_depth,
            sample_rate: self.sample_rate,
        }
    }

    /// Encodes the buffer into interleaved PCM.
    ///
    /// See `encode()` for the layout of the produced stream.
    pub fn encode(&self, bit_depth: BitDepth) -> Result<PcmBuffer, EncoderError> {
        let data = encode(&self.channels, bit_depth)?;
        Ok(PcmBuffer {
            data,
            format: self.format(bit_depth),
        })
    }

    /// Encodes the buffer into interleaved PCM using all available worker threads.
    ///
    /// Produces the same stream as `encode()`.
    #[cfg(feature = "parallel")]
    pub fn encode_parallel(&self, bit_depth: BitDepth) -> Result<PcmBuffer, EncoderError> {
        let data = crate::parallel::encode_parallel(&self.channels, bit_depth)?;
        Ok(PcmBuffer {
            data,
            format: self.format(bit_depth),
        })
    }
}

/// Interleaved PCM bytes ready for playback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PcmBuffer {
    data: Vec<u8>,
    format: PcmFormat,
}

impl PcmBuffer {
    /// The encoded stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns the encoded stream.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Describes how `data()` is laid out.
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Size of the encoded stream in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the stream contains no frames.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of frames in the stream.
    pub fn frames(&self) -> usize {
        self.data.len() / self.format.bytes_per_frame()
    }

    /// Playback duration of the stream.
    pub fn duration(&self) -> Duration {
        let rate = u64::from(self.format.sample_rate);
        let frames = self.frames() as u64;
        Duration::from_secs(frames / rate)
            + Duration::from_nanos((frames % rate) * 1_000_000_000 / rate)
    }
}

impl AsRef<[u8]> for PcmBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
