//! Describes the layout of an encoded PCM stream.
use std::convert::TryFrom;

use crate::EncoderError;

/// Precision of an encoded sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BitDepth {
    /// Signed 8 bit, one byte per sample.
    Eight = 8,
    /// Signed 16 bit little-endian, two bytes per sample.
    Sixteen = 16,
}

impl BitDepth {
    /// Number of bits per sample.
    pub fn bits(self) -> u16 {
        self as u16
    }

    /// Number of bytes a single encoded sample occupies.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = EncoderError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            _ => Err(EncoderError::UnsupportedFormat(bits)),
        }
    }
}

/// Audio channels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Channels {
    /// Mono - 1 channel
    Mono,
    /// Stereo - 2 channels
    Stereo,
}

impl Channels {
    /// Derives the output topology from the number of planar input channels.
    ///
    /// Any count above two is treated as stereo; only the first two channels
    /// are encoded in that case.
    pub fn from_count(count: usize) -> Result<Self, EncoderError> {
        match count {
            0 => Err(EncoderError::InvalidInput(
                "sample buffer has no channels".to_string(),
            )),
            1 => Ok(Channels::Mono),
            _ => Ok(Channels::Stereo),
        }
    }

    /// Number of channels in an encoded frame.
    pub fn count(self) -> usize {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

/// Metadata the playback side needs to interpret an encoded stream.
///
/// Samples are interleaved per frame (left before right) and every sample is
/// stored little-endian, regardless of the platform that produced the stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PcmFormat {
    /// Channel topology of each frame.
    pub channels: Channels,
    /// Precision of each sample.
    pub bit_depth: BitDepth,
    /// Frames per second. Passed through from the decoder untouched.
    pub sample_rate: u32,
}

impl PcmFormat {
    /// Size of one frame (one sample of every channel) in bytes.
    pub fn bytes_per_frame(&self) -> usize {
        self.channels.count() * self.bit_depth.bytes_per_sample()
    }

    /// Bytes consumed per second of playback.
    pub fn byte_rate(&self) -> u64 {
        u64::from(self.sample_rate) * self.bytes_per_frame() as u64
    }
}
