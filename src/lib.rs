pub mod alphabet;
pub mod bitstream;
pub mod canonical;
pub mod checksum;
pub mod codec;
pub mod decoder;
pub mod encoder;
mod error;
pub mod tree;

pub use decoder::{DecodeReport, Decoder};
pub use encoder::Encoder;
pub use error::Error;

use std::convert::TryFrom;

/// How many low bits of every pixel channel carry payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ByteSplitGranularity {
    FourBits,
    TwoBits,
    OneBit,
}

impl ByteSplitGranularity {
    pub fn bits(self) -> u8 {
        u8::from(self)
    }

    /// Channels needed to carry one payload byte.
    pub fn channels_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// Payload bytes that fit in `channel_count` channels.
    pub fn capacity(self, channel_count: usize) -> usize {
        channel_count / self.channels_per_byte()
    }

    fn mask(self) -> u8 {
        (1 << self.bits()) - 1
    }
}

/// One payload byte per RGBA pixel.
impl Default for ByteSplitGranularity {
    fn default() -> Self {
        ByteSplitGranularity::TwoBits
    }
}

impl TryFrom<u8> for ByteSplitGranularity {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            4 => Ok(ByteSplitGranularity::FourBits),
            2 => Ok(ByteSplitGranularity::TwoBits),
            1 => Ok(ByteSplitGranularity::OneBit),
            _ => Err(format!("unsupported bits per channel: {}", v)),
        }
    }
}

impl From<ByteSplitGranularity> for u8 {
    fn from(granularity: ByteSplitGranularity) -> u8 {
        match granularity {
            ByteSplitGranularity::FourBits => 4,
            ByteSplitGranularity::TwoBits => 2,
            ByteSplitGranularity::OneBit => 1,
        }
    }
}

mod byte_encodings {
    use super::ByteSplitGranularity;

    /// Writes `payload` into the low bits of `channels`, high bits first,
    /// `channels_per_byte` channels per payload byte. Channels past the end of
    /// the payload are left alone.
    pub fn embed(channels: &mut [u8], payload: &[u8], granularity: ByteSplitGranularity) {
        channels
            .chunks_mut(granularity.channels_per_byte())
            .zip(payload)
            .for_each(|(chunk, &byte)| {
                chunk
                    .iter_mut()
                    .zip(split_byte(granularity, byte))
                    .for_each(|(channel, piece)| *channel = zip_bytes(granularity, *channel, piece));
            });
    }

    /// Reassembles a payload byte from every complete group of channels.
    pub fn extract(channels: &[u8], granularity: ByteSplitGranularity) -> Vec<u8> {
        channels
            .chunks_exact(granularity.channels_per_byte())
            .map(|chunk| merge_bytes(granularity, chunk))
            .collect()
    }

    pub fn split_byte(granularity: ByteSplitGranularity, byte: u8) -> impl Iterator<Item = u8> {
        let bits = granularity.bits();
        let mask = granularity.mask();
        (0..granularity.channels_per_byte() as u8)
            .rev()
            .map(move |i| (byte >> (i * bits)) & mask)
    }

    pub fn zip_bytes(granularity: ByteSplitGranularity, left: u8, right: u8) -> u8 {
        let mask = granularity.mask();
        (left & !mask) | (right & mask)
    }

    pub fn merge_bytes(granularity: ByteSplitGranularity, pieces: &[u8]) -> u8 {
        let mask = granularity.mask();
        pieces
            .iter()
            .fold(0, |acc, piece| (acc << granularity.bits()) | (piece & mask))
    }

}
