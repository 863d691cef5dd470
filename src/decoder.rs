use crate::{byte_encodings, checksum, codec, ByteSplitGranularity, Error};
use log::{debug, warn};
use std::io::{BufRead, Read, Seek, Write};

/// What a decode found besides the message itself.
#[derive(Debug)]
pub struct DecodeReport {
    pub message_len: usize,
    /// Length of the Huffman stream, checksum excluded.
    pub stream_len: usize,
    /// `Some(Error::ChecksumMismatch)` when the message was recovered but
    /// does not match its checksum.
    pub integrity: Option<Error>,
}

impl DecodeReport {
    pub fn is_intact(&self) -> bool {
        self.integrity.is_none()
    }

    /// Turns a checksum mismatch into an error.
    pub fn into_result(mut self) -> Result<Self, Error> {
        match self.integrity.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

#[derive(Debug, Default)]
pub struct Decoder {
    granularity: ByteSplitGranularity,
}

impl Decoder {
    pub fn new(granularity: ByteSplitGranularity) -> Self {
        Self { granularity }
    }

    /// Recovers a hidden message from a PNG and writes it to `output`. A
    /// checksum mismatch is logged and reported, the message is written anyway.
    pub fn decode<R: BufRead + Read + Seek, W: Write>(
        &self,
        input_image: &mut R,
        output: &mut W,
    ) -> Result<DecodeReport, Error> {
        let img = image::load(input_image, image::ImageFormat::Png)?;
        let image_bytes = img.to_rgba8().into_raw();
        let payload = byte_encodings::extract(&image_bytes, self.granularity);

        debug!("extracted {} payload bytes", payload.len());

        let (message, report) = self.unpack(&payload)?;
        output.write_all(message.as_bytes())?;
        Ok(report)
    }

    /// Decodes a Huffman stream and checks the checksum that follows it.
    pub fn unpack(&self, payload: &[u8]) -> Result<(String, DecodeReport), Error> {
        let decoded = codec::decode(payload)?;

        let integrity = match checksum::verify(payload, decoded.data_len) {
            Ok(()) => None,
            Err(err @ Error::ChecksumMismatch { .. }) => {
                warn!("error detected in decoded message: {}", err);
                Some(err)
            }
            Err(err) => return Err(err),
        };

        let report = DecodeReport {
            message_len: decoded.message.len(),
            stream_len: decoded.data_len,
            integrity,
        };
        Ok((decoded.message, report))
    }
}
