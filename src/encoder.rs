use crate::{byte_encodings, checksum, codec, ByteSplitGranularity, Error};
use log::debug;
use std::io::{BufRead, Read, Seek, Write};

#[derive(Debug, Default)]
pub struct Encoder {
    granularity: ByteSplitGranularity,
}

impl Encoder {
    pub fn new(granularity: ByteSplitGranularity) -> Self {
        Self { granularity }
    }

    /// Hides the text read from `input_data` in `cover_image` and writes the
    /// result to `output` as a PNG.
    pub fn encode<R1: BufRead + Read + Seek, R2: Read, W: Write>(
        &self,
        cover_image: R1,
        input_data: &mut R2,
        output: &mut W,
    ) -> Result<(), Error> {
        let img = image::load(cover_image, image::ImageFormat::Png)?;

        let mut message = Vec::new();
        input_data.read_to_end(&mut message)?;
        let payload = self.payload(&message)?;

        let rgba8 = img.to_rgba8();
        let (width, height) = rgba8.dimensions();
        let mut cover_image_bytes = rgba8.into_raw();

        self.check_utilisation(&cover_image_bytes, &payload)?;

        byte_encodings::embed(&mut cover_image_bytes, &payload, self.granularity);

        let out_buffer = image::RgbaImage::from_raw(width, height, cover_image_bytes)
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "could not create output image buffer from raw parts",
                ))
            })?;

        image::DynamicImage::ImageRgba8(out_buffer).write_to(output, image::ImageFormat::Png)?;
        Ok(())
    }

    /// The Huffman stream for `message` followed by its checksum.
    pub fn payload(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let stream = codec::encode(message)?;
        debug!(
            "compression ratio: {:.4}%",
            ((stream.len() as f64) / (message.len().max(1) as f64)) * 100.0
        );
        Ok(checksum::seal(stream))
    }

    // Make sure that we can fit our payload into the cover image
    fn check_utilisation(&self, cover_image: &[u8], payload: &[u8]) -> Result<(), Error> {
        let capacity = self.granularity.capacity(cover_image.len());
        let required = payload.len();
        let cover_image_utilisation = ((required as f64) / (capacity.max(1) as f64)) * 100.0;

        debug!(
            "cover image capacity: {}, payload size: {}, cover image utilisation: {:.4}%",
            capacity, required, cover_image_utilisation,
        );

        if required <= capacity {
            Ok(())
        } else {
            Err(Error::CoverTooSmall { capacity, required })
        }
    }
}
