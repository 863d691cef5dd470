//! CRC32 framing: the checksum of a stream is stored big-endian right after
//! its last byte.

use crate::Error;

pub const CHECKSUM_LEN: usize = 4;

pub fn seal(mut stream: Vec<u8>) -> Vec<u8> {
    let crc = crc32fast::hash(&stream);
    stream.extend_from_slice(&crc.to_be_bytes());
    stream
}

/// Checks the checksum following the first `data_len` bytes of `buffer`.
pub fn verify(buffer: &[u8], data_len: usize) -> Result<(), Error> {
    let stored = match buffer.get(data_len..data_len + CHECKSUM_LEN) {
        Some(bytes) => bytes,
        None => {
            return Err(Error::TruncatedStream {
                bits_read: buffer.len() * 8,
            })
        }
    };
    let recovered = u32::from_be_bytes([stored[0], stored[1], stored[2], stored[3]]);
    let calculated = crc32fast::hash(&buffer[..data_len]);

    if recovered == calculated {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            recovered,
            calculated,
        })
    }
}
