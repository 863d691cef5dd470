use std::fmt;

/// Everything that can go wrong while hiding or recovering a message.
#[derive(Debug)]
pub enum Error {
    /// The message contains a byte outside the reduced ASCII alphabet.
    UnsupportedCharacter { byte: u8, position: usize },
    /// The message contains a NUL byte, which is reserved as end-of-message.
    ReservedSentinel { position: usize },
    /// A write went past the end of the output buffer.
    BufferOverflow { capacity: usize },
    /// The code length table cannot describe a usable prefix code.
    CorruptLengthTable(String),
    /// The bits ran out before the end-of-message symbol was found.
    TruncatedStream { bits_read: usize },
    /// A decode walk followed a branch that no symbol was assigned to.
    InvalidCodeword { bit_position: usize },
    /// The checksum stored after the stream does not match its contents.
    ChecksumMismatch { recovered: u32, calculated: u32 },
    /// The payload does not fit in the cover image.
    CoverTooSmall { capacity: usize, required: usize },
    Image(image::ImageError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedCharacter { byte, position } => write!(
                f,
                "cannot map character {:#04x} at position {}",
                byte, position
            ),
            Error::ReservedSentinel { position } => write!(
                f,
                "NUL at position {} is reserved as the end-of-message marker",
                position
            ),
            Error::BufferOverflow { capacity } => {
                write!(f, "write past the end of a {} byte buffer", capacity)
            }
            Error::CorruptLengthTable(reason) => write!(f, "corrupt code length table: {}", reason),
            Error::TruncatedStream { bits_read } => write!(
                f,
                "stream ended after {} bits without an end-of-message marker",
                bits_read
            ),
            Error::InvalidCodeword { bit_position } => {
                write!(f, "no symbol for the code ending at bit {}", bit_position)
            }
            Error::ChecksumMismatch {
                recovered,
                calculated,
            } => write!(
                f,
                "CRC32 mismatch (recovered: {}, calculated: {})",
                recovered, calculated
            ),
            Error::CoverTooSmall { capacity, required } => write!(
                f,
                "cover image is too small for input ({} bytes available, {} required)",
                capacity, required
            ),
            Error::Image(err) => write!(f, "image error: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Image(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
