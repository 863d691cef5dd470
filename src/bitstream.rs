//! Cursor-based bit access over a byte buffer, most significant bit first.

use crate::Error;

#[derive(Debug, Clone, Default)]
pub struct BitStream {
    data: Vec<u8>,
    byte_offset: usize,
    bit_offset: u8,
}

impl BitStream {
    /// A zeroed buffer of `bytes` bytes, ready for writing.
    pub fn with_len(bytes: usize) -> Self {
        Self::from_bytes(vec![0; bytes])
    }

    /// Wraps an existing buffer, cursor at the first bit.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), Error> {
        let capacity = self.data.len();
        let byte = self
            .data
            .get_mut(self.byte_offset)
            .ok_or(Error::BufferOverflow { capacity })?;
        let mask: u8 = 0x80 >> self.bit_offset;
        *byte &= !mask;
        if bit {
            *byte |= mask;
        }
        self.advance();
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool, Error> {
        let bits_read = self.bits_consumed();
        let byte = self
            .data
            .get(self.byte_offset)
            .ok_or(Error::TruncatedStream { bits_read })?;
        let bit = (byte >> (7 - self.bit_offset)) & 1 == 1;
        self.advance();
        Ok(bit)
    }

    /// Writes the low `count` bits of `value`, highest first.
    pub fn write_bits(&mut self, value: u128, count: u8) -> Result<(), Error> {
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    pub fn read_bits(&mut self, count: u8) -> Result<u128, Error> {
        let mut value: u128 = 0;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u128;
        }
        Ok(value)
    }

    pub fn reset(&mut self) {
        self.byte_offset = 0;
        self.bit_offset = 0;
    }

    pub fn bits_consumed(&self) -> usize {
        self.byte_offset * 8 + self.bit_offset as usize
    }

    /// Bytes touched so far, counting a partial trailing byte.
    pub fn data_len(&self) -> usize {
        self.byte_offset + (self.bit_offset > 0) as usize
    }

    /// Consumes the stream, keeping only the bytes up to the cursor.
    pub fn into_bytes(mut self) -> Vec<u8> {
        let len = self.data_len();
        self.data.truncate(len);
        self.data
    }

    fn advance(&mut self) {
        self.bit_offset += 1;
        if self.bit_offset == 8 {
            self.byte_offset += 1;
            self.bit_offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_is_msb_first() {
        let mut bs = BitStream::with_len(2);
        bs.write_bits(0b101, 3).unwrap();
        assert_eq!(3, bs.bits_consumed());
        assert_eq!(1, bs.data_len());
        assert_eq!(vec![0b1010_0000], bs.into_bytes());
    }

    #[test]
    fn test_write_clears_existing_bits() {
        let mut bs = BitStream::from_bytes(vec![0xFF]);
        bs.write_bit(false).unwrap();
        bs.write_bit(true).unwrap();
        bs.write_bit(false).unwrap();
        assert_eq!(vec![0b0101_1111], bs.into_bytes());
    }

    #[test]
    fn test_cursor_rolls_into_next_byte() {
        let mut bs = BitStream::with_len(2);
        bs.write_bits(0xFF, 8).unwrap();
        assert_eq!(1, bs.data_len());
        bs.write_bit(true).unwrap();
        assert_eq!(2, bs.data_len());
        assert_eq!(vec![0xFF, 0x80], bs.into_bytes());
    }

    #[test]
    fn test_read_after_reset() {
        let mut bs = BitStream::from_bytes(vec![0xA5, 0x3C]);
        assert_eq!(0xA, bs.read_bits(4).unwrap());
        assert_eq!(0x53, bs.read_bits(8).unwrap());
        bs.reset();
        assert_eq!(0xA53C, bs.read_bits(16).unwrap());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut bs = BitStream::with_len(1);
        bs.write_bits(0, 8).unwrap();
        match bs.write_bit(true) {
            Err(Error::BufferOverflow { capacity }) => assert_eq!(1, capacity),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let mut bs = BitStream::from_bytes(vec![0x00]);
        bs.read_bits(8).unwrap();
        match bs.read_bit() {
            Err(Error::TruncatedStream { bits_read }) => assert_eq!(8, bits_read),
            other => panic!("expected truncation, got {:?}", other),
        }
    }
}
