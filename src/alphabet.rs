//! The reduced ASCII alphabet: NUL, TAB, LF, CR and printable ASCII, packed
//! into the dense range `0..SYMBOL_COUNT`.

use crate::Error;

pub const SYMBOL_COUNT: usize = 99;

const PRINTABLE_OFFSET: u8 = 0x1C;

/// A dense code point in `0..SYMBOL_COUNT`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// End-of-message marker, mapped from NUL.
    pub const SENTINEL: Symbol = Symbol(0);

    pub fn new(index: usize) -> Option<Self> {
        if index < SYMBOL_COUNT {
            Some(Symbol(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_sentinel(self) -> bool {
        self == Symbol::SENTINEL
    }

    pub fn to_byte(self) -> u8 {
        match self.0 {
            0x00 => b'\0',
            0x01 => b'\t',
            0x02 => b'\n',
            0x03 => b'\r',
            s => s + PRINTABLE_OFFSET,
        }
    }

    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..SYMBOL_COUNT as u8).map(Symbol)
    }
}

/// Maps a message byte to its symbol. `position` only feeds the error.
pub fn map(byte: u8, position: usize) -> Result<Symbol, Error> {
    match byte {
        b'\0' => Ok(Symbol(0x00)),
        b'\t' => Ok(Symbol(0x01)),
        b'\n' => Ok(Symbol(0x02)),
        b'\r' => Ok(Symbol(0x03)),
        0x20..=0x7E => Ok(Symbol(byte - PRINTABLE_OFFSET)),
        _ => Err(Error::UnsupportedCharacter { byte, position }),
    }
}

pub fn unmap(symbol: Symbol) -> u8 {
    symbol.to_byte()
}
