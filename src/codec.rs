//! The Huffman stream format.
//!
//! A stream is 99 seven bit code lengths, one per symbol in symbol order,
//! followed by the canonical codeword of every message byte and finally the
//! codeword of the end-of-message symbol. Everything is packed most
//! significant bit first and the last byte is zero padded.

use crate::alphabet::{self, Symbol, SYMBOL_COUNT};
use crate::bitstream::BitStream;
use crate::canonical::{CanonicalTable, SymbolCode};
use crate::tree::{FrequencyTable, HuffmanNode};
use crate::Error;
use log::debug;

/// Width of one entry in the code length table.
pub const LENGTH_FIELD_BITS: u8 = 7;

/// Size of the code length table in bits.
pub const TABLE_BITS: usize = SYMBOL_COUNT * LENGTH_FIELD_BITS as usize;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecodedStream {
    pub message: String,
    /// Bytes of the input taken up by the stream, including the padded byte
    /// holding the end-of-message codeword.
    pub data_len: usize,
}

/// Compresses `message` into a self-terminating stream.
pub fn encode(message: &[u8]) -> Result<Vec<u8>, Error> {
    let frequencies = FrequencyTable::from_message(message)?;
    let lengths = match HuffmanNode::build(&frequencies) {
        Some(root) => root.code_lengths(),
        None => return Err(Error::CorruptLengthTable("no symbols to encode".to_string())),
    };
    let table = CanonicalTable::from_lengths(&lengths)?;

    // The sentinel is counted once in the frequencies, so this covers the
    // terminating codeword as well.
    let payload_bits: usize = frequencies
        .present()
        .map(|(symbol, count)| count * table.get(symbol).length as usize)
        .sum();
    let mut stream = BitStream::with_len((TABLE_BITS + payload_bits + 7) / 8);

    write_lengths(&mut stream, &lengths)?;
    for (position, &byte) in message.iter().enumerate() {
        write_code(&mut stream, table.get(alphabet::map(byte, position)?))?;
    }
    write_code(&mut stream, table.get(Symbol::SENTINEL))?;

    debug!(
        "huffman encode: {} message bytes, {} distinct symbols, {} stream bytes",
        message.len(),
        table.present().count(),
        stream.data_len()
    );

    Ok(stream.into_bytes())
}

/// Reads one stream from the start of `data`. Bytes after the stream are
/// ignored; running off the end of `data` first is an error.
pub fn decode(data: &[u8]) -> Result<DecodedStream, Error> {
    let mut stream = BitStream::from_bytes(data.to_vec());

    let lengths = read_lengths(&mut stream)?;
    let table = CanonicalTable::from_lengths(&lengths)?;
    let tree = DecodeTree::from_table(&table)?;

    let mut message = String::new();
    let mut at = DecodeTree::ROOT;
    loop {
        let bit = stream.read_bit()?;
        at = tree.step(at, bit).ok_or(Error::InvalidCodeword {
            bit_position: stream.bits_consumed() - 1,
        })?;
        if let Some(symbol) = tree.leaf(at) {
            if symbol.is_sentinel() {
                break;
            }
            message.push(char::from(alphabet::unmap(symbol)));
            at = DecodeTree::ROOT;
        }
    }

    debug!(
        "huffman decode: {} message bytes from {} stream bytes",
        message.len(),
        stream.data_len()
    );

    Ok(DecodedStream {
        message,
        data_len: stream.data_len(),
    })
}

pub fn write_lengths(stream: &mut BitStream, lengths: &[u8; SYMBOL_COUNT]) -> Result<(), Error> {
    for &length in lengths.iter() {
        stream.write_bits(length as u128, LENGTH_FIELD_BITS)?;
    }
    Ok(())
}

pub fn read_lengths(stream: &mut BitStream) -> Result<[u8; SYMBOL_COUNT], Error> {
    let mut lengths = [0; SYMBOL_COUNT];
    for length in lengths.iter_mut() {
        *length = stream.read_bits(LENGTH_FIELD_BITS)? as u8;
    }
    Ok(lengths)
}

fn write_code(stream: &mut BitStream, code: &SymbolCode) -> Result<(), Error> {
    for bit in code.msb_first() {
        stream.write_bit(bit)?;
    }
    Ok(())
}

#[derive(Debug)]
enum DecodeNode {
    Branch { children: [Option<usize>; 2] },
    Leaf(Symbol),
}

impl DecodeNode {
    fn empty() -> Self {
        DecodeNode::Branch {
            children: [None, None],
        }
    }
}

/// Binary tree rebuilt from canonical codewords; 0 goes left, 1 goes right.
#[derive(Debug)]
struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    const ROOT: usize = 0;

    fn from_table(table: &CanonicalTable) -> Result<Self, Error> {
        let mut tree = DecodeTree {
            nodes: vec![DecodeNode::empty()],
        };
        for code in table.present() {
            tree.insert(code)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, code: &SymbolCode) -> Result<(), Error> {
        let mut at = Self::ROOT;
        for bit in code.msb_first() {
            let next = self.nodes.len();
            let slot = match &mut self.nodes[at] {
                DecodeNode::Branch { children } => &mut children[bit as usize],
                DecodeNode::Leaf(_) => return Err(overlapping(code)),
            };
            let child = *slot.get_or_insert(next);
            if child == next {
                self.nodes.push(DecodeNode::empty());
            }
            at = child;
        }

        match self.nodes[at] {
            DecodeNode::Branch {
                children: [None, None],
            } => {
                self.nodes[at] = DecodeNode::Leaf(code.symbol);
                Ok(())
            }
            _ => Err(overlapping(code)),
        }
    }

    fn step(&self, at: usize, bit: bool) -> Option<usize> {
        match &self.nodes[at] {
            DecodeNode::Branch { children } => children[bit as usize],
            DecodeNode::Leaf(_) => None,
        }
    }

    fn leaf(&self, at: usize) -> Option<Symbol> {
        match self.nodes[at] {
            DecodeNode::Leaf(symbol) => Some(symbol),
            DecodeNode::Branch { .. } => None,
        }
    }
}

fn overlapping(code: &SymbolCode) -> Error {
    Error::CorruptLengthTable(format!(
        "codeword for symbol {} overlaps another codeword",
        code.symbol.index()
    ))
}
