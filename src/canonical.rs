//! Canonical Huffman codes, derived from code lengths alone.
//!
//! Present symbols are ordered by (code length, symbol). The first one gets
//! the all-zero codeword of its length; every following codeword is the
//! previous one plus one, with zero bits appended until it is as long as its
//! symbol's code length. Codewords are held as integers whose bit 0 is the
//! last bit on the wire, so they are written and walked from bit
//! `length - 1` down to bit 0.

use crate::alphabet::{Symbol, SYMBOL_COUNT};
use crate::Error;

/// Longest code a tree over the whole alphabet can produce.
pub const MAX_CODE_LENGTH: u8 = (SYMBOL_COUNT - 1) as u8;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SymbolCode {
    pub symbol: Symbol,
    /// Zero when the symbol has no code.
    pub length: u8,
    pub bits: u128,
}

impl SymbolCode {
    pub fn is_present(&self) -> bool {
        self.length > 0
    }

    /// Codeword bits in wire order.
    pub fn msb_first(&self) -> impl Iterator<Item = bool> {
        let bits = self.bits;
        (0..self.length).rev().map(move |i| (bits >> i) & 1 == 1)
    }

    pub fn is_prefix_of(&self, other: &SymbolCode) -> bool {
        self.length <= other.length && other.bits >> (other.length - self.length) == self.bits
    }
}

#[derive(Debug, Clone)]
pub struct CanonicalTable {
    // All symbols in canonical order, absent ones last.
    entries: Vec<SymbolCode>,
    // Symbol index -> position in `entries`.
    lookup: [usize; SYMBOL_COUNT],
}

impl CanonicalTable {
    pub fn from_lengths(lengths: &[u8; SYMBOL_COUNT]) -> Result<Self, Error> {
        if let Some((symbol, &length)) = lengths
            .iter()
            .enumerate()
            .find(|&(_, &l)| l > MAX_CODE_LENGTH)
        {
            return Err(Error::CorruptLengthTable(format!(
                "symbol {} has code length {}, longest allowed is {}",
                symbol, length, MAX_CODE_LENGTH
            )));
        }
        if lengths[Symbol::SENTINEL.index()] == 0 {
            return Err(Error::CorruptLengthTable(
                "end-of-message symbol has no code".to_string(),
            ));
        }

        let mut entries: Vec<SymbolCode> = Symbol::all()
            .map(|symbol| SymbolCode {
                symbol,
                length: lengths[symbol.index()],
                bits: 0,
            })
            .collect();
        entries.sort_by_key(|e| (e.length == 0, e.length, e.symbol));

        let mut code: u128 = 0;
        let mut width = entries[0].length;
        for (i, entry) in entries.iter_mut().enumerate() {
            if !entry.is_present() {
                break;
            }
            if i > 0 {
                code += 1;
                while width < entry.length {
                    code <<= 1;
                    width += 1;
                }
                if code >> width != 0 {
                    return Err(Error::CorruptLengthTable(
                        "code lengths over-subscribe the code space".to_string(),
                    ));
                }
            }
            entry.bits = code;
        }

        let mut lookup = [0; SYMBOL_COUNT];
        for (position, entry) in entries.iter().enumerate() {
            lookup[entry.symbol.index()] = position;
        }

        Ok(Self { entries, lookup })
    }

    pub fn get(&self, symbol: Symbol) -> &SymbolCode {
        &self.entries[self.lookup[symbol.index()]]
    }

    /// Symbols that have a code, in canonical order.
    pub fn present(&self) -> impl Iterator<Item = &SymbolCode> {
        self.entries.iter().take_while(|e| e.is_present())
    }

    pub fn lengths(&self) -> [u8; SYMBOL_COUNT] {
        let mut lengths = [0; SYMBOL_COUNT];
        for entry in &self.entries {
            lengths[entry.symbol.index()] = entry.length;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::tree::{FrequencyTable, HuffmanNode};

    fn table_for(message: &str) -> CanonicalTable {
        let frequencies = FrequencyTable::from_message(message.as_bytes()).unwrap();
        let lengths = HuffmanNode::build(&frequencies).unwrap().code_lengths();
        CanonicalTable::from_lengths(&lengths).unwrap()
    }

    fn code_of(table: &CanonicalTable, c: char) -> (u8, u128) {
        let entry = table.get(alphabet::map(c as u8, 0).unwrap());
        (entry.length, entry.bits)
    }

    #[test]
    fn test_equal_lengths_count_up_by_symbol() {
        let table = table_for("Hi\n");
        assert_eq!((2, 0b00), code_of(&table, '\0'));
        assert_eq!((2, 0b01), code_of(&table, '\n'));
        assert_eq!((2, 0b10), code_of(&table, 'H'));
        assert_eq!((2, 0b11), code_of(&table, 'i'));
    }

    #[test]
    fn test_longer_codes_are_shifted() {
        let mut lengths = [0; SYMBOL_COUNT];
        lengths[0] = 3;
        lengths[5] = 1;
        lengths[6] = 2;
        lengths[7] = 3;
        let table = CanonicalTable::from_lengths(&lengths).unwrap();
        let codes: Vec<(usize, u8, u128)> = table
            .present()
            .map(|e| (e.symbol.index(), e.length, e.bits))
            .collect();
        assert_eq!(
            vec![(5, 1, 0b0), (6, 2, 0b10), (0, 3, 0b110), (7, 3, 0b111)],
            codes
        );
    }

    #[test]
    fn test_single_code_is_zero() {
        let table = table_for("");
        assert_eq!((1, 0), code_of(&table, '\0'));
        assert_eq!(1, table.present().count());
    }

    #[test]
    fn test_absent_symbols_sorted_last() {
        let table = table_for("aaaa");
        assert_eq!(2, table.present().count());
        assert!(!table.get(alphabet::map(b'z', 0).unwrap()).is_present());
        assert_eq!((1, 0), code_of(&table, '\0'));
        assert_eq!((1, 1), code_of(&table, 'a'));
    }

    #[test]
    fn test_msb_first_order() {
        let code = SymbolCode {
            symbol: Symbol::SENTINEL,
            length: 4,
            bits: 0b0110,
        };
        assert_eq!(vec![false, true, true, false], code.msb_first().collect::<Vec<_>>());
    }

    #[test]
    fn test_lengths_survive_rebuild() {
        let table = table_for("abracadabra\r\n");
        let rebuilt = CanonicalTable::from_lengths(&table.lengths()).unwrap();
        for symbol in Symbol::all() {
            assert_eq!(table.get(symbol), rebuilt.get(symbol));
        }
    }

    #[test]
    fn test_codes_independent_of_message_order() {
        let forward = table_for("aabbbcd");
        let shuffled = table_for("bdbacab");
        for symbol in Symbol::all() {
            assert_eq!(forward.get(symbol), shuffled.get(symbol));
        }
    }

    #[test]
    fn test_same_lengths_from_different_weights_give_same_codes() {
        // Different weights, same lengths.
        let balanced = table_for("Hi\n");
        let skewed = table_for("HHii\n\n");
        assert_eq!(balanced.lengths(), skewed.lengths());
        for symbol in Symbol::all() {
            assert_eq!(balanced.get(symbol), skewed.get(symbol));
        }
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for("Sphinx of black quartz, judge my vow!\tOK?\r\n");
        let present: Vec<&SymbolCode> = table.present().collect();
        for a in &present {
            for b in &present {
                if a.symbol != b.symbol {
                    assert!(!a.is_prefix_of(b), "{:?} prefixes {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_rejects_missing_sentinel() {
        let mut lengths = [0; SYMBOL_COUNT];
        lengths[10] = 1;
        assert!(matches!(
            CanonicalTable::from_lengths(&lengths),
            Err(Error::CorruptLengthTable(_))
        ));
        assert!(matches!(
            CanonicalTable::from_lengths(&[0; SYMBOL_COUNT]),
            Err(Error::CorruptLengthTable(_))
        ));
    }

    #[test]
    fn test_rejects_oversubscribed_lengths() {
        let mut lengths = [0; SYMBOL_COUNT];
        lengths[0] = 1;
        lengths[1] = 1;
        lengths[2] = 1;
        assert!(matches!(
            CanonicalTable::from_lengths(&lengths),
            Err(Error::CorruptLengthTable(_))
        ));
    }

    #[test]
    fn test_rejects_overlong_length() {
        let mut lengths = [0; SYMBOL_COUNT];
        lengths[0] = 1;
        lengths[1] = MAX_CODE_LENGTH + 1;
        assert!(matches!(
            CanonicalTable::from_lengths(&lengths),
            Err(Error::CorruptLengthTable(_))
        ));
    }

    #[test]
    fn test_accepts_longest_lengths() {
        // A fully skewed tree: lengths 1, 2, ..., 97, 98, 98.
        let mut lengths = [0; SYMBOL_COUNT];
        for (i, length) in lengths.iter_mut().enumerate() {
            *length = (i as u8 + 1).min(MAX_CODE_LENGTH);
        }
        let table = CanonicalTable::from_lengths(&lengths).unwrap();
        let last = table.get(Symbol::new(98).unwrap());
        assert_eq!(MAX_CODE_LENGTH, last.length);
        assert_eq!((1u128 << 98) - 1, last.bits);
    }
}
