//! Frequency counting and greedy Huffman tree construction.

use crate::alphabet::{self, Symbol, SYMBOL_COUNT};
use crate::Error;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Occurrences of each symbol in a message, plus one end-of-message marker.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FrequencyTable {
    counts: [usize; SYMBOL_COUNT],
}

impl FrequencyTable {
    pub fn from_message(message: &[u8]) -> Result<Self, Error> {
        let mut counts = [0; SYMBOL_COUNT];
        for (position, &byte) in message.iter().enumerate() {
            let symbol = alphabet::map(byte, position)?;
            if symbol.is_sentinel() {
                return Err(Error::ReservedSentinel { position });
            }
            counts[symbol.index()] += 1;
        }
        counts[Symbol::SENTINEL.index()] = 1;
        Ok(Self { counts })
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.counts[symbol.index()]
    }

    pub fn present(&self) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        Symbol::all()
            .map(move |s| (s, self.count(s)))
            .filter(|&(_, count)| count > 0)
    }
}

#[derive(Debug)]
pub enum HuffmanNode {
    Leaf {
        symbol: Symbol,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> usize {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Builds the tree by repeatedly merging the two lightest nodes. Equal
    /// weights are taken in creation order: leaves by symbol, then merged
    /// nodes in the order they were formed. Returns `None` when no symbol is
    /// present.
    pub fn build(frequencies: &FrequencyTable) -> Option<HuffmanNode> {
        let mut heap: BinaryHeap<HeapEntry> = frequencies
            .present()
            .enumerate()
            .map(|(order, (symbol, weight))| HeapEntry {
                order,
                node: HuffmanNode::Leaf { symbol, weight },
            })
            .collect();
        let mut next_order = SYMBOL_COUNT;

        while let Some(first) = heap.pop() {
            let second = match heap.pop() {
                Some(entry) => entry,
                None => return Some(first.node),
            };
            let (left, right) = (first.node, second.node);
            heap.push(HeapEntry {
                order: next_order,
                node: HuffmanNode::Internal {
                    weight: left.weight() + right.weight(),
                    left: Box::new(left),
                    right: Box::new(right),
                },
            });
            next_order += 1;
        }

        None
    }

    /// Depth of every leaf, indexed by symbol; absent symbols get 0. A tree
    /// made of a single leaf still gives that leaf a one bit code.
    pub fn code_lengths(&self) -> [u8; SYMBOL_COUNT] {
        let mut lengths = [0; SYMBOL_COUNT];
        if let HuffmanNode::Leaf { symbol, .. } = self {
            lengths[symbol.index()] = 1;
            return lengths;
        }

        let mut pending = vec![(self, 0u8)];
        while let Some((node, depth)) = pending.pop() {
            match node {
                HuffmanNode::Leaf { symbol, .. } => lengths[symbol.index()] = depth,
                HuffmanNode::Internal { left, right, .. } => {
                    pending.push((right.as_ref(), depth + 1));
                    pending.push((left.as_ref(), depth + 1));
                }
            }
        }
        lengths
    }
}

struct HeapEntry {
    order: usize,
    node: HuffmanNode,
}

impl HeapEntry {
    fn key(&self) -> (usize, usize) {
        (self.node.weight(), self.order)
    }
}

// Reversed so that `BinaryHeap` pops the lightest, oldest entry first.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeapEntry {}
