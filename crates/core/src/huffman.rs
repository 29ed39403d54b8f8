//! Huffman code tables over a small integer alphabet.
//!
//! The coder is built once from (symbol, weight) pairs and never mutated.
//! Construction repeatedly merges the two lightest nodes of a min-heap; the
//! lighter one becomes the `0` branch and the heavier one the `1` branch.
//!
//! # Tie-breaking
//!
//! Heap entries are ordered by `(weight, lead)`, where `lead` is the symbol
//! of the leftmost leaf under the node. Symbols are unique, so this is a
//! total order and the table for a given weight map is always the same.
//! For a uniform 11-symbol alphabet it yields:
//!
//! ```text
//! 6 -> 000   7 -> 001   8 -> 010   9 -> 011   10 -> 100
//! 0 -> 1010  1 -> 1011  2 -> 1100  3 -> 1101   4 -> 1110   5 -> 1111
//! ```
//!
//! # Single-symbol alphabets
//!
//! A one-leaf tree has no edges, so the lone symbol would get an empty
//! codeword. It is assigned the fixed codeword `0` instead so that every
//! message still carries at least one payload bit ahead of its parity bit.

use crate::bits::BitString;
use crate::error::{Error, HuffmanError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Huffman tree node.
#[derive(Debug)]
enum Node {
    Leaf { symbol: u32 },
    Internal { left: Box<Node>, right: Box<Node> },
}

/// A subtree waiting in the construction heap.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    lead: u32,
    node: Node,
}

// Min-heap on (weight, lead)
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.lead == other.lead
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lightest entry first
        (other.weight, other.lead).cmp(&(self.weight, self.lead))
    }
}

/// Immutable symbol <-> codeword tables.
#[derive(Debug, Clone)]
pub struct Codebook {
    codes: BTreeMap<u32, BitString>,
    reverse: HashMap<BitString, u32>,
}

impl Codebook {
    /// Build a code table from symbol weights.
    ///
    /// # Errors
    /// `HuffmanError::EmptyAlphabet` if `weights` is empty.
    pub fn from_weights(weights: &BTreeMap<u32, u64>) -> Result<Self> {
        let mut heap: BinaryHeap<HeapEntry> = weights
            .iter()
            .map(|(&symbol, &weight)| HeapEntry {
                weight,
                lead: symbol,
                node: Node::Leaf { symbol },
            })
            .collect();

        let root = loop {
            let lo = heap.pop().ok_or(HuffmanError::EmptyAlphabet)?;
            let Some(hi) = heap.pop() else {
                break lo.node;
            };
            heap.push(HeapEntry {
                weight: lo.weight.saturating_add(hi.weight),
                lead: lo.lead,
                node: Node::Internal {
                    left: Box::new(lo.node),
                    right: Box::new(hi.node),
                },
            });
        };

        let codes = assign_codes(root);
        let reverse = codes
            .iter()
            .map(|(&symbol, code)| (code.clone(), symbol))
            .collect();

        Ok(Self { codes, reverse })
    }

    /// Code table for symbols `0..levels`, all with weight 1.
    ///
    /// # Errors
    /// `InvalidParameter` if `levels` does not fit the `u32` symbol space.
    pub fn uniform(levels: usize) -> Result<Self> {
        let count = u32::try_from(levels).map_err(|_| {
            Error::invalid(format!("{levels} levels exceed the u32 symbol space"))
        })?;
        let weights: BTreeMap<u32, u64> = (0..count).map(|symbol| (symbol, 1)).collect();
        Self::from_weights(&weights)
    }

    /// Codeword for `symbol`.
    pub fn encode(&self, symbol: u32) -> Result<&BitString> {
        self.codes
            .get(&symbol)
            .ok_or_else(|| HuffmanError::UnknownSymbol { symbol }.into())
    }

    /// Symbol whose codeword equals `codeword` exactly.
    ///
    /// # Errors
    /// `HuffmanError::UnknownCodeword` when nothing matches. Receivers use
    /// this as the "corrupted beyond recognition" signal.
    pub fn decode(&self, codeword: &BitString) -> Result<u32> {
        self.reverse.get(codeword).copied().ok_or_else(|| {
            HuffmanError::UnknownCodeword {
                codeword: codeword.to_string(),
            }
            .into()
        })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always false for a built codebook.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, codeword) pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BitString)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }
}

/// Walk the tree, `0` for left and `1` for right.
fn assign_codes(root: Node) -> BTreeMap<u32, BitString> {
    let mut codes = BTreeMap::new();

    if let Node::Leaf { symbol } = root {
        codes.insert(symbol, BitString::from_bits(vec![false]));
        return codes;
    }

    // Explicit stack: skewed weight maps can make the tree very deep
    let mut stack = vec![(root, BitString::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node {
            Node::Leaf { symbol } => {
                codes.insert(symbol, prefix);
            }
            Node::Internal { left, right } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(false);
                let mut right_prefix = prefix;
                right_prefix.push(true);
                stack.push((*left, left_prefix));
                stack.push((*right, right_prefix));
            }
        }
    }

    codes
}
