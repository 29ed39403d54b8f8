//! Owned bit strings for codewords and channel messages.
//!
//! A [`BitString`] is an ordered sequence of binary digits, first bit first.
//! It is the unit that codewords are built from and that travels over a
//! [`NoisyChannel`](crate::channel::NoisyChannel). Text form is a run of
//! `'0'`/`'1'` characters.
//!
//! # Example
//! ```
//! use infochannel_core::bits::BitString;
//!
//! let mut bits: BitString = "101".parse().unwrap();
//! assert_eq!(bits.count_ones(), 2);
//! assert!(!bits.parity());
//!
//! bits.push(true);
//! bits.flip(0).unwrap();
//! assert_eq!(bits.to_string(), "0011");
//! ```

use crate::error::{BitsError, Result};
use std::fmt;
use std::str::FromStr;

/// Sequence of bits, first bit first.
///
/// Empty strings are representable; codewords never are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Build from a vector of bits.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if there are no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, if any.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Last bit, if any.
    pub fn last(&self) -> Option<bool> {
        self.bits.last().copied()
    }

    /// Count of `1` bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Even-parity check bit: `true` iff the count of ones is odd.
    pub fn parity(&self) -> bool {
        self.count_ones() % 2 == 1
    }

    /// Append a bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Invert the bit at `index`.
    ///
    /// # Errors
    /// `BitsError::IndexOutOfRange` if `index >= len()`.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        let len = self.bits.len();
        match self.bits.get_mut(index) {
            Some(bit) => {
                *bit = !*bit;
                Ok(())
            }
            None => Err(BitsError::IndexOutOfRange { index, len }.into()),
        }
    }

    /// Copy of all bits except the last. Empty input gives empty output.
    pub fn without_last(&self) -> BitString {
        let end = self.bits.len().saturating_sub(1);
        Self {
            bits: self.bits[..end].to_vec(),
        }
    }

    /// Copy with the even-parity bit appended.
    pub fn with_parity(&self) -> BitString {
        let mut out = self.clone();
        out.push(self.parity());
        out
    }

    /// Iterate over bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl FromStr for BitString {
    type Err = BitsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(BitsError::InvalidCharacter { found, position }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self::from_bits)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bits(iter.into_iter().collect())
    }
}
