//! Error types for the infochannel system.
//!
//! Invalid parameters are rejected before any agent thread starts. Coder
//! misuse and channel disconnects surface as structured errors rather than
//! panics.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Parameters: noise, bandwidth, iteration count or adapt rate out of range
/// - Huffman: code table construction or lookup failures
/// - Channel: a peer agent went away mid-experiment
/// - Bits: malformed bit text
/// - I/O and CSV: behavior trace export
#[derive(Debug, Error)]
pub enum Error {
    /// A construction parameter is outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Huffman coder error (unknown symbol or codeword, empty alphabet)
    #[error("huffman coder error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Bit string parsing error
    #[error("bit string error: {0}")]
    Bits(#[from] BitsError),

    /// Message channel communication error
    #[error("channel error: {0}")]
    Channel(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidParameter`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }
}

/// Huffman coder errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols supplied (cannot build a code table)
    #[error("empty alphabet: cannot build code table")]
    EmptyAlphabet,

    /// Symbol has no codeword in the table
    #[error("unknown symbol {symbol}")]
    UnknownSymbol { symbol: u32 },

    /// Bit string matches no codeword exactly
    #[error("unknown codeword {codeword:?}")]
    UnknownCodeword { codeword: String },
}

/// Bit string errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitsError {
    /// A character other than '0' or '1' was found
    #[error("invalid bit character {found:?} at position {position}")]
    InvalidCharacter { found: char, position: usize },

    /// Flip index past the end of the string
    #[error("bit index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
