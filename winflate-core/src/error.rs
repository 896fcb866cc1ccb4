//! Error types for winflate operations.
//!
//! Every failure of a decompression session is reported through
//! [`InflateError`]. Corrupt-input errors, output sink failures and resource
//! errors are distinct variants so callers can decide whether to retry with
//! different input or give up.

use std::fmt;
use std::io;
use thiserror::Error;

/// Huffman alphabets of a DEFLATE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// Literal/length alphabet (literals, end-of-block, match lengths).
    LiteralLength,
    /// Distance alphabet.
    Distance,
    /// Code length alphabet of a dynamic block header.
    CodeLength,
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LiteralLength => "literal/length",
            Self::Distance => "distance",
            Self::CodeLength => "code length",
        };
        f.write_str(name)
    }
}

/// Reason a set of Huffman code lengths was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableDefect {
    /// Every code length is zero.
    EmptyCodeSet,
    /// The lengths describe more codes than the code space holds.
    OverSubscribed,
    /// The code leaves unused code space where a complete code is required.
    Incomplete,
    /// A code length exceeds the supported maximum.
    CodeTooLong,
    /// More symbols than the alphabet allows.
    TooManyCodes,
    /// A run-length symbol repeats past the end of the length list.
    RepeatOverrun,
    /// "Repeat previous length" appeared before any length.
    RepeatWithoutPrevious,
    /// Length codes are present but no distance code is defined.
    MissingDistanceCodes,
}

impl fmt::Display for TableDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyCodeSet => "empty code set",
            Self::OverSubscribed => "over-subscribed code lengths",
            Self::Incomplete => "incomplete code",
            Self::CodeTooLong => "code length too long",
            Self::TooManyCodes => "too many codes",
            Self::RepeatOverrun => "length repeat runs past the end",
            Self::RepeatWithoutPrevious => "length repeat without a previous length",
            Self::MissingDistanceCodes => "length codes without distance codes",
        };
        f.write_str(text)
    }
}

/// The main error type for winflate operations.
#[derive(Debug, Error)]
pub enum InflateError {
    /// The bit reader needed more bits than the input holds.
    #[error("Input exhausted at bit position {bit_position}")]
    InputExhausted {
        /// Bit position at which the read was attempted.
        bit_position: u64,
    },

    /// Block header carries the reserved block type.
    #[error("Invalid block type {block_type}")]
    InvalidBlockType {
        /// The 2-bit block type read from the header.
        block_type: u8,
    },

    /// Stored block LEN does not match the complement of NLEN.
    #[error("Stored block length mismatch: LEN={len:#06x}, NLEN={nlen:#06x}")]
    StoredLengthMismatch {
        /// LEN field.
        len: u16,
        /// NLEN field.
        nlen: u16,
    },

    /// Code lengths do not describe a usable Huffman code.
    #[error("Invalid Huffman table: {defect}")]
    InvalidHuffmanTable {
        /// What is wrong with the code lengths.
        defect: TableDefect,
    },

    /// A decoded code maps to no usable symbol.
    #[error("Invalid {alphabet} code at bit position {bit_position}")]
    InvalidSymbol {
        /// Alphabet the code was decoded from.
        alphabet: Alphabet,
        /// Bit position after the code.
        bit_position: u64,
    },

    /// Back-reference distance points before the start of the output.
    #[error("Invalid back-reference distance: {distance} exceeds {produced} bytes produced")]
    InvalidBackReference {
        /// The back-reference distance.
        distance: usize,
        /// Bytes produced before the back-reference.
        produced: u64,
    },

    /// The output sink refused a flush.
    #[error("Output sink failed after {delivered} bytes: {source}")]
    OutputSinkFailure {
        /// Bytes successfully delivered before the failing flush.
        delivered: u64,
        /// Error returned by the sink.
        #[source]
        source: io::Error,
    },

    /// Window or table memory could not be acquired.
    #[error("Allocation of {requested} bytes failed")]
    AllocationFailure {
        /// Number of bytes requested.
        requested: usize,
    },

    /// Sliding window size is unusable.
    #[error("Invalid window size {size}: must be a power of two of at least {minimum} bytes")]
    InvalidWindowSize {
        /// Requested window size.
        size: usize,
        /// Minimum window size for the stream variant.
        minimum: usize,
    },

    /// Inconsistent decompressor configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// I/O error outside the decompression session (opening files, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for winflate operations.
pub type Result<T> = std::result::Result<T, InflateError>;

impl InflateError {
    /// Create an input exhausted error.
    pub fn input_exhausted(bit_position: u64) -> Self {
        Self::InputExhausted { bit_position }
    }

    /// Create an invalid block type error.
    pub fn invalid_block_type(block_type: u8) -> Self {
        Self::InvalidBlockType { block_type }
    }

    /// Create a stored length mismatch error.
    pub fn stored_length_mismatch(len: u16, nlen: u16) -> Self {
        Self::StoredLengthMismatch { len, nlen }
    }

    /// Create an invalid Huffman table error.
    pub fn invalid_table(defect: TableDefect) -> Self {
        Self::InvalidHuffmanTable { defect }
    }

    /// Create an invalid symbol error.
    pub fn invalid_symbol(alphabet: Alphabet, bit_position: u64) -> Self {
        Self::InvalidSymbol {
            alphabet,
            bit_position,
        }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(distance: usize, produced: u64) -> Self {
        Self::InvalidBackReference { distance, produced }
    }

    /// Create an output sink failure.
    pub fn sink_failure(delivered: u64, source: io::Error) -> Self {
        Self::OutputSinkFailure { delivered, source }
    }

    /// Create an allocation failure.
    pub fn allocation_failure(requested: usize) -> Self {
        Self::AllocationFailure { requested }
    }

    /// Create an invalid window size error.
    pub fn invalid_window_size(size: usize, minimum: usize) -> Self {
        Self::InvalidWindowSize { size, minimum }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for errors caused by malformed compressed data.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Self::InputExhausted { .. }
                | Self::InvalidBlockType { .. }
                | Self::StoredLengthMismatch { .. }
                | Self::InvalidHuffmanTable { .. }
                | Self::InvalidSymbol { .. }
                | Self::InvalidBackReference { .. }
        )
    }

    /// The table defect, if this is an invalid Huffman table error.
    pub fn table_defect(&self) -> Option<TableDefect> {
        match self {
            Self::InvalidHuffmanTable { defect } => Some(*defect),
            _ => None,
        }
    }
}
