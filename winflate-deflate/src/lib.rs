//! # winflate Deflate
//!
//! Pure Rust DEFLATE (RFC 1951) and Deflate64 decompression.
//!
//! ## Features
//!
//! - All three block types
//!   - Stored (uncompressed) blocks
//!   - Fixed Huffman codes
//!   - Dynamic Huffman codes
//! - Deflate64: 64 KB window, distance codes 30 and 31, 16-bit length code 285
//! - Multi-level lookup tables with configurable root widths
//! - Output streamed through a sliding window into any [`OutputSink`]
//! - CRC-32 of the output, computed as it is delivered
//!
//! ## Example
//!
//! ```rust
//! use winflate_deflate::{InflateConfig, Inflater, inflate};
//!
//! // Stored block holding "Hello"
//! let stream = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];
//! assert_eq!(inflate(&stream).unwrap(), b"Hello");
//!
//! // Sessions report input consumed and the output CRC
//! let mut inflater = Inflater::new(InflateConfig::DEFLATE).unwrap();
//! let mut out = Vec::new();
//! let summary = inflater.inflate(&stream, &mut out).unwrap();
//! assert_eq!(summary.bytes_consumed, stream.len());
//! assert_eq!(summary.crc32, 0xF7D18982);
//! ```
//!
//! [`OutputSink`]: winflate_core::sink::OutputSink

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod huffman;
pub mod inflate;
pub mod tables;

// Re-exports
pub use config::{InflateConfig, Variant};
pub use huffman::{Entry, HuffmanTable};
pub use inflate::{InflateSummary, Inflater, inflate, inflate_into, inflate_to_writer, inflate64};
pub use tables::FixedTables;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{InflateConfig, Variant};
    pub use crate::inflate::{InflateSummary, Inflater, inflate, inflate64};
    pub use winflate_core::prelude::*;
}
