//! # winflate Core
//!
//! Core components for the winflate decompressor.
//!
//! This crate provides the building blocks the inflate engine is made of:
//!
//! - [`bitstream`]: LSB-first bit reader over a borrowed input slice
//! - [`window`]: Sliding window that doubles as the output staging buffer
//! - [`sink`]: Output sinks receiving flushed runs of decompressed bytes
//! - [`crc`]: CRC-32 over delivered output
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! winflate is designed as a layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front end                                           │
//! │     winflate CLI, convenience functions                │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Block decoding, Huffman tables, Deflate64 tables    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     BitReader, SlidingWindow, OutputSink, CRC-32        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use winflate_core::bitstream::BitReader;
//! use winflate_core::window::SlidingWindow;
//!
//! let data = [0x01u8, 0x02];
//! let mut reader = BitReader::new(&data);
//! let value = reader.take_bits(12).unwrap();
//! assert_eq!(value, 0x201);
//!
//! let mut window = SlidingWindow::new(32768).unwrap();
//! let mut out = Vec::new();
//! window.write_bytes(b"ab", &mut out).unwrap();
//! window.copy_match(2, 4, &mut out).unwrap();
//! window.finish(&mut out).unwrap();
//! assert_eq!(out, b"ababab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod sink;
pub mod window;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use crc::{Crc32, crc32_update};
pub use error::{Alphabet, InflateError, Result, TableDefect};
#[cfg(feature = "mmap")]
pub use mmap::MappedInput;
pub use sink::{DiscardSink, OutputSink, SliceSink, WriteSink};
pub use window::SlidingWindow;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::BitReader;
    pub use crate::crc::Crc32;
    pub use crate::error::{InflateError, Result};
    pub use crate::sink::{OutputSink, WriteSink};
    pub use crate::window::SlidingWindow;
}
