//! DEFLATE decompression (inflate).
//!
//! This module implements the DEFLATE decompression algorithm as specified
//! in RFC 1951, plus the Deflate64 variant. It supports all three block types:
//! - Type 0: Stored (uncompressed)
//! - Type 1: Fixed Huffman codes
//! - Type 2: Dynamic Huffman codes
//!
//! A session reads one complete stream from a borrowed slice and pushes the
//! output through the sliding window into an [`OutputSink`].

use crate::config::InflateConfig;
use crate::huffman::{Entry, HuffmanTable};
use crate::tables::{CODE_LENGTH_ORDER, CodeTables, FixedTables, LITERAL_SIMPLE};
use std::io::Write;
use winflate_core::bitstream::BitReader;
use winflate_core::error::{Alphabet, InflateError, Result, TableDefect};
use winflate_core::sink::{OutputSink, SliceSink, WriteSink};
use winflate_core::window::SlidingWindow;

/// Root width of the code length table.
const CODE_LENGTH_BITS: u8 = 7;

/// Size of the code length alphabet.
const CODE_LENGTH_CODES: usize = 19;

/// Longest combined literal/length + distance length list (Deflate64).
const MAX_DYNAMIC_LENGTHS: usize = 286 + 32;

/// Result of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateSummary {
    /// Input bytes touched by the stream, including a partial last byte.
    pub bytes_consumed: usize,
    /// Decompressed bytes delivered to the sink.
    pub bytes_produced: u64,
    /// CRC-32 of the decompressed bytes.
    pub crc32: u32,
    /// Number of blocks in the stream.
    pub blocks: u64,
}

/// Kind of a DEFLATE block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockType {
    Stored,
    Fixed,
    Dynamic,
}

impl BlockType {
    fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            0 => Ok(Self::Stored),
            1 => Ok(Self::Fixed),
            2 => Ok(Self::Dynamic),
            other => Err(InflateError::invalid_block_type(other as u8)),
        }
    }
}

/// DEFLATE / Deflate64 decompressor.
///
/// Owns the sliding window; fixed Huffman tables are borrowed, either from
/// the process-wide cache or from the caller.
#[derive(Debug)]
pub struct Inflater<'t> {
    config: InflateConfig,
    codes: CodeTables,
    window: SlidingWindow,
    fixed: Option<&'t FixedTables>,
    blocks: u64,
}

impl<'t> Inflater<'t> {
    /// Create a decompressor.
    ///
    /// Fixed tables come from [`FixedTables::shared`] on the first fixed block.
    pub fn new(config: InflateConfig) -> Result<Self> {
        config.validate()?;
        let window =
            SlidingWindow::with_minimum(config.window_size, config.variant.min_window_size())?;

        Ok(Self {
            config,
            codes: CodeTables::for_variant(config.variant),
            window,
            fixed: None,
            blocks: 0,
        })
    }

    /// Create a decompressor that decodes fixed blocks with `fixed`.
    pub fn with_fixed_tables(config: InflateConfig, fixed: &'t FixedTables) -> Result<Self> {
        if fixed.variant() != config.variant {
            return Err(InflateError::invalid_config(format!(
                "fixed tables are for {}, configuration is {}",
                fixed.variant().name(),
                config.variant.name()
            )));
        }
        let mut inflater = Self::new(config)?;
        inflater.fixed = Some(fixed);
        Ok(inflater)
    }

    /// Configuration of this decompressor.
    pub fn config(&self) -> &InflateConfig {
        &self.config
    }

    /// Decompress one complete stream from `input` into `sink`.
    ///
    /// Every call is a new session: the window history and counters start
    /// empty. On error, bytes already handed to the sink stay delivered and
    /// nothing else is flushed.
    pub fn inflate<S: OutputSink + ?Sized>(
        &mut self,
        input: &[u8],
        sink: &mut S,
    ) -> Result<InflateSummary> {
        self.window.reset();
        self.blocks = 0;

        let mut reader = BitReader::new(input);
        loop {
            let last = self.inflate_block(&mut reader, sink)?;
            if last {
                break;
            }
        }
        self.window.finish(sink)?;

        let summary = InflateSummary {
            bytes_consumed: reader.bytes_consumed(),
            bytes_produced: self.window.delivered(),
            crc32: self.window.crc32(),
            blocks: self.blocks,
        };
        log::debug!(
            "inflated {} bytes from {} in {} blocks, crc32 {:08x}",
            summary.bytes_produced,
            summary.bytes_consumed,
            summary.blocks,
            summary.crc32
        );
        Ok(summary)
    }

    /// Decompress a single block. Returns true for the final block.
    fn inflate_block<S: OutputSink + ?Sized>(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut S,
    ) -> Result<bool> {
        let last = reader.take_bits(1)? == 1;
        let block_type = BlockType::from_bits(reader.take_bits(2)?)?;
        self.blocks += 1;

        log::debug!(
            "block {} at bit {}: {:?}{}",
            self.blocks,
            reader.bit_position() - 3,
            block_type,
            if last { " (final)" } else { "" }
        );

        match block_type {
            BlockType::Stored => self.inflate_stored(reader, sink)?,
            BlockType::Fixed => self.inflate_fixed(reader, sink)?,
            BlockType::Dynamic => self.inflate_dynamic(reader, sink)?,
        }
        Ok(last)
    }

    /// Decompress a stored (uncompressed) block.
    fn inflate_stored<S: OutputSink + ?Sized>(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut S,
    ) -> Result<()> {
        reader.align_to_byte();

        let len = reader.take_bits(16)? as u16;
        let nlen = reader.take_bits(16)? as u16;
        if len != !nlen {
            return Err(InflateError::stored_length_mismatch(len, nlen));
        }

        let bytes = reader.take_aligned_bytes(len as usize)?;
        self.window.write_bytes(bytes, sink)
    }

    /// Decompress a block with fixed Huffman codes.
    fn inflate_fixed<S: OutputSink + ?Sized>(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut S,
    ) -> Result<()> {
        let fixed = match self.fixed {
            Some(tables) => tables,
            None => {
                let tables = FixedTables::shared(self.config.variant)?;
                self.fixed = Some(tables);
                tables
            }
        };

        self.inflate_codes(reader, sink, fixed.literal(), Some(fixed.distance()))
    }

    /// Decompress a block with dynamic Huffman codes.
    fn inflate_dynamic<S: OutputSink + ?Sized>(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut S,
    ) -> Result<()> {
        let variant = self.config.variant;

        let hlit = reader.take_bits(5)? as usize + 257;
        let hdist = reader.take_bits(5)? as usize + 1;
        let hclen = reader.take_bits(4)? as usize + 4;
        if hlit > variant.max_literal_codes() || hdist > variant.max_distance_codes() {
            return Err(InflateError::invalid_table(TableDefect::TooManyCodes));
        }

        let mut code_length_lengths = [0u8; CODE_LENGTH_CODES];
        for &sym in &CODE_LENGTH_ORDER[..hclen] {
            code_length_lengths[sym] = reader.take_bits(3)? as u8;
        }
        let code_length_table = HuffmanTable::build(
            &code_length_lengths,
            CODE_LENGTH_CODES,
            &[],
            &[],
            CODE_LENGTH_BITS,
        )?
        .require_complete()?;

        let total = hlit + hdist;
        let mut lengths = [0u8; MAX_DYNAMIC_LENGTHS];
        let mut i = 0;
        while i < total {
            let sym = match code_length_table.decode(reader)? {
                Entry::Literal { value, .. } => value,
                _ => {
                    return Err(InflateError::invalid_symbol(
                        Alphabet::CodeLength,
                        reader.bit_position(),
                    ));
                }
            };

            let (value, repeat) = match sym {
                0..=15 => (sym, 1),
                16 => {
                    if i == 0 {
                        return Err(InflateError::invalid_table(
                            TableDefect::RepeatWithoutPrevious,
                        ));
                    }
                    (lengths[i - 1], 3 + reader.take_bits(2)? as usize)
                }
                17 => (0, 3 + reader.take_bits(3)? as usize),
                18 => (0, 11 + reader.take_bits(7)? as usize),
                _ => {
                    return Err(InflateError::invalid_symbol(
                        Alphabet::CodeLength,
                        reader.bit_position(),
                    ));
                }
            };

            if i + repeat > total {
                return Err(InflateError::invalid_table(TableDefect::RepeatOverrun));
            }
            lengths[i..i + repeat].fill(value);
            i += repeat;
        }

        let literal = HuffmanTable::build(
            &lengths[..hlit],
            LITERAL_SIMPLE,
            self.codes.length_base,
            self.codes.length_extra,
            self.config.literal_bits,
        )?
        .require_complete()?;

        let distance = match HuffmanTable::build(
            &lengths[hlit..total],
            0,
            self.codes.distance_base(),
            self.codes.distance_extra(),
            self.config.distance_bits,
        ) {
            Ok(table) if table.is_incomplete() => {
                if !self.config.lenient_distance_codes {
                    return Err(InflateError::invalid_table(TableDefect::Incomplete));
                }
                log::warn!(
                    "block {}: accepting incomplete distance code ({} codes)",
                    self.blocks,
                    hdist
                );
                Some(table)
            }
            Ok(table) => Some(table),
            Err(e) if e.table_defect() == Some(TableDefect::EmptyCodeSet) => {
                if hlit > LITERAL_SIMPLE {
                    return Err(InflateError::invalid_table(
                        TableDefect::MissingDistanceCodes,
                    ));
                }
                None
            }
            Err(e) => return Err(e),
        };

        log::debug!(
            "dynamic header: {} literal/length, {} distance, {} code length codes; roots {}/{} bits",
            hlit,
            hdist,
            hclen,
            literal.root_bits(),
            distance.as_ref().map_or(0, HuffmanTable::root_bits)
        );

        self.inflate_codes(reader, sink, &literal, distance.as_ref())
    }

    /// Decode literals and back-references until end-of-block.
    fn inflate_codes<S: OutputSink + ?Sized>(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut S,
        literal: &HuffmanTable,
        distance: Option<&HuffmanTable>,
    ) -> Result<()> {
        loop {
            match literal.decode(reader)? {
                Entry::Literal { value, .. } => self.window.push(value, sink)?,
                Entry::EndOfBlock { .. } => return Ok(()),
                Entry::Base { extra, base, .. } => {
                    let length = base as usize + reader.take_bits(extra)? as usize;

                    let Some(distance_table) = distance else {
                        return Err(InflateError::invalid_symbol(
                            Alphabet::LiteralLength,
                            reader.bit_position(),
                        ));
                    };
                    let distance = match distance_table.decode(reader)? {
                        Entry::Base { extra, base, .. } => {
                            base as usize + reader.take_bits(extra)? as usize
                        }
                        _ => {
                            return Err(InflateError::invalid_symbol(
                                Alphabet::Distance,
                                reader.bit_position(),
                            ));
                        }
                    };

                    self.window.copy_match(distance, length, sink)?;
                }
                Entry::Invalid { .. } | Entry::Link { .. } => {
                    return Err(InflateError::invalid_symbol(
                        Alphabet::LiteralLength,
                        reader.bit_position(),
                    ));
                }
            }
        }
    }
}

/// Decompress a DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    inflate_with(data, InflateConfig::DEFLATE)
}

/// Decompress a Deflate64 stream.
pub fn inflate64(data: &[u8]) -> Result<Vec<u8>> {
    inflate_with(data, InflateConfig::DEFLATE64)
}

fn inflate_with(data: &[u8], config: InflateConfig) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    Inflater::new(config)?.inflate(data, &mut output)?;
    Ok(output)
}

/// Decompress a DEFLATE stream into a caller buffer.
///
/// Returns the number of bytes written. Output that does not fit fails
/// with [`InflateError::OutputSinkFailure`].
pub fn inflate_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut sink = SliceSink::new(out);
    Inflater::new(InflateConfig::DEFLATE)?.inflate(data, &mut sink)?;
    Ok(sink.len())
}

/// Decompress a DEFLATE stream into a writer.
pub fn inflate_to_writer<W: Write>(data: &[u8], writer: W) -> Result<InflateSummary> {
    let mut sink = WriteSink::new(writer);
    Inflater::new(InflateConfig::DEFLATE)?.inflate(data, &mut sink)
}
