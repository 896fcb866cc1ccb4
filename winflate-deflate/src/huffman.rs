//! Multi-level Huffman decoding tables.
//!
//! DEFLATE uses canonical Huffman codes: codes of the same length are
//! consecutive values, assigned in symbol order. Decoding goes through a
//! root table indexed by the next `root_bits` input bits (bit-reversed, as
//! the codes are packed MSB-first into an LSB-first stream). Codes longer
//! than the root width continue in linked subtables, which may link further.
//!
//! All tables of one code live in a single arena; links are arena indices.
//!
//! # Alphabets
//!
//! - **Literal/Length**: 0-285 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-29 (0-31 for Deflate64)
//! - **Code Length**: 0-18 (for encoding dynamic Huffman trees)
//!
//! # End-of-block boundary
//!
//! Table widths are chosen so that no table straddles the end of the
//! end-of-block code (symbol 256). Decoding the final end-of-block then never
//! asks the bit reader for bits past the last code of the stream.

use winflate_core::bitstream::BitReader;
use winflate_core::error::{InflateError, Result, TableDefect};

/// Maximum supported code length.
pub const MAX_CODE_BITS: usize = 16;

/// Maximum number of symbols in any alphabet.
pub const MAX_SYMBOLS: usize = 288;

/// End of block symbol.
pub const END_OF_BLOCK: usize = 256;

/// One decoding table slot.
///
/// `bits` is always the number of input bits to drop for the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// A symbol below the simple boundary other than end-of-block.
    Literal {
        /// Bits to drop.
        bits: u8,
        /// The symbol.
        value: u8,
    },
    /// Symbol 256 of a literal/length alphabet.
    EndOfBlock {
        /// Bits to drop.
        bits: u8,
    },
    /// Length or distance code: base value plus extra bits to read.
    Base {
        /// Bits to drop.
        bits: u8,
        /// Extra bits following the code.
        extra: u8,
        /// Base value.
        base: u16,
    },
    /// Continue in a subtable.
    Link {
        /// Bits to drop (the width of the table holding this link).
        bits: u8,
        /// Width of the subtable.
        table_bits: u8,
        /// Arena index of the subtable's first slot.
        start: u32,
    },
    /// Code that maps to no usable symbol.
    Invalid {
        /// Bits to drop.
        bits: u8,
    },
}

impl Entry {
    /// Number of bits consumed by this slot.
    #[inline]
    pub fn bits(&self) -> u8 {
        match *self {
            Self::Literal { bits, .. }
            | Self::EndOfBlock { bits }
            | Self::Base { bits, .. }
            | Self::Link { bits, .. }
            | Self::Invalid { bits } => bits,
        }
    }
}

/// Decoding tables for one canonical Huffman code.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Root table followed by all subtables.
    entries: Vec<Entry>,
    /// Width of the root table.
    root_bits: u8,
    /// Code leaves part of the code space unused.
    incomplete: bool,
}

impl HuffmanTable {
    /// Build decoding tables from code lengths.
    ///
    /// - `lengths[sym]` is the code length of `sym` (0 = unused, at most 16)
    /// - symbols below `simple` decode to themselves
    /// - symbol `sym >= simple` decodes to `bases[sym - simple]` with
    ///   `extra[sym - simple]` extra bits; symbols past the end of those
    ///   lists decode to [`Entry::Invalid`]
    /// - `max_root_bits` is the requested root width; the actual width is
    ///   clamped to the shortest and longest code length and reported by
    ///   [`root_bits`](Self::root_bits)
    ///
    /// Incomplete codes are built with the unused slots marked invalid and
    /// flagged (see [`is_incomplete`](Self::is_incomplete)).
    pub fn build(
        lengths: &[u8],
        simple: usize,
        bases: &[u16],
        extra: &[u8],
        max_root_bits: u8,
    ) -> Result<Self> {
        if lengths.len() > MAX_SYMBOLS {
            return Err(InflateError::invalid_table(TableDefect::TooManyCodes));
        }

        // Count codes per length.
        let mut count = [0u32; MAX_CODE_BITS + 1];
        for &len in lengths {
            if len as usize > MAX_CODE_BITS {
                return Err(InflateError::invalid_table(TableDefect::CodeTooLong));
            }
            count[len as usize] += 1;
        }
        if count[0] as usize == lengths.len() {
            return Err(InflateError::invalid_table(TableDefect::EmptyCodeSet));
        }

        // Length of the end-of-block code, if this alphabet has one.
        let eob_bits = if lengths.len() > END_OF_BLOCK {
            lengths[END_OF_BLOCK] as u32
        } else {
            MAX_CODE_BITS as u32
        };

        let shortest = (1..=MAX_CODE_BITS).find(|&l| count[l] != 0).unwrap_or(1);
        let longest = (1..=MAX_CODE_BITS).rev().find(|&l| count[l] != 0).unwrap_or(1);
        let max_bits = (max_root_bits as usize).clamp(shortest, longest) as u32;

        // Check the Kraft sum and pad the longest length with dummy codes.
        let mut unused: i64 = 1 << shortest;
        for &c in &count[shortest..longest] {
            unused -= c as i64;
            if unused < 0 {
                return Err(InflateError::invalid_table(TableDefect::OverSubscribed));
            }
            unused <<= 1;
        }
        unused -= count[longest] as i64;
        if unused < 0 {
            return Err(InflateError::invalid_table(TableDefect::OverSubscribed));
        }
        count[longest] += unused as u32;

        // Symbols sorted by code length, then by symbol.
        let mut offsets = [0usize; MAX_CODE_BITS + 2];
        for len in 1..longest {
            offsets[len + 1] = offsets[len] + count[len] as usize;
        }
        let mut sorted = [0u16; MAX_SYMBOLS];
        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                sorted[offsets[len as usize]] = sym as u16;
                offsets[len as usize] += 1;
            }
        }
        let real_codes = offsets[longest];

        let mut entries: Vec<Entry> = Vec::new();

        // Table stack; depth 0 is "no table yet".
        let mut table_bits = [0u32; MAX_CODE_BITS + 2];
        let mut table_start = [0usize; MAX_CODE_BITS + 2];
        let mut table_prefix = [0u32; MAX_CODE_BITS + 2];
        let mut depth = 0usize;
        // Bits decoded by the tables above the deepest one.
        let mut skipped = 0u32;

        let mut code = 0u32;
        let mut next_value = 0usize;

        for len in shortest..=longest {
            let len = len as u32;
            let mut left = count[len as usize];
            while left > 0 {
                left -= 1;

                // Open tables until the current code fits.
                while len > skipped + table_bits[depth] {
                    skipped += table_bits[depth];
                    depth += 1;

                    let limit = (longest as u32 - skipped).min(max_bits);
                    let mut bits = len - skipped;
                    let mut slots = 1u32 << bits;
                    if slots > left + 1 && bits < limit {
                        // Too few codes of this length; grow while the
                        // longer codes still fill the table.
                        slots -= left + 1;
                        let mut next_len = len as usize;
                        loop {
                            bits += 1;
                            if bits >= limit {
                                break;
                            }
                            slots <<= 1;
                            next_len += 1;
                            if slots <= count[next_len] {
                                break;
                            }
                            slots -= count[next_len];
                        }
                    }
                    if skipped + bits > eob_bits && skipped < eob_bits {
                        bits = eob_bits - skipped;
                    }

                    let size = 1usize << bits;
                    let start = entries.len();
                    entries.try_reserve(size).map_err(|_| {
                        InflateError::allocation_failure(size * std::mem::size_of::<Entry>())
                    })?;
                    entries.resize(start + size, Entry::Invalid { bits: 0 });

                    table_bits[depth] = bits;
                    table_start[depth] = start;

                    if depth > 1 {
                        table_prefix[depth] = code;
                        let parent_bits = table_bits[depth - 1];
                        let index = (code & ((1 << skipped) - 1)) >> (skipped - parent_bits);
                        entries[table_start[depth - 1] + index as usize] = Entry::Link {
                            bits: parent_bits as u8,
                            table_bits: bits as u8,
                            start: start as u32,
                        };
                    }
                }

                let drop = (len - skipped) as u8;
                let entry = if next_value >= real_codes {
                    Entry::Invalid { bits: drop }
                } else {
                    let sym = sorted[next_value] as usize;
                    next_value += 1;
                    symbol_entry(sym, drop, simple, bases, extra)
                };

                // Replicate over every slot whose low bits match the code.
                let step = 1usize << (len - skipped);
                let size = 1usize << table_bits[depth];
                let start = table_start[depth];
                let mut slot = (code >> skipped) as usize;
                while slot < size {
                    entries[start + slot] = entry;
                    slot += step;
                }

                // Bit-reversed increment of the code.
                let mut bit = 1u32 << (len - 1);
                while code & bit != 0 {
                    code ^= bit;
                    bit >>= 1;
                }
                code ^= bit;

                // Back up over finished tables.
                while code & ((1 << skipped) - 1) != table_prefix[depth] {
                    depth -= 1;
                    skipped -= table_bits[depth];
                }
            }
        }

        let incomplete = unused != 0 && longest != 1;
        log::trace!(
            "built Huffman table: {} codes, lengths {}..={}, root {} bits, {} slots{}",
            real_codes,
            shortest,
            longest,
            table_bits[1],
            entries.len(),
            if incomplete { ", incomplete" } else { "" }
        );

        Ok(Self {
            entries,
            root_bits: table_bits[1] as u8,
            incomplete,
        })
    }

    /// Width of the root table.
    pub fn root_bits(&self) -> u8 {
        self.root_bits
    }

    /// True if the code leaves unused code space.
    ///
    /// A code whose only length is 1 bit is not reported, since a single
    /// code is sent as one bit.
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    /// Reject an incomplete code.
    pub fn require_complete(self) -> Result<Self> {
        if self.incomplete {
            return Err(InflateError::invalid_table(TableDefect::Incomplete));
        }
        Ok(self)
    }

    /// Total number of slots over all levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode the next code and return its leaf slot.
    ///
    /// The code's bits are consumed. [`Entry::Invalid`] is returned as is;
    /// the caller decides which error it means.
    #[inline]
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<Entry> {
        reader.need_bits(self.root_bits)?;
        let mut entry = self.entries[reader.peek_bits(self.root_bits) as usize];

        while let Entry::Link {
            bits,
            table_bits,
            start,
        } = entry
        {
            reader.dump_bits(bits);
            reader.need_bits(table_bits)?;
            entry = self.entries[start as usize + reader.peek_bits(table_bits) as usize];
        }

        reader.dump_bits(entry.bits());
        Ok(entry)
    }
}

fn symbol_entry(sym: usize, bits: u8, simple: usize, bases: &[u16], extra: &[u8]) -> Entry {
    if sym < simple {
        match sym {
            END_OF_BLOCK => Entry::EndOfBlock { bits },
            0..=255 => Entry::Literal {
                bits,
                value: sym as u8,
            },
            _ => Entry::Invalid { bits },
        }
    } else {
        let index = sym - simple;
        match (bases.get(index), extra.get(index)) {
            (Some(&base), Some(&extra)) => Entry::Base { bits, extra, base },
            _ => Entry::Invalid { bits },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack MSB-first Huffman codes into an LSB-first byte stream.
    fn pack_codes(codes: &[(u32, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc = 0u32;
        let mut n = 0u8;
        for &(code, len) in codes {
            for i in (0..len).rev() {
                acc |= ((code >> i) & 1) << n;
                n += 1;
                if n == 8 {
                    out.push(acc as u8);
                    acc = 0;
                    n = 0;
                }
            }
        }
        if n > 0 {
            out.push(acc as u8);
        }
        out
    }

    #[test]
    fn test_complete_code() {
        let table = HuffmanTable::build(&[2, 2, 2, 2], 4, &[], &[], 7).unwrap();
        assert!(!table.is_incomplete());
        assert_eq!(table.root_bits(), 2);
        assert_eq!(table.len(), 4);

        let data = pack_codes(&[(0b01, 2), (0b11, 2), (0b00, 2), (0b10, 2)]);
        let mut reader = BitReader::new(&data);
        let symbols: Vec<Entry> = (0..4).map(|_| table.decode(&mut reader).unwrap()).collect();
        assert_eq!(
            symbols,
            vec![
                Entry::Literal { bits: 2, value: 1 },
                Entry::Literal { bits: 2, value: 3 },
                Entry::Literal { bits: 2, value: 0 },
                Entry::Literal { bits: 2, value: 2 },
            ]
        );
    }

    #[test]
    fn test_over_subscribed() {
        let err = HuffmanTable::build(&[1, 1, 1], 3, &[], &[], 7).unwrap_err();
        assert_eq!(err.table_defect(), Some(TableDefect::OverSubscribed));
    }

    #[test]
    fn test_single_one_bit_code_is_complete() {
        let table = HuffmanTable::build(&[1], 1, &[], &[], 7).unwrap();
        assert!(!table.is_incomplete());
        assert!(table.clone().require_complete().is_ok());

        let mut reader = BitReader::new(&[0b10]);
        assert_eq!(
            table.decode(&mut reader).unwrap(),
            Entry::Literal { bits: 1, value: 0 }
        );
        assert_eq!(table.decode(&mut reader).unwrap(), Entry::Invalid { bits: 1 });
    }

    #[test]
    fn test_incomplete_code_flagged() {
        let table = HuffmanTable::build(&[1, 2], 2, &[], &[], 7).unwrap();
        assert!(table.is_incomplete());
        assert_eq!(
            table.require_complete().unwrap_err().table_defect(),
            Some(TableDefect::Incomplete)
        );
    }

    #[test]
    fn test_empty_and_too_long() {
        let err = HuffmanTable::build(&[0, 0, 0], 3, &[], &[], 7).unwrap_err();
        assert_eq!(err.table_defect(), Some(TableDefect::EmptyCodeSet));

        let err = HuffmanTable::build(&[17, 1], 2, &[], &[], 7).unwrap_err();
        assert_eq!(err.table_defect(), Some(TableDefect::CodeTooLong));

        let err = HuffmanTable::build(&[1; MAX_SYMBOLS + 1], 0, &[], &[], 7).unwrap_err();
        assert_eq!(err.table_defect(), Some(TableDefect::TooManyCodes));
    }

    #[test]
    fn test_root_width_clamped() {
        // Shortest code longer than the request.
        let lengths = [3u8; 8];
        let table = HuffmanTable::build(&lengths, 8, &[], &[], 1).unwrap();
        assert_eq!(table.root_bits(), 3);

        // Longest code shorter than the request.
        let table = HuffmanTable::build(&lengths, 8, &[], &[], 9).unwrap();
        assert_eq!(table.root_bits(), 3);
    }

    #[test]
    fn test_subtables() {
        // 1, 2, 3, ... 15, 15: a maximally skewed complete code.
        let mut lengths: Vec<u8> = (1..=15).collect();
        lengths.push(15);
        let table = HuffmanTable::build(&lengths, 16, &[], &[], 4).unwrap();
        assert!(!table.is_incomplete());
        assert_eq!(table.root_bits(), 4);
        assert!(table.len() > 16);

        // Canonical codes: sym n (n < 15) is n ones followed by a zero.
        let codes: Vec<(u32, u8)> = (0..16u32)
            .map(|sym| {
                let len = lengths[sym as usize];
                let code = if sym < 15 { ((1u32 << len) - 1) ^ 1 } else { (1u32 << 15) - 1 };
                (code, len)
            })
            .collect();
        let data = pack_codes(&codes);
        let mut reader = BitReader::new(&data);
        for sym in 0..16u8 {
            let entry = table.decode(&mut reader).unwrap();
            assert_eq!(
                entry,
                Entry::Literal {
                    bits: entry.bits(),
                    value: sym
                }
            );
        }
    }

    #[test]
    fn test_base_entries() {
        // Symbols 0, 1 simple; 2, 3 map to bases; 4 past the base list.
        let bases = [10u16, 20];
        let extra = [1u8, 2];
        let table = HuffmanTable::build(&[3, 3, 3, 3, 3], 2, &bases, &extra, 7).unwrap();
        assert!(table.is_incomplete());

        let data = pack_codes(&[(0b010, 3), (0b011, 3), (0b100, 3)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            table.decode(&mut reader).unwrap(),
            Entry::Base {
                bits: 3,
                extra: 1,
                base: 10
            }
        );
        assert_eq!(
            table.decode(&mut reader).unwrap(),
            Entry::Base {
                bits: 3,
                extra: 2,
                base: 20
            }
        );
        assert_eq!(table.decode(&mut reader).unwrap(), Entry::Invalid { bits: 3 });
    }

    #[test]
    fn test_root_never_extends_past_end_of_block() {
        // 'a' = 1 bit, EOB = 2 bits, lengths 257/258 = 3 bits.
        let mut lengths = [0u8; 259];
        lengths[b'a' as usize] = 1;
        lengths[END_OF_BLOCK] = 2;
        lengths[257] = 3;
        lengths[258] = 3;

        let table = HuffmanTable::build(&lengths, 257, &[3, 4], &[0, 0], 9).unwrap();
        assert_eq!(table.root_bits(), 2);
        assert!(!table.is_incomplete());

        // 'a' then EOB: three bits, one byte. Nothing past it is read.
        let data = pack_codes(&[(0b0, 1), (0b10, 2)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            table.decode(&mut reader).unwrap(),
            Entry::Literal {
                bits: 1,
                value: b'a'
            }
        );
        assert_eq!(
            table.decode(&mut reader).unwrap(),
            Entry::EndOfBlock { bits: 2 }
        );
        assert!(!reader.is_exhausted());
    }

    #[test]
    fn test_truncated_code() {
        let table = HuffmanTable::build(&[2, 2, 2, 2], 4, &[], &[], 7).unwrap();
        let mut reader = BitReader::new(&[]);
        assert!(matches!(
            table.decode(&mut reader),
            Err(InflateError::InputExhausted { .. })
        ));
    }
}
