//! Code tables for DEFLATE (RFC 1951) and Deflate64.
//!
//! Length and distance symbols carry a base value plus a number of extra
//! bits. Deflate64 redefines length code 285 (3 + 16 extra bits instead of
//! a fixed 258) and adds distance codes 30 and 31 for its 64 KB window.
//!
//! Fixed Huffman tables are built on first use and shared process-wide,
//! one set per variant.

use crate::config::Variant;
use crate::huffman::HuffmanTable;
use std::sync::OnceLock;
use winflate_core::error::Result;

/// Length code base values for codes 257-285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264: 0 extra bits
    11, 13, 15, 17, // 265-268: 1 extra bit
    19, 23, 27, 31, // 269-272: 2 extra bits
    35, 43, 51, 59, // 273-276: 3 extra bits
    67, 83, 99, 115, // 277-280: 4 extra bits
    131, 163, 195, 227, // 281-284: 5 extra bits
    258, // 285: 0 extra bits
];

/// Number of extra bits for length codes 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, // 257-264
    1, 1, 1, 1, // 265-268
    2, 2, 2, 2, // 269-272
    3, 3, 3, 3, // 273-276
    4, 4, 4, 4, // 277-280
    5, 5, 5, 5, // 281-284
    0, // 285
];

/// Deflate64 length base values: code 285 is 3 plus 16 extra bits.
pub const LENGTH_BASE_64: [u16; 29] = {
    let mut table = LENGTH_BASE;
    table[28] = 3;
    table
};

/// Deflate64 extra bits for length codes 257-285.
pub const LENGTH_EXTRA_BITS_64: [u8; 29] = {
    let mut table = LENGTH_EXTRA_BITS;
    table[28] = 16;
    table
};

/// Distance code base values for codes 0-31 (30 and 31 are Deflate64 only).
pub static DISTANCE_BASE: [u16; 32] = [
    1, 2, 3, 4, // 0-3: 0 extra bits
    5, 7, // 4-5: 1 extra bit
    9, 13, // 6-7: 2 extra bits
    17, 25, // 8-9: 3 extra bits
    33, 49, // 10-11: 4 extra bits
    65, 97, // 12-13: 5 extra bits
    129, 193, // 14-15: 6 extra bits
    257, 385, // 16-17: 7 extra bits
    513, 769, // 18-19: 8 extra bits
    1025, 1537, // 20-21: 9 extra bits
    2049, 3073, // 22-23: 10 extra bits
    4097, 6145, // 24-25: 11 extra bits
    8193, 12289, // 26-27: 12 extra bits
    16385, 24577, // 28-29: 13 extra bits
    32769, 49153, // 30-31: 14 extra bits
];

/// Number of extra bits for distance codes 0-31.
pub static DISTANCE_EXTRA_BITS: [u8; 32] = [
    0, 0, 0, 0, // 0-3
    1, 1, // 4-5
    2, 2, // 6-7
    3, 3, // 8-9
    4, 4, // 10-11
    5, 5, // 12-13
    6, 6, // 14-15
    7, 7, // 16-17
    8, 8, // 18-19
    9, 9, // 20-21
    10, 10, // 22-23
    11, 11, // 24-25
    12, 12, // 26-27
    13, 13, // 28-29
    14, 14, // 30-31
];

/// Order of code length codes in a dynamic block header.
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Number of simple (self-decoding) literal/length symbols: 0-255 and EOB.
pub const LITERAL_SIMPLE: usize = 257;

/// Root width of the fixed literal/length table.
pub const FIXED_LITERAL_BITS: u8 = 7;

/// Root width of the fixed distance table.
pub const FIXED_DISTANCE_BITS: u8 = 5;

/// Fixed literal/length code lengths (RFC 1951 Section 3.2.6).
///
/// - Symbols 0-143: 8 bits
/// - Symbols 144-255: 9 bits
/// - Symbols 256-279: 7 bits
/// - Symbols 280-287: 8 bits
///
/// 286 and 287 only complete the code; they decode as invalid.
pub fn fixed_litlen_lengths() -> [u8; 288] {
    let mut lengths = [8u8; 288];
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths
}

/// Base/extra lists of one variant.
#[derive(Debug, Clone, Copy)]
pub struct CodeTables {
    /// Length base values for codes 257-285.
    pub length_base: &'static [u16; 29],
    /// Extra bits for codes 257-285.
    pub length_extra: &'static [u8; 29],
    /// Number of usable distance codes.
    pub distance_codes: usize,
}

impl CodeTables {
    /// Standard DEFLATE lists (30 distance codes).
    pub const DEFLATE: Self = Self {
        length_base: &LENGTH_BASE,
        length_extra: &LENGTH_EXTRA_BITS,
        distance_codes: 30,
    };

    /// Deflate64 lists (32 distance codes).
    pub const DEFLATE64: Self = Self {
        length_base: &LENGTH_BASE_64,
        length_extra: &LENGTH_EXTRA_BITS_64,
        distance_codes: 32,
    };

    /// Lists for a variant.
    pub const fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Deflate => Self::DEFLATE,
            Variant::Deflate64 => Self::DEFLATE64,
        }
    }

    /// Distance base values of the usable codes.
    pub fn distance_base(&self) -> &'static [u16] {
        &DISTANCE_BASE[..self.distance_codes]
    }

    /// Extra bits of the usable distance codes.
    pub fn distance_extra(&self) -> &'static [u8] {
        &DISTANCE_EXTRA_BITS[..self.distance_codes]
    }
}

/// Decoding tables for fixed Huffman blocks.
#[derive(Debug, Clone)]
pub struct FixedTables {
    variant: Variant,
    literal: HuffmanTable,
    distance: HuffmanTable,
}

impl FixedTables {
    /// Build the fixed tables of a variant.
    ///
    /// The literal/length code is complete. The distance code (30 or 32
    /// five-bit codes) is incomplete for DEFLATE and accepted as such.
    pub fn new(variant: Variant) -> Result<Self> {
        let codes = CodeTables::for_variant(variant);

        let literal = HuffmanTable::build(
            &fixed_litlen_lengths(),
            LITERAL_SIMPLE,
            codes.length_base,
            codes.length_extra,
            FIXED_LITERAL_BITS,
        )?;

        let distance_lengths = [5u8; 32];
        let distance = HuffmanTable::build(
            &distance_lengths[..variant.max_distance_codes()],
            0,
            codes.distance_base(),
            codes.distance_extra(),
            FIXED_DISTANCE_BITS,
        )?;

        log::debug!(
            "built fixed {} tables: literal root {} bits ({} slots), distance root {} bits",
            variant.name(),
            literal.root_bits(),
            literal.len(),
            distance.root_bits()
        );

        Ok(Self {
            variant,
            literal,
            distance,
        })
    }

    /// Process-wide fixed tables of a variant, built on first use.
    pub fn shared(variant: Variant) -> Result<&'static Self> {
        static DEFLATE: OnceLock<FixedTables> = OnceLock::new();
        static DEFLATE64: OnceLock<FixedTables> = OnceLock::new();

        let cell = match variant {
            Variant::Deflate => &DEFLATE,
            Variant::Deflate64 => &DEFLATE64,
        };
        if let Some(tables) = cell.get() {
            return Ok(tables);
        }

        // Concurrent first users may each build a copy; one is kept, the
        // rest are dropped. The build is pure, so every copy is identical.
        let tables = Self::new(variant)?;
        Ok(cell.get_or_init(|| tables))
    }

    /// Variant these tables decode.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Literal/length table.
    pub fn literal(&self) -> &HuffmanTable {
        &self.literal
    }

    /// Distance table.
    pub fn distance(&self) -> &HuffmanTable {
        &self.distance
    }
}
