//! Helpers for writing DEFLATE bitstreams by hand.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;

/// LSB-first bit writer.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    buffer: u64,
    bits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `count` bits of `value`, least significant first.
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        self.buffer |= ((value as u64) & ((1u64 << count) - 1)) << self.bits;
        self.bits += count;
        while self.bits >= 8 {
            self.bytes.push(self.buffer as u8);
            self.buffer >>= 8;
            self.bits -= 8;
        }
    }

    /// Write a Huffman code, most significant bit first.
    pub fn write_code(&mut self, code: u32, len: u8) {
        let mut reversed = 0;
        for i in 0..len {
            reversed |= ((code >> i) & 1) << (len - 1 - i);
        }
        self.write_bits(reversed, len as u32);
    }

    /// Block header: final flag and block type.
    pub fn block_header(&mut self, last: bool, block_type: u32) {
        self.write_bits(last as u32, 1);
        self.write_bits(block_type, 2);
    }

    pub fn align(&mut self) {
        if self.bits > 0 {
            self.write_bits(0, 8 - self.bits);
        }
    }

    /// Complete stored block, including its header.
    pub fn stored_block(&mut self, last: bool, data: &[u8]) {
        self.block_header(last, 0);
        self.align();
        let len = data.len() as u16;
        self.write_bits(len as u32, 16);
        self.write_bits(!len as u32, 16);
        self.bytes.extend_from_slice(data);
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.bytes
    }
}

/// Canonical codes for a list of code lengths (RFC 1951 Section 3.2.2).
pub fn canonical_codes(lengths: &[u8]) -> Vec<u32> {
    let mut count = [0u32; 17];
    for &len in lengths {
        count[len as usize] += 1;
    }
    count[0] = 0;

    let mut next = [0u32; 17];
    let mut code = 0;
    for bits in 1..17 {
        code = (code + count[bits - 1]) << 1;
        next[bits] = code;
    }

    lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                0
            } else {
                let code = next[len as usize];
                next[len as usize] += 1;
                code
            }
        })
        .collect()
}

/// Write a literal/length symbol with the fixed code.
pub fn fixed_symbol(w: &mut BitWriter, sym: u32) {
    match sym {
        0..=143 => w.write_code(0x30 + sym, 8),
        144..=255 => w.write_code(0x190 + sym - 144, 9),
        256..=279 => w.write_code(sym - 256, 7),
        _ => w.write_code(0xC0 + sym - 280, 8),
    }
}

/// Write a distance code with the fixed code.
pub fn fixed_distance(w: &mut BitWriter, code: u32) {
    w.write_code(code, 5);
}

/// Complete code-length code: 0-15 five bits, 16 two bits, 17 and 18 three.
pub const CODE_LENGTH_LENGTHS: [u8; 19] = [5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 2, 3, 3];

const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Run-length encode code lengths into (symbol, extra) pairs.
pub fn encode_lengths(lengths: &[u8]) -> Vec<(u8, u32)> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < lengths.len() {
        let value = lengths[i];
        let run = lengths[i..].iter().take_while(|&&l| l == value).count();

        if value == 0 && run >= 11 {
            let n = run.min(138);
            tokens.push((18, (n - 11) as u32));
            i += n;
        } else if value == 0 && run >= 3 {
            let n = run.min(10);
            tokens.push((17, (n - 3) as u32));
            i += n;
        } else if value != 0 && i > 0 && lengths[i - 1] == value && run >= 3 {
            let n = run.min(6);
            tokens.push((16, (n - 3) as u32));
            i += n;
        } else {
            tokens.push((value, 0));
            i += 1;
        }
    }
    tokens
}

/// Dynamic block writer.
pub struct DynamicBlock {
    pub literal_lengths: Vec<u8>,
    pub distance_lengths: Vec<u8>,
    literal_codes: Vec<u32>,
    distance_codes: Vec<u32>,
}

impl DynamicBlock {
    pub fn new(literal_lengths: Vec<u8>, distance_lengths: Vec<u8>) -> Self {
        let literal_codes = canonical_codes(&literal_lengths);
        let distance_codes = canonical_codes(&distance_lengths);
        Self {
            literal_lengths,
            distance_lengths,
            literal_codes,
            distance_codes,
        }
    }

    /// Write the block header and the code length tokens.
    pub fn write_header(&self, w: &mut BitWriter, last: bool) {
        let mut all = self.literal_lengths.clone();
        all.extend_from_slice(&self.distance_lengths);
        self.write_header_with_tokens(w, last, &encode_lengths(&all));
    }

    /// Write the block header with explicit code length tokens.
    pub fn write_header_with_tokens(&self, w: &mut BitWriter, last: bool, tokens: &[(u8, u32)]) {
        w.block_header(last, 2);
        w.write_bits(self.literal_lengths.len() as u32 - 257, 5);
        w.write_bits(self.distance_lengths.len() as u32 - 1, 5);
        w.write_bits(19 - 4, 4);
        for &sym in &CODE_LENGTH_ORDER {
            w.write_bits(CODE_LENGTH_LENGTHS[sym] as u32, 3);
        }

        let cl_codes = canonical_codes(&CODE_LENGTH_LENGTHS);
        for &(sym, extra) in tokens {
            w.write_code(cl_codes[sym as usize], CODE_LENGTH_LENGTHS[sym as usize]);
            match sym {
                16 => w.write_bits(extra, 2),
                17 => w.write_bits(extra, 3),
                18 => w.write_bits(extra, 7),
                _ => {}
            }
        }
    }

    pub fn symbol(&self, w: &mut BitWriter, sym: usize) {
        w.write_code(self.literal_codes[sym], self.literal_lengths[sym]);
    }

    pub fn distance(&self, w: &mut BitWriter, code: usize) {
        w.write_code(self.distance_codes[code], self.distance_lengths[code]);
    }
}

/// Literal/length lengths with the given symbols set, padded to `count`.
pub fn lengths_with(count: usize, set: &[(usize, u8)]) -> Vec<u8> {
    let mut lengths = vec![0u8; count];
    for &(sym, len) in set {
        lengths[sym] = len;
    }
    lengths
}

/// Compress with the reference encoder.
pub fn reference_deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// CRC-32 from the reference implementation.
pub fn reference_crc(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

/// Deterministic test payloads.
pub mod data {
    pub fn text(size: usize) -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs. "
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect()
    }

    pub fn noise(size: usize, mut seed: u64) -> Vec<u8> {
        (0..size)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (seed >> 56) as u8
            })
            .collect()
    }

    /// Runs of repeated bytes with noise between them.
    pub fn mixed(size: usize) -> Vec<u8> {
        let noise = noise(size, 7);
        let mut out = Vec::with_capacity(size);
        let mut i = 0;
        while out.len() < size {
            let byte = noise[i % size];
            let run = 1 + (byte as usize % 300);
            out.extend(std::iter::repeat_n(byte, run.min(size - out.len())));
            i += 1;
        }
        out
    }
}
