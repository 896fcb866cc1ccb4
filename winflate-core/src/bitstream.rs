//! Bit-level input for the inflate engine.
//!
//! [`BitReader`] walks a borrowed byte slice and exposes it as an LSB-first
//! bit stream. Bytes are pulled one at a time into a 64-bit accumulator,
//! each new byte shifted in above the bits already held, and bits are
//! consumed from the low end.
//!
//! # Exhaustion
//!
//! Reading past the end of the slice never touches memory outside it. The
//! first pull past the end shifts in a zero byte, moves the cursor to the
//! one-past-end sentinel and latches the exhausted flag. From then on every
//! request for bits reports [`InflateError::InputExhausted`].
//!
//! # Example
//!
//! ```
//! use winflate_core::bitstream::BitReader;
//!
//! let data = [0b1010_1101u8, 0xFF];
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.take_bits(1).unwrap(), 1);
//! assert_eq!(reader.take_bits(3).unwrap(), 0b110);
//! reader.align_to_byte();
//! assert_eq!(reader.take_bits(8).unwrap(), 0xFF);
//! assert!(reader.take_bits(1).is_err());
//! assert!(reader.is_exhausted());
//! ```

use crate::error::{InflateError, Result};

/// Largest bit count a single request may ask for.
pub const MAX_REQUEST_BITS: u8 = 32;

/// LSB-first bit reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Compressed input.
    data: &'a [u8],
    /// Next byte to pull; `data.len() + 1` after an overrun.
    position: usize,
    /// Bit accumulator (LSB-first).
    buffer: u64,
    /// Number of valid bits in `buffer`.
    bits_in_buffer: u8,
    /// Latched once a pull went past the end of `data`.
    exhausted: bool,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            buffer: 0,
            bits_in_buffer: 0,
            exhausted: false,
        }
    }

    /// Number of bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.position as u64 * 8 - self.bits_in_buffer as u64
    }

    /// Number of input bytes touched by consumed bits, including a partially
    /// consumed last byte.
    pub fn bytes_consumed(&self) -> usize {
        (self.bit_position().div_ceil(8) as usize).min(self.data.len())
    }

    /// Input bytes not yet touched by consumed bits.
    pub fn remaining_input(&self) -> &'a [u8] {
        &self.data[self.bytes_consumed()..]
    }

    /// True once a read went past the end of the input.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of valid bits currently held in the accumulator.
    pub fn bits_available(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Pull the next input byte, or the zero error byte past the end.
    #[inline]
    fn next_byte(&mut self) -> u8 {
        match self.data.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                byte
            }
            None => {
                if self.position == self.data.len() {
                    self.position += 1;
                }
                self.exhausted = true;
                0
            }
        }
    }

    /// Make sure at least `count` bits are held in the accumulator.
    #[inline]
    pub fn need_bits(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= MAX_REQUEST_BITS, "Cannot request more than 32 bits");

        if count == 0 {
            return Ok(());
        }
        if self.exhausted {
            return Err(InflateError::input_exhausted(self.bit_position()));
        }

        while self.bits_in_buffer < count {
            let byte = self.next_byte();
            self.buffer |= (byte as u64) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
            if self.exhausted {
                return Err(InflateError::input_exhausted(self.bit_position()));
            }
        }

        Ok(())
    }

    /// Low `count` bits of the accumulator without consuming them.
    ///
    /// The bits must already be present (see [`need_bits`](Self::need_bits)).
    #[inline]
    pub fn peek_bits(&self, count: u8) -> u32 {
        debug_assert!(count <= self.bits_in_buffer);
        (self.buffer & ((1u64 << count) - 1)) as u32
    }

    /// Discard `count` bits that are already present.
    #[inline]
    pub fn dump_bits(&mut self, count: u8) {
        debug_assert!(count <= self.bits_in_buffer);
        self.buffer >>= count;
        self.bits_in_buffer -= count;
    }

    /// Read and consume `count` bits, first bit in the LSB position.
    #[inline]
    pub fn take_bits(&mut self, count: u8) -> Result<u32> {
        self.need_bits(count)?;
        let value = self.peek_bits(count);
        self.dump_bits(count);
        Ok(value)
    }

    /// Discard the partial bits of the current byte.
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        self.dump_bits(remainder);
    }

    /// Take `len` raw bytes from a byte-aligned position.
    ///
    /// Whole bytes still held in the accumulator are handed back to the
    /// input first, so the returned slice is contiguous.
    pub fn take_aligned_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.exhausted {
            return Err(InflateError::input_exhausted(self.bit_position()));
        }

        self.align_to_byte();
        self.position -= (self.bits_in_buffer / 8) as usize;
        debug_assert!(self.position <= self.data.len());
        self.buffer = 0;
        self.bits_in_buffer = 0;

        let available = self.data.len() - self.position;
        if len > available {
            self.position = self.data.len() + 1;
            self.exhausted = true;
            return Err(InflateError::input_exhausted(self.data.len() as u64 * 8));
        }

        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }
}
