//! Sliding window for LZ77 back-references.
//!
//! [`SlidingWindow`] is a circular buffer holding the most recent output. It
//! doubles as the output staging area: bytes accumulate in the window until
//! the write position reaches the end of the buffer, at which point the
//! pending run is handed to the [`OutputSink`] and writing wraps to the
//! start. Every flush is therefore one contiguous slice of the buffer.
//!
//! The window also keeps the running CRC-32 of everything the sink accepted.
//!
//! # Sizes
//!
//! - DEFLATE: 32 KB (32768 bytes)
//! - Deflate64: 64 KB (65536 bytes)

use crate::crc::Crc32;
use crate::error::{InflateError, Result};
use crate::sink::OutputSink;

/// Standard window sizes.
pub mod sizes {
    /// Window size for DEFLATE (32 KB).
    pub const DEFLATE: usize = 32768;
    /// Window size for Deflate64 (64 KB).
    pub const DEFLATE64: usize = 65536;
}

/// Circular history buffer with sink flushing.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Next write position.
    position: usize,
    /// Start of the bytes not yet handed to the sink.
    flushed: usize,
    /// Mask for wrapping source positions (capacity - 1).
    mask: usize,
    /// Bytes produced in this session.
    total: u64,
    /// Bytes accepted by the sink.
    delivered: u64,
    /// CRC-32 of the delivered bytes.
    crc: Crc32,
}

impl SlidingWindow {
    /// Create a window of `size` bytes.
    ///
    /// `size` must be a power of two of at least 32 KB.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_minimum(size, sizes::DEFLATE)
    }

    /// Create a window of `size` bytes, requiring at least `minimum`.
    pub fn with_minimum(size: usize, minimum: usize) -> Result<Self> {
        if size < minimum || !size.is_power_of_two() {
            return Err(InflateError::invalid_window_size(size, minimum));
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| InflateError::allocation_failure(size))?;
        buffer.resize(size, 0);

        Ok(Self {
            buffer,
            position: 0,
            flushed: 0,
            mask: size - 1,
            total: 0,
            delivered: 0,
            crc: Crc32::new(),
        })
    }

    /// Window size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes produced since creation or the last reset.
    pub fn total_out(&self) -> u64 {
        self.total
    }

    /// Bytes the sink has accepted.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// CRC-32 of the bytes the sink has accepted.
    pub fn crc32(&self) -> u32 {
        self.crc.value()
    }

    /// Bytes written but not yet flushed.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[self.flushed..self.position]
    }

    /// Forget all history and counters. The allocation is kept.
    pub fn reset(&mut self) {
        self.position = 0;
        self.flushed = 0;
        self.total = 0;
        self.delivered = 0;
        self.crc.reset();
    }

    /// Append one byte, flushing first if the window is full.
    #[inline]
    pub fn push<S: OutputSink + ?Sized>(&mut self, byte: u8, sink: &mut S) -> Result<()> {
        if self.position == self.buffer.len() {
            self.wrap(sink)?;
        }
        self.buffer[self.position] = byte;
        self.position += 1;
        self.total += 1;
        Ok(())
    }

    /// Append a run of literal bytes.
    pub fn write_bytes<S: OutputSink + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) -> Result<()> {
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.position == self.buffer.len() {
                self.wrap(sink)?;
            }
            let room = self.buffer.len() - self.position;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            self.buffer[self.position..self.position + chunk.len()].copy_from_slice(chunk);
            self.position += chunk.len();
            self.total += chunk.len() as u64;
            rest = tail;
        }
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back.
    ///
    /// The copy runs one byte at a time so overlapping references
    /// (`distance < length`) repeat the most recent bytes.
    pub fn copy_match<S: OutputSink + ?Sized>(
        &mut self,
        distance: usize,
        length: usize,
        sink: &mut S,
    ) -> Result<()> {
        if distance == 0 || distance as u64 > self.total || distance > self.buffer.len() {
            return Err(InflateError::invalid_back_reference(distance, self.total));
        }

        let mut src = self.position.wrapping_sub(distance) & self.mask;
        for _ in 0..length {
            let byte = self.buffer[src];
            self.push(byte, sink)?;
            src = (src + 1) & self.mask;
        }
        Ok(())
    }

    /// Hand all pending bytes to the sink.
    pub fn flush<S: OutputSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let pending = &self.buffer[self.flushed..self.position];
        if pending.is_empty() {
            return Ok(());
        }

        sink.flush(pending)
            .map_err(|e| InflateError::sink_failure(self.delivered, e))?;

        self.crc.update(pending);
        self.delivered += pending.len() as u64;
        log::trace!(
            "flushed {} bytes (window offset {}, {} delivered)",
            pending.len(),
            self.flushed,
            self.delivered
        );
        self.flushed = self.position;
        Ok(())
    }

    /// Flush the remaining bytes at the end of a session.
    pub fn finish<S: OutputSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.flush(sink)
    }

    fn wrap<S: OutputSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.flush(sink)?;
        self.position = 0;
        self.flushed = 0;
        Ok(())
    }
}
