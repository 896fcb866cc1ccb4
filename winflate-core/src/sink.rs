//! Output sinks for decompressed data.
//!
//! The sliding window hands decompressed bytes to an [`OutputSink`] in
//! contiguous runs: whenever the window wraps and once more when the session
//! ends. A sink that returns an error aborts the session.

use std::io::{self, Write};

/// Consumer of decompressed bytes.
///
/// Each call receives one contiguous run of newly produced bytes, in order.
/// Runs are never empty and never longer than the window.
pub trait OutputSink {
    /// Accept the next run of output bytes.
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl OutputSink for Vec<u8> {
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.try_reserve(bytes.len())
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<F> OutputSink for F
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self(bytes)
    }
}

/// Sink that forwards every run to an [`io::Write`].
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Get a mutable reference to the wrapped writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriteSink<W> {
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// Sink that only counts bytes. Used to verify a stream without keeping it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink {
    bytes: u64,
}

impl DiscardSink {
    /// Create a counting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes received so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl OutputSink for DiscardSink {
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes += bytes.len() as u64;
        Ok(())
    }
}

/// Sink that fills a caller-provided buffer.
///
/// A run that does not fit fails with [`io::ErrorKind::WriteZero`] and
/// nothing of it is copied.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    /// Wrap an output buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Bytes stored so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// The filled part of the buffer.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl OutputSink for SliceSink<'_> {
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!(
                    "output buffer full: {} bytes do not fit in {} remaining",
                    bytes.len(),
                    self.remaining()
                ),
            ));
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliver<S: OutputSink + ?Sized>(sink: &mut S, runs: &[&[u8]]) -> io::Result<()> {
        for run in runs {
            sink.flush(run)?;
        }
        Ok(())
    }

    #[test]
    fn test_vec_sink() {
        let mut out = Vec::new();
        deliver(&mut out, &[b"abc", b"def"]).unwrap();
        assert_eq!(out, b"abcdef");
    }

    #[test]
    fn test_closure_sink() {
        let mut runs = Vec::new();
        let mut sink = |bytes: &[u8]| -> io::Result<()> {
            runs.push(bytes.len());
            Ok(())
        };
        deliver(&mut sink, &[b"ab", b"cde"]).unwrap();
        assert_eq!(runs, vec![2, 3]);
    }

    #[test]
    fn test_write_sink() {
        let mut sink = WriteSink::new(Vec::new());
        deliver(&mut sink, &[b"hello ", b"world"]).unwrap();
        assert_eq!(sink.written(), 11);
        assert_eq!(sink.into_inner(), b"hello world");
    }

    #[test]
    fn test_discard_sink() {
        let mut sink = DiscardSink::new();
        deliver(&mut sink, &[&[0u8; 100], &[1u8; 28]]).unwrap();
        assert_eq!(sink.bytes(), 128);
    }

    #[test]
    fn test_slice_sink_overflow() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);

        sink.flush(b"abc").unwrap();
        let err = sink.flush(b"de").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(sink.filled(), b"abc");
        assert_eq!(sink.remaining(), 1);
    }
}
