//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use winflate_core::sink::OutputSink;

/// Create a progress bar counting decompressed bytes.
///
/// The output size is unknown up front, so the bar spins instead of filling.
pub fn create_progress_bar(enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner:.cyan} {bytes} ({bytes_per_sec}) {msg}")
            .expect("progress bar template is valid")
            .tick_chars("█▓▒░ "),
    );
    pb
}

/// Sink adapter that advances a progress bar after each successful flush.
pub struct ProgressSink<'a, S: ?Sized> {
    inner: &'a mut S,
    progress: &'a ProgressBar,
}

impl<'a, S: OutputSink + ?Sized> ProgressSink<'a, S> {
    pub fn new(inner: &'a mut S, progress: &'a ProgressBar) -> Self {
        Self { inner, progress }
    }
}

impl<S: OutputSink + ?Sized> OutputSink for ProgressSink<'_, S> {
    fn flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.flush(bytes)?;
        self.progress.inc(bytes.len() as u64);
        Ok(())
    }
}

/// Parse a CRC-32 given in hex, with or without a `0x` prefix.
pub fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid CRC-32 '{}': {}", s, e))
}

/// Format a CRC-32 the way the commands print it.
pub fn format_crc(crc: u32) -> String {
    format!("{:08x}", crc)
}
