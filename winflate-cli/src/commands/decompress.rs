//! Decompress command implementation.

use super::StreamOptions;
use crate::utils::{ProgressSink, create_progress_bar, format_crc};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use winflate_core::MappedInput;
use winflate_core::sink::{OutputSink, WriteSink};
use winflate_deflate::{InflateSummary, Inflater};

/// Options for the decompress command.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompressOptions {
    pub stream: StreamOptions,
    /// CRC-32 the output must have.
    pub expect_crc: Option<u32>,
    pub progress: bool,
}

pub fn cmd_decompress(
    input: &Path,
    output: Option<&Path>,
    options: &DecompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.stream.config();
    let mut inflater = Inflater::new(config)?;
    let mapped = MappedInput::open(input)?;

    log::info!(
        "decompressing {} ({} bytes, {})",
        input.display(),
        mapped.len(),
        config.variant.name()
    );

    let pb = create_progress_bar(options.progress);
    let summary = match output {
        Some(path) => {
            let mut sink = WriteSink::new(BufWriter::new(File::create(path)?));
            let summary = run(&mut inflater, mapped.as_slice(), &mut sink, &pb)?;
            sink.get_mut().flush()?;
            summary
        }
        None => {
            let stdout = io::stdout();
            let mut sink = WriteSink::new(BufWriter::new(stdout.lock()));
            let summary = run(&mut inflater, mapped.as_slice(), &mut sink, &pb)?;
            sink.get_mut().flush()?;
            summary
        }
    };
    pb.finish_and_clear();

    let trailing = mapped.len() - summary.bytes_consumed;
    if trailing > 0 {
        log::warn!("{} bytes after the end of the stream ignored", trailing);
    }

    if let Some(expected) = options.expect_crc {
        if summary.crc32 != expected {
            return Err(format!(
                "CRC mismatch: expected {}, got {}",
                format_crc(expected),
                format_crc(summary.crc32)
            )
            .into());
        }
    }

    if let Some(path) = output {
        println!(
            "{} -> {}: {} bytes, {} blocks, crc32 {}",
            input.display(),
            path.display(),
            summary.bytes_produced,
            summary.blocks,
            format_crc(summary.crc32)
        );
    }

    Ok(())
}

fn run<S: OutputSink>(
    inflater: &mut Inflater<'_>,
    input: &[u8],
    sink: &mut S,
    pb: &indicatif::ProgressBar,
) -> winflate_core::Result<InflateSummary> {
    let mut sink = ProgressSink::new(sink, pb);
    inflater.inflate(input, &mut sink)
}
