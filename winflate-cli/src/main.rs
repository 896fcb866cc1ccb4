//! winflate CLI
//!
//! Decompresses and verifies raw DEFLATE (RFC 1951) and Deflate64 streams.

mod commands;
mod utils;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{DecompressOptions, StreamOptions, cmd_crc, cmd_decompress, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "winflate")]
#[command(
    author,
    version,
    about = "Raw DEFLATE and Deflate64 stream decompressor"
)]
#[command(long_about = "
winflate decodes raw DEFLATE streams (no zlib or gzip framing) and the
Deflate64 variant used by PKZIP method 9.

Examples:
  winflate decompress data.deflate -o data.bin
  winflate decompress data.d64 --deflate64 --expect-crc 0x1c291ca3 -o data.bin
  winflate decompress data.deflate > data.bin
  winflate test *.deflate
  winflate test --json stream.deflate
  winflate crc data.bin
  winflate completions bash
")]
struct Cli {
    /// Increase log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a raw stream to a file or stdout
    #[command(alias = "d")]
    Decompress {
        /// Compressed input file
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decode Deflate64 (64 KB window)
        #[arg(long)]
        deflate64: bool,

        /// Sliding window size in bytes (power of two)
        #[arg(long)]
        window_size: Option<usize>,

        /// Accept incomplete distance codes written by some old encoders
        #[arg(long)]
        lenient: bool,

        /// Fail unless the output has this CRC-32 (hex)
        #[arg(long, value_parser = utils::parse_hex)]
        expect_crc: Option<u32>,

        /// Show progress
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress streams without writing output and report their CRC-32
    #[command(alias = "t")]
    Test {
        /// Compressed input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Decode Deflate64 (64 KB window)
        #[arg(long)]
        deflate64: bool,

        /// Accept incomplete distance codes written by some old encoders
        #[arg(long)]
        lenient: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Compute the CRC-32 of files
    Crc {
        /// Files to checksum
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decompress {
            input,
            output,
            deflate64,
            window_size,
            lenient,
            expect_crc,
            progress,
        } => {
            let options = DecompressOptions {
                stream: StreamOptions {
                    deflate64,
                    window_size,
                    lenient,
                },
                expect_crc,
                progress,
            };
            cmd_decompress(&input, output.as_deref(), &options)
        }
        Commands::Test {
            inputs,
            deflate64,
            lenient,
            json,
        } => {
            let options = StreamOptions {
                deflate64,
                window_size: None,
                lenient,
            };
            cmd_test(&inputs, &options, json)
        }
        Commands::Crc { files, json } => cmd_crc(&files, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "winflate", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decompress() {
        let cli = Cli::try_parse_from([
            "winflate",
            "-vv",
            "decompress",
            "in.d64",
            "--deflate64",
            "--expect-crc",
            "0xCBF43926",
            "-o",
            "out.bin",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Decompress {
                input,
                output,
                deflate64,
                expect_crc,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.d64"));
                assert_eq!(output, Some(PathBuf::from("out.bin")));
                assert!(deflate64);
                assert_eq!(expect_crc, Some(0xCBF43926));
            }
            _ => panic!("expected decompress"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_crc() {
        assert!(
            Cli::try_parse_from(["winflate", "decompress", "in", "--expect-crc", "nope"]).is_err()
        );
    }

    #[test]
    fn test_test_requires_inputs() {
        assert!(Cli::try_parse_from(["winflate", "test"]).is_err());
    }
}
