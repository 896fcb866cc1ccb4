//! Command implementations for the winflate CLI.

pub mod crc;
pub mod decompress;

pub use crc::cmd_crc;
pub use decompress::{DecompressOptions, cmd_decompress};
pub use test::cmd_test;

use winflate_deflate::{InflateConfig, Variant};

/// Stream options shared by the decoding commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Decode Deflate64 instead of DEFLATE.
    pub deflate64: bool,
    /// Window size override.
    pub window_size: Option<usize>,
    /// Accept incomplete distance codes.
    pub lenient: bool,
}

impl StreamOptions {
    /// Inflate configuration for these options.
    pub fn config(&self) -> InflateConfig {
        let variant = if self.deflate64 {
            Variant::Deflate64
        } else {
            Variant::Deflate
        };

        let mut config =
            InflateConfig::new(variant).with_lenient_distance_codes(self.lenient);
        if let Some(size) = self.window_size {
            config = config.with_window_size(size);
        }
        config
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Write;
    use std::path::PathBuf;

    use flate2::Compression;
    use flate2::write::DeflateEncoder;

    /// Temporary file removed on drop.
    pub struct TempFile {
        pub path: PathBuf,
    }

    impl TempFile {
        pub fn new(name: &str, contents: &[u8]) -> Self {
            let path = Self::reserve(name);
            std::fs::write(&path, contents).unwrap();
            Self { path }
        }

        /// A path in the temp directory that does not exist yet.
        pub fn reserve(name: &str) -> PathBuf {
            std::env::temp_dir().join(format!("winflate-{}-{}", std::process::id(), name))
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    pub fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }
}
