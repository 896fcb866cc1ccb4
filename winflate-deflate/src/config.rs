//! Inflate configuration for DEFLATE and Deflate64 streams.

use winflate_core::error::{InflateError, Result};
use winflate_core::window::sizes;

/// Stream variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Standard DEFLATE (RFC 1951), 32 KB window.
    #[default]
    Deflate,
    /// Deflate64 (PKZIP method 9), 64 KB window.
    Deflate64,
}

impl Variant {
    /// Smallest window able to hold the longest back-reference.
    pub const fn min_window_size(self) -> usize {
        match self {
            Self::Deflate => sizes::DEFLATE,
            Self::Deflate64 => sizes::DEFLATE64,
        }
    }

    /// Largest HLIT value a dynamic header may declare.
    pub const fn max_literal_codes(self) -> usize {
        286
    }

    /// Largest HDIST value a dynamic header may declare.
    pub const fn max_distance_codes(self) -> usize {
        match self {
            Self::Deflate => 30,
            Self::Deflate64 => 32,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Deflate => "deflate",
            Self::Deflate64 => "deflate64",
        }
    }
}

/// Inflate configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateConfig {
    /// Stream variant.
    pub variant: Variant,
    /// Sliding window size in bytes (power of two).
    pub window_size: usize,
    /// Requested root lookup width for dynamic literal/length tables.
    pub literal_bits: u8,
    /// Requested root lookup width for dynamic distance tables.
    pub distance_bits: u8,
    /// Accept dynamic blocks whose distance code is incomplete.
    ///
    /// Some old PKZIP encoders emit such codes.
    pub lenient_distance_codes: bool,
}

impl InflateConfig {
    /// Standard DEFLATE configuration.
    ///
    /// - 32 KB window
    /// - 9-bit literal/length and 6-bit distance root tables
    /// - Strict distance codes
    pub const DEFLATE: Self = Self {
        variant: Variant::Deflate,
        window_size: sizes::DEFLATE,
        literal_bits: 9,
        distance_bits: 6,
        lenient_distance_codes: false,
    };

    /// Deflate64 configuration.
    ///
    /// - 64 KB window
    /// - 9-bit literal/length and 6-bit distance root tables
    /// - Strict distance codes
    pub const DEFLATE64: Self = Self {
        variant: Variant::Deflate64,
        window_size: sizes::DEFLATE64,
        literal_bits: 9,
        distance_bits: 6,
        lenient_distance_codes: false,
    };

    /// Default configuration for a variant.
    pub const fn new(variant: Variant) -> Self {
        match variant {
            Variant::Deflate => Self::DEFLATE,
            Variant::Deflate64 => Self::DEFLATE64,
        }
    }

    /// Use a different window size.
    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Accept or reject incomplete dynamic distance codes.
    pub const fn with_lenient_distance_codes(mut self, lenient: bool) -> Self {
        self.lenient_distance_codes = lenient;
        self
    }

    /// Use different root lookup widths for dynamic tables.
    pub const fn with_lookup_bits(mut self, literal_bits: u8, distance_bits: u8) -> Self {
        self.literal_bits = literal_bits;
        self.distance_bits = distance_bits;
        self
    }

    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> Result<()> {
        let minimum = self.variant.min_window_size();
        if self.window_size < minimum || !self.window_size.is_power_of_two() {
            return Err(InflateError::invalid_window_size(self.window_size, minimum));
        }
        for (name, bits) in [
            ("literal_bits", self.literal_bits),
            ("distance_bits", self.distance_bits),
        ] {
            if !(1..=16).contains(&bits) {
                return Err(InflateError::invalid_config(format!(
                    "{} must be between 1 and 16, got {}",
                    name, bits
                )));
            }
        }
        Ok(())
    }
}

impl Default for InflateConfig {
    fn default() -> Self {
        Self::DEFLATE
    }
}
