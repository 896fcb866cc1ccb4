//! CRC-32 (ISO 3309) over decompressed output.
//!
//! The inflate session folds every byte it hands to the output sink into a
//! running CRC-32, the same checksum ZIP and GZIP containers store next to a
//! DEFLATE stream.
//!
//! Data of 16 bytes or more goes through a slicing-by-8 loop driven by eight
//! pre-computed tables; shorter runs use the single-table loop.

/// Reflected CRC-32 polynomial.
const POLYNOMIAL: u32 = 0xEDB8_8320;

/// CRC-32 slicing-by-8 lookup tables. Table 0 is the classic byte table.
const CRC32_TABLES: [[u32; 256]; 8] = {
    let mut tables = [[0u32; 256]; 8];

    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }

    let mut t = 1;
    while t < 8 {
        let mut i = 0usize;
        while i < 256 {
            let prev = tables[t - 1][i];
            tables[t][i] = tables[0][(prev & 0xFF) as usize] ^ (prev >> 8);
            i += 1;
        }
        t += 1;
    }

    tables
};

/// Running CRC-32 calculator.
///
/// - Polynomial: 0x04C11DB7 (reflected: 0xEDB88320)
/// - Initial value: 0xFFFFFFFF
/// - Final XOR: 0xFFFFFFFF
///
/// # Example
///
/// ```
/// use winflate_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Create a calculator for an empty byte sequence.
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Resume from a finalized CRC value.
    pub fn from_value(crc: u32) -> Self {
        Self { state: !crc }
    }

    /// Reset to the empty-sequence state.
    pub fn reset(&mut self) {
        self.state = 0xFFFF_FFFF;
    }

    /// Fold more bytes into the CRC.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        if data.len() >= 16 {
            self.state = update_slice8(self.state, data);
        } else {
            self.state = update_bytes(self.state, data);
        }
    }

    /// CRC of everything folded in so far.
    #[inline(always)]
    pub fn value(&self) -> u32 {
        !self.state
    }

    /// Consume the calculator and return the CRC.
    #[inline(always)]
    pub fn finalize(self) -> u32 {
        !self.state
    }

    /// CRC-32 of a slice in one call.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Continue a finalized CRC-32 over `data`.
///
/// Start from `0` for a new sequence; `crc32_update(crc32_update(0, a), b)`
/// equals the CRC of `a` followed by `b`.
pub fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    let mut calc = Crc32::from_value(crc);
    calc.update(data);
    calc.finalize()
}

#[inline]
fn update_bytes(mut state: u32, data: &[u8]) -> u32 {
    for &byte in data {
        let index = ((state ^ byte as u32) & 0xFF) as usize;
        state = CRC32_TABLES[0][index] ^ (state >> 8);
    }
    state
}

#[inline]
fn update_slice8(mut state: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let low = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ state;
        let high = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        state = CRC32_TABLES[7][(low & 0xFF) as usize]
            ^ CRC32_TABLES[6][((low >> 8) & 0xFF) as usize]
            ^ CRC32_TABLES[5][((low >> 16) & 0xFF) as usize]
            ^ CRC32_TABLES[4][(low >> 24) as usize]
            ^ CRC32_TABLES[3][(high & 0xFF) as usize]
            ^ CRC32_TABLES[2][((high >> 8) & 0xFF) as usize]
            ^ CRC32_TABLES[1][((high >> 16) & 0xFF) as usize]
            ^ CRC32_TABLES[0][(high >> 24) as usize];
    }
    update_bytes(state, chunks.remainder())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_empty() {
        assert_eq!(Crc32::compute(&[]), 0x00000000);
        assert_eq!(crc32_update(0, &[]), 0);
    }

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(Crc32::compute(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn test_crc32_hello() {
        assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
    }

    #[test]
    fn test_crc32_incremental() {
        let mut crc = Crc32::new();
        crc.update(b"Hello, ");
        crc.update(b"World!");
        assert_eq!(crc.finalize(), 0xEC4AC3D0);
    }

    #[test]
    fn test_crc32_update_chains() {
        let first = crc32_update(0, b"12345");
        assert_eq!(crc32_update(first, b"6789"), 0xCBF43926);
    }

    #[test]
    fn test_slice8_matches_bytewise() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 + 7) as u8).collect();

        for len in [16, 17, 23, 64, 999, 1000] {
            let fast = !update_slice8(0xFFFF_FFFF, &data[..len]);
            let slow = !update_bytes(0xFFFF_FFFF, &data[..len]);
            assert_eq!(fast, slow, "mismatch at length {len}");
        }
    }

    #[test]
    fn test_reset() {
        let mut crc = Crc32::new();
        crc.update(b"garbage");
        crc.reset();
        crc.update(b"123456789");
        assert_eq!(crc.value(), 0xCBF43926);
    }
}
