use super::software::{self, CRC32_LOOKUP_TABLE, CRC32_POLYNOMIAL};
use super::{Crc32Digest, UpdateFn};

/// CRC32 (IEEE 802.3). There are no accelerated kernels for this polynomial;
/// every constructor runs in software.
pub struct Crc32 {
    state: u32,
    compute: UpdateFn,
}

impl Crc32 {
    /// Creates a new `Crc32` using the slicing-by-16 tables
    pub fn new() -> Self {
        Self::new_lookup()
    }

    /// Creates a new `Crc32` using naive approach
    pub fn new_naive() -> Self {
        Self {
            state: 0,
            compute: Self::compute_naive,
        }
    }

    /// Creates a new `Crc32` using a table lookup approach
    pub fn new_lookup() -> Self {
        Self {
            state: 0,
            compute: Self::compute_lookup,
        }
    }

    fn compute_lookup(prev_crc: u32, data: &[u8]) -> u32 {
        software::crc32_lookup(prev_crc, &CRC32_LOOKUP_TABLE, data)
    }

    fn compute_naive(prev_crc: u32, data: &[u8]) -> u32 {
        software::crc32_naive(prev_crc, CRC32_POLYNOMIAL, data)
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32Digest for Crc32 {
    fn update(&mut self, data: &[u8]) {
        self.state = (self.compute)(self.state, data);
    }

    fn digest(&self) -> u32 {
        self.state
    }
}
