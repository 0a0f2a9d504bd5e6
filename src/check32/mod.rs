pub mod caps;
pub mod config;
pub mod constants;
pub mod crc32;
pub mod crc32c;
pub mod dispatch;
pub mod software;

#[cfg(all(feature = "hardware", target_arch = "x86_64"))]
mod platform;

type UpdateFn = fn(u32, &[u8]) -> u32;

pub trait Crc32Digest {
    /// Update digest with data
    fn update(&mut self, data: &[u8]);

    /// Returns the checksum of everything fed so far
    fn digest(&self) -> u32;
}
