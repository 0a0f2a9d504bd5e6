//! CRC32C (Castagnoli) with runtime-selected hardware kernels.
//!
//! On x86_64 the fastest of these is picked once per process:
//!
//! | Strategy | Needs | Bulk loop |
//! |----------|-------|-----------|
//! | `WideFold` | AVX-512F + VPCLMULQDQ | 4 x 512-bit fold, Barrett reduction |
//! | `StripeFold` | SSE4.2 + PCLMULQDQ | 3 `crc32q` stripes per 3072/1024/256-byte block |
//! | `Scalar` | SSE4.2 | `crc32q` |
//! | `Software` | - | slicing-by-16 |
//!
//! All strategies produce identical results, and chain: feeding the checksum
//! of a prefix back in as `previous_crc` continues it.
//!
//! ```
//! use crc32c_accel::crc32c_accelerated;
//!
//! assert_eq!(crc32c_accelerated(b"123456789", 0), 0xE3069283);
//!
//! let head = crc32c_accelerated(b"12345", 0);
//! assert_eq!(crc32c_accelerated(b"6789", head), 0xE3069283);
//! ```
pub mod check32;

pub use check32::caps::{Caps, Feature};
pub use check32::config::{Config, ParseStrategyError};
pub use check32::crc32::Crc32;
pub use check32::crc32c::Crc32C;
pub use check32::dispatch::{Dispatcher, Strategy};
pub use check32::Crc32Digest;

pub mod prelude {
    pub use crate::check32::crc32::Crc32;
    pub use crate::check32::crc32c::Crc32C;
    pub use crate::check32::dispatch::Strategy;
    pub use crate::check32::Crc32Digest;
    pub use crate::{crc32_accelerated, crc32c_accelerated};
}

/// CRC32C of `data`, continuing from `previous_crc` (0 starts a new checksum).
#[inline]
pub fn crc32c_accelerated(data: &[u8], previous_crc: u32) -> u32 {
    Dispatcher::global().compute(previous_crc, data)
}

/// CRC32 (IEEE) of `data`, continuing from `previous_crc`. Always software.
#[inline]
pub fn crc32_accelerated(data: &[u8], previous_crc: u32) -> u32 {
    check32::software::crc32(previous_crc, data)
}
