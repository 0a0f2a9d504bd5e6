//! CPU capability detection for the CRC32C kernels.

use std::fmt;
use std::sync::OnceLock;

/// A CPU feature one of the kernels depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Scalar `crc32` instruction (x86_64 `sse4.2`).
    Crc,
    /// 128-bit carry-less multiply (`pclmulqdq`).
    Clmul,
    /// 512-bit vectors with carry-less multiply (`avx512f` + `vpclmulqdq`).
    Wide,
}

/// Which features this CPU supports.
///
/// A `Caps` can only be obtained from detection, and can only lose features
/// afterwards (see [`Caps::without`]). Kernels gated on a `Caps` are therefore
/// never selected on a CPU that cannot run them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Caps {
    crc: bool,
    clmul: bool,
    wide: bool,
}

static DETECTED: OnceLock<Caps> = OnceLock::new();

impl Caps {
    /// No acceleration at all.
    pub const fn none() -> Self {
        Self {
            crc: false,
            clmul: false,
            wide: false,
        }
    }

    /// Probe the running CPU. Prefer [`Caps::get`], which caches the result.
    pub fn detect() -> Self {
        #[cfg(all(feature = "hardware", target_arch = "x86_64"))]
        {
            Self {
                crc: is_x86_feature_detected!("sse4.2"),
                clmul: is_x86_feature_detected!("pclmulqdq"),
                wide: is_x86_feature_detected!("avx512f")
                    && is_x86_feature_detected!("vpclmulqdq")
                    && is_x86_feature_detected!("sse4.1"),
            }
        }

        #[cfg(not(all(feature = "hardware", target_arch = "x86_64")))]
        {
            Self::none()
        }
    }

    /// Process-wide capabilities, detected on first use.
    pub fn get() -> Self {
        *DETECTED.get_or_init(|| {
            let caps = Self::detect();
            tracing::debug!(
                crc = caps.crc,
                clmul = caps.clmul,
                wide = caps.wide,
                "detected crc32c capabilities"
            );
            caps
        })
    }

    pub const fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Crc => self.crc,
            Feature::Clmul => self.clmul,
            Feature::Wide => self.wide,
        }
    }

    /// The same capabilities with `feature` turned off.
    #[must_use]
    pub const fn without(mut self, feature: Feature) -> Self {
        match feature {
            Feature::Crc => self.crc = false,
            Feature::Clmul => self.clmul = false,
            Feature::Wide => self.wide = false,
        }
        self
    }
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::with_capacity(3);
        if self.crc {
            names.push("sse4.2");
        }
        if self.clmul {
            names.push("pclmulqdq");
        }
        if self.wide {
            names.push("avx512f+vpclmulqdq");
        }
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(","))
        }
    }
}
