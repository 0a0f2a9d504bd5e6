//! Strategy selection and the CRC32C pipeline.

use std::fmt;
use std::sync::OnceLock;

use super::caps::{Caps, Feature};
use super::config::Config;
use super::software;

#[cfg(all(feature = "hardware", target_arch = "x86_64"))]
use super::platform::x86;

/// How the bulk of a buffer is folded. Every hardware strategy also uses the
/// scalar `crc32` instruction for alignment and residue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Slicing-by-16 tables, no CPU features required.
    Software,
    /// `crc32` 8 bytes at a time.
    Scalar,
    /// Three interleaved `crc32` stripes over 3072/1024/256-byte blocks,
    /// recombined with `pclmulqdq`.
    StripeFold,
    /// 512-bit `vpclmulqdq` folding with Barrett reduction.
    WideFold,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Software,
        Strategy::Scalar,
        Strategy::StripeFold,
        Strategy::WideFold,
    ];

    /// Features the strategy needs from the CPU.
    pub const fn requires(self) -> &'static [Feature] {
        match self {
            Strategy::Software => &[],
            Strategy::Scalar => &[Feature::Crc],
            Strategy::StripeFold => &[Feature::Crc, Feature::Clmul],
            Strategy::WideFold => &[Feature::Crc, Feature::Clmul, Feature::Wide],
        }
    }

    pub fn is_supported(self, caps: Caps) -> bool {
        self.requires().iter().all(|&feature| caps.has(feature))
    }

    /// Step down from `self` until `caps` can run it. `Software` always can.
    pub fn clamp(self, caps: Caps) -> Strategy {
        let mut strategy = self;
        while !strategy.is_supported(caps) {
            strategy = match strategy {
                Strategy::WideFold => Strategy::StripeFold,
                Strategy::StripeFold => Strategy::Scalar,
                Strategy::Scalar | Strategy::Software => Strategy::Software,
            };
        }
        strategy
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::Software => "software",
            Strategy::Scalar => "scalar",
            Strategy::StripeFold => "stripe",
            Strategy::WideFold => "wide",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes CRC32C with a strategy that is known to be supported.
///
/// A `Dispatcher` can only hold a strategy that passed [`Strategy::clamp`]
/// against detected capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatcher {
    strategy: Strategy,
}

impl Dispatcher {
    pub fn new(caps: Caps, requested: Strategy) -> Self {
        Self {
            strategy: requested.clamp(caps),
        }
    }

    /// Fastest strategy for `caps`.
    pub fn auto(caps: Caps) -> Self {
        Self::new(caps, Strategy::WideFold)
    }

    pub const fn software() -> Self {
        Self {
            strategy: Strategy::Software,
        }
    }

    /// Process-wide dispatcher built from [`Caps::get`] and [`Config::get`].
    pub fn global() -> &'static Dispatcher {
        static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let caps = Caps::get();
            let requested = Config::get().force.unwrap_or(Strategy::WideFold);
            let dispatcher = Self::new(caps, requested);
            tracing::debug!(
                %caps,
                %requested,
                strategy = %dispatcher.strategy,
                "selected crc32c strategy"
            );
            dispatcher
        })
    }

    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// CRC32C of `data`, continuing from `previous_crc` (0 for a fresh sum).
    pub fn compute(&self, previous_crc: u32, data: &[u8]) -> u32 {
        match self.strategy {
            Strategy::Software => software::crc32c(previous_crc, data),
            #[cfg(all(feature = "hardware", target_arch = "x86_64"))]
            strategy => {
                // SAFETY: `strategy` passed `clamp` against detected caps, so
                // sse4.2 is present and so is everything the fold needs.
                unsafe { x86::compute(strategy, previous_crc, data) }
            }
            #[cfg(not(all(feature = "hardware", target_arch = "x86_64")))]
            _ => software::crc32c(previous_crc, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK: u32 = 0xE3069283;

    fn all_dispatchers() -> Vec<Dispatcher> {
        Strategy::ALL
            .iter()
            .map(|&s| Dispatcher::new(Caps::get(), s))
            .collect()
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 131 + (i >> 7)) as u8).collect()
    }

    #[test]
    fn test_clamp_walks_down() {
        let none = Caps::none();
        for strategy in Strategy::ALL {
            assert_eq!(strategy.clamp(none), Strategy::Software);
        }

        let caps = Caps::get();
        assert_eq!(Strategy::Software.clamp(caps), Strategy::Software);
        let no_wide = caps.without(Feature::Wide);
        assert_ne!(Strategy::WideFold.clamp(no_wide), Strategy::WideFold);
        let no_clmul = caps.without(Feature::Clmul);
        assert!(matches!(
            Strategy::WideFold.clamp(no_clmul),
            Strategy::Scalar | Strategy::Software
        ));
        let no_crc = caps.without(Feature::Crc);
        assert_eq!(Strategy::StripeFold.clamp(no_crc), Strategy::Software);
    }

    #[test]
    fn test_clamped_strategy_is_supported() {
        let caps = Caps::get();
        for strategy in Strategy::ALL {
            assert!(strategy.clamp(caps).is_supported(caps));
        }
    }

    #[test]
    fn test_known_vector() {
        for dispatcher in all_dispatchers() {
            assert_eq!(dispatcher.compute(0, b"123456789"), CHECK, "{dispatcher:?}");
        }
    }

    #[test]
    fn test_empty_is_identity() {
        for dispatcher in all_dispatchers() {
            for seed in [0, 1, CHECK, u32::MAX] {
                assert_eq!(dispatcher.compute(seed, &[]), seed);
            }
        }
    }

    #[test]
    fn test_tier_boundaries() {
        let data = pattern(3 * 3072 + 300);
        for len in [
            0, 1, 7, 8, 9, 63, 64, 65, 255, 256, 257, 319, 320, 321, 511, 512, 1023, 1024, 1025,
            1279, 1280, 3071, 3072, 3073, 4096, 4352, 9216, 9516,
        ] {
            let expected = software::crc32_naive(0, software::CRC32C_POLYNOMIAL, &data[..len]);
            for dispatcher in all_dispatchers() {
                assert_eq!(
                    dispatcher.compute(0, &data[..len]),
                    expected,
                    "{dispatcher:?} length {len}"
                );
            }
        }
    }

    #[test]
    fn test_every_length_up_to_4096() {
        let data = pattern(4096 + 8);
        for dispatcher in all_dispatchers() {
            for len in 0..=4096 {
                let expected = software::crc32c(0x1234_5678, &data[..len]);
                assert_eq!(
                    dispatcher.compute(0x1234_5678, &data[..len]),
                    expected,
                    "{dispatcher:?} length {len}"
                );
            }
        }
    }

    #[test]
    fn test_alignment_independence() {
        let data = pattern(1500);
        let mut buffer = vec![0u8; data.len() + 8];
        for dispatcher in all_dispatchers() {
            let expected = dispatcher.compute(0, &data);
            for offset in 0..8 {
                buffer[offset..offset + data.len()].copy_from_slice(&data);
                let shifted = &buffer[offset..offset + data.len()];
                assert_eq!(
                    dispatcher.compute(0, shifted),
                    expected,
                    "{dispatcher:?} offset {offset}"
                );
            }
        }
    }

    #[test]
    fn test_chaining() {
        let data = pattern(5000);
        for dispatcher in all_dispatchers() {
            let whole = dispatcher.compute(7, &data);
            for split in [0, 1, 5, 8, 255, 256, 1000, 3072, 4999, 5000] {
                let (head, tail) = data.split_at(split);
                let chained = dispatcher.compute(dispatcher.compute(7, head), tail);
                assert_eq!(chained, whole, "{dispatcher:?} split {split}");
            }
        }
    }

    #[test]
    fn test_global_is_stable() {
        let first = Dispatcher::global();
        assert!(first.strategy().is_supported(Caps::get()));
        assert_eq!(Dispatcher::global(), first);
    }
}
