//! Cross-strategy properties of the public API.

use crc32c_accel::check32::software;
use crc32c_accel::{crc32_accelerated, crc32c_accelerated, Caps, Dispatcher, Feature, Strategy};
use proptest::prelude::*;

const CRC32C_CHECK: u32 = 0xE306_9283;
const CRC32_CHECK: u32 = 0xCBF4_3926;

fn dispatchers() -> Vec<Dispatcher> {
    let caps = Caps::get();
    let mut all: Vec<Dispatcher> = Strategy::ALL
        .iter()
        .map(|&strategy| Dispatcher::new(caps, strategy))
        .collect();
    // Masked capabilities reach the lower tiers even on CPUs with AVX-512.
    all.push(Dispatcher::auto(caps.without(Feature::Wide)));
    all.push(Dispatcher::auto(caps.without(Feature::Clmul)));
    all.push(Dispatcher::auto(caps.without(Feature::Crc)));
    all
}

proptest! {
    #[test]
    fn crc32c_matches_software(data in proptest::collection::vec(any::<u8>(), 0..=4096), seed in any::<u32>()) {
        let expected = software::crc32c(seed, &data);
        for dispatcher in dispatchers() {
            prop_assert_eq!(dispatcher.compute(seed, &data), expected, "{:?}", dispatcher);
        }
    }

    #[test]
    fn crc32c_chains_at_any_split(data in proptest::collection::vec(any::<u8>(), 0..=8192), split in any::<usize>(), seed in any::<u32>()) {
        let split = split % (data.len() + 1);
        let (head, tail) = data.split_at(split);
        for dispatcher in dispatchers() {
            let whole = dispatcher.compute(seed, &data);
            let chained = dispatcher.compute(dispatcher.compute(seed, head), tail);
            prop_assert_eq!(chained, whole, "{:?} split {}", dispatcher, split);
        }
    }

    #[test]
    fn crc32c_ignores_alignment(data in proptest::collection::vec(any::<u8>(), 0..=2048), offset in 0usize..8) {
        let mut buffer = vec![0u8; data.len() + 8];
        buffer[offset..offset + data.len()].copy_from_slice(&data);
        let shifted = &buffer[offset..offset + data.len()];
        for dispatcher in dispatchers() {
            prop_assert_eq!(dispatcher.compute(0, shifted), dispatcher.compute(0, &data));
        }
    }

    #[test]
    fn crc32c_empty_is_identity(seed in any::<u32>()) {
        prop_assert_eq!(crc32c_accelerated(&[], seed), seed);
    }

    #[test]
    fn crc32_matches_naive(data in proptest::collection::vec(any::<u8>(), 0..=1024)) {
        prop_assert_eq!(
            crc32_accelerated(&data, 0),
            software::crc32_naive(0, software::CRC32_POLYNOMIAL, &data)
        );
    }
}

#[test]
fn known_vectors() {
    assert_eq!(crc32c_accelerated(b"123456789", 0), CRC32C_CHECK);
    assert_eq!(crc32_accelerated(b"123456789", 0), CRC32_CHECK);
    for dispatcher in dispatchers() {
        assert_eq!(dispatcher.compute(0, b"123456789"), CRC32C_CHECK, "{dispatcher:?}");
    }
}

#[test]
fn wide_to_stripe_transition_lengths() {
    let data: Vec<u8> = (0..4200u32)
        .map(|i| (i.wrapping_mul(0x9E37_79B9) >> 13) as u8)
        .collect();
    for dispatcher in dispatchers() {
        for len in 248..=4160 {
            assert_eq!(
                dispatcher.compute(0, &data[..len]),
                software::crc32c(0, &data[..len]),
                "{dispatcher:?} length {len}"
            );
        }
    }
}

#[test]
fn capabilities_are_cached() {
    let caps = Caps::get();
    assert_eq!(Caps::get(), caps);
    assert!(Dispatcher::global().strategy().is_supported(caps));
}
