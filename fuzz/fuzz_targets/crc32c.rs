#![no_main]
use crc32c_accel::check32::software;
use crc32c_accel::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let naive = software::crc32_naive(0, software::CRC32C_POLYNOMIAL, data);
    for strategy in Strategy::ALL {
        let mut crc = Crc32C::with_strategy(strategy);
        crc.update(data);
        assert_eq!(naive, crc.digest(), "{strategy}");
    }
});
