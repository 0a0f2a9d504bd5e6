#![no_main]
use crc32c_accel::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 2 {
        let split = u16::from_le_bytes([data[0], data[1]]) as usize % (data.len() - 1);
        let data = &data[2..];
        let (head, tail) = data.split_at(split.min(data.len()));

        let whole = crc32c_accelerated(data, 0);
        for strategy in Strategy::ALL {
            let mut crc = Crc32C::with_strategy(strategy);
            crc.update(head);
            crc.update(tail);
            assert_eq!(whole, crc.digest(), "{strategy}");
        }
    }
});
