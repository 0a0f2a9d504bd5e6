use super::caps::Caps;
use super::dispatch::{Dispatcher, Strategy};
use super::Crc32Digest;

/// Streaming CRC32C (Castagnoli).
#[derive(Clone, Copy, Debug)]
pub struct Crc32C {
    state: u32,
    dispatcher: Dispatcher,
}

impl Crc32C {
    /// Creates a new `Crc32C` using the fastest strategy this CPU supports
    /// (or the one forced through `CRC32C_ACCEL_FORCE`).
    pub fn new() -> Self {
        Self::with_dispatcher(*Dispatcher::global())
    }

    /// Creates a new `Crc32C` using the slicing-by-16 tables
    pub fn new_software() -> Self {
        Self::with_dispatcher(Dispatcher::software())
    }

    /// Creates a new `Crc32C` using `strategy`, or the best supported strategy
    /// below it.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self::with_dispatcher(Dispatcher::new(Caps::get(), strategy))
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            state: 0,
            dispatcher,
        }
    }

    /// Continues a checksum whose value so far is `crc`.
    pub fn resume(crc: u32) -> Self {
        Self {
            state: crc,
            ..Self::new()
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.dispatcher.strategy()
    }
}

impl Default for Crc32C {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32Digest for Crc32C {
    fn update(&mut self, data: &[u8]) {
        self.state = self.dispatcher.compute(self.state, data);
    }

    fn digest(&self) -> u32 {
        self.state
    }
}
