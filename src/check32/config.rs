//! Runtime overrides for strategy selection.
//!
//! `CRC32C_ACCEL_FORCE` picks a strategy instead of the automatic choice. The
//! value is always clamped to the detected capabilities, so forcing `wide` on a
//! CPU without AVX-512 still runs the fastest strategy that CPU supports.

use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

use super::dispatch::Strategy;

pub const FORCE_ENV: &str = "CRC32C_ACCEL_FORCE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown crc32c strategy `{0}` (expected auto, software, scalar, stripe or wide)")]
pub struct ParseStrategyError(String);

/// Requested strategy, before clamping. `None` means automatic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub force: Option<Strategy>,
}

impl Config {
    /// Parse a force value. Empty and `auto` mean automatic selection.
    pub fn parse(value: &str) -> Result<Self, ParseStrategyError> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            return Ok(Self::default());
        }
        Ok(Self {
            force: Some(value.parse()?),
        })
    }

    pub fn from_env() -> Result<Self, ParseStrategyError> {
        match std::env::var(FORCE_ENV) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Process-wide configuration, read once. Invalid values are logged and
    /// ignored.
    pub fn get() -> Self {
        static CONFIG: OnceLock<Config> = OnceLock::new();
        *CONFIG.get_or_init(|| {
            Self::from_env().unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring {FORCE_ENV}");
                Self::default()
            })
        })
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let matches = |names: &[&str]| names.iter().any(|n| value.eq_ignore_ascii_case(n));

        if matches(&["software", "portable", "table"]) {
            Ok(Strategy::Software)
        } else if matches(&["scalar", "sse42"]) {
            Ok(Strategy::Scalar)
        } else if matches(&["stripe", "stripefold", "pclmul"]) {
            Ok(Strategy::StripeFold)
        } else if matches(&["wide", "widefold", "avx512", "vpclmul"]) {
            Ok(Strategy::WideFold)
        } else {
            Err(ParseStrategyError(value.to_owned()))
        }
    }
}
