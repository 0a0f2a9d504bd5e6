//! Folding and reduction constants for CRC32C (reflected).
//!
//! The kernels use the literal tables below. The `const fn`s reproduce them
//! from the polynomial and exist so the tables can be checked, not so the
//! kernels can compute them.

/// CRC32C generator with the explicit x^32 term.
pub const CRC32C_POLYNOMIAL_64: u64 = 0x1_1EDC_6F41;

/// Stripe recombination keys `(k0, k1)` for the 256-byte block.
/// Stripe 0 is shifted over 168 bytes, stripe 1 over 80.
pub const STRIPE_KEYS_256: (u64, u64) = (0x1b3d_8f29, 0x39d3_b296);
/// 1024-byte block: shifts of 680 and 344 bytes.
pub const STRIPE_KEYS_1024: (u64, u64) = (0xe417_f38a, 0x8f15_8014);
/// 3072-byte block: shifts of 2048 and 1024 bytes.
pub const STRIPE_KEYS_3072: (u64, u64) = (0xa51b_6135, 0x1700_76fa);

/// Four-lane fold, distance 4 * 512 bits: `(x^2080, x^2016)`.
pub const WIDE_K1K2: (u64, u64) = (0xdcb1_7aa4, 0xb9e0_2b86);
/// Single-lane fold, distance 512 bits: `(x^544, x^480)`.
pub const WIDE_K3K4: (u64, u64) = (0x740e_ef02, 0x9e4a_ddf8);
/// 128-bit fold: `(x^160, x^96)`.
pub const WIDE_K5K6: (u64, u64) = (0xf20c_0dfe, 0x1_4cd0_0bd6);
/// 64-bit fold: `x^64`.
pub const WIDE_K7: u64 = 0xdd45_aab8;
/// Barrett pair `(P', mu')`.
pub const BARRETT_POLY_MU: (u64, u64) = (0x1_05ec_76f1, 0xdea7_13f1);

/// `x^n mod P(x)` in normal (non-reflected) form.
pub const fn xpow_mod(n: u32) -> u64 {
    let mut remainder: u64 = 1;
    let mut i = 0;
    while i < n {
        remainder <<= 1;
        if remainder & (1 << 32) != 0 {
            remainder ^= CRC32C_POLYNOMIAL_64;
        }
        i += 1;
    }
    remainder
}

/// Key that shifts a raw CRC over `distance_bytes` of zeros when multiplied
/// and run through one `crc32q` with a zero accumulator.
pub const fn stripe_key(distance_bytes: u32) -> u64 {
    (xpow_mod(distance_bytes * 8 - 33) as u32).reverse_bits() as u64
}

/// Vector fold key: `(x^exponent mod P)' << 1`.
pub const fn fold_key(exponent: u32) -> u64 {
    ((xpow_mod(exponent) as u32).reverse_bits() as u64) << 1
}

/// `floor(x^64 / P(x))`.
pub const fn barrett_quotient() -> u64 {
    let mut dividend: u128 = 1 << 64;
    let mut quotient = 0u64;
    let mut bit = 64;
    while bit >= 32 {
        if (dividend >> bit) & 1 == 1 {
            dividend ^= (CRC32C_POLYNOMIAL_64 as u128) << (bit - 32);
            quotient |= 1 << (bit - 32);
        }
        bit -= 1;
    }
    quotient
}

/// Reverse the low 33 bits.
pub const fn reverse_constant(mut constant: u64) -> u64 {
    let mut reversed_constant = 0;
    let mut count = 0;
    while count < 33 {
        reversed_constant = (reversed_constant << 1) ^ (constant & 1);
        constant >>= 1;
        count += 1;
    }
    reversed_constant
}
