//! 512-bit folding kernel.
//!
//! Follows "Fast CRC Computation for Generic Polynomials Using PCLMULQDQ
//! Instruction" (Gopal, Ozturk et al., 2009), widened to four 128-bit lanes per
//! register and four registers in flight.

use core::arch::x86_64::{
    __m128i, __m512i, _mm512_broadcast_i32x4, _mm512_clmulepi64_epi128,
    _mm512_extracti32x4_epi32, _mm512_loadu_si512, _mm512_ternarylogic_epi64,
    _mm512_xor_si512, _mm512_zextsi128_si512, _mm_and_si128, _mm_clmulepi64_si128,
    _mm_cvtsi32_si128, _mm_extract_epi32, _mm_set_epi64x, _mm_setr_epi32, _mm_srli_si128,
    _mm_xor_si128,
};

use crate::check32::constants::{BARRETT_POLY_MU, WIDE_K1K2, WIDE_K3K4, WIDE_K5K6, WIDE_K7};

/// Folds the longest multiple-of-64 prefix of `data` into `crc` and returns the
/// rest (fewer than 64 bytes). Inputs shorter than 256 bytes are returned as is.
///
/// `crc` and the result are raw CRC state, not complemented.
///
/// # Safety
/// Requires `avx512f`, `vpclmulqdq`, `pclmulqdq` and `sse4.1`.
#[target_feature(enable = "avx512f,vpclmulqdq,pclmulqdq,sse4.1")]
pub(crate) unsafe fn fold_wide(crc: u32, data: &[u8]) -> (u32, &[u8]) {
    if data.len() < 256 {
        return (crc, data);
    }

    let mut p = data.as_ptr();
    let mut len = data.len();

    let mut x1 = load_512(p);
    let mut x2 = load_512(p.add(64));
    let mut x3 = load_512(p.add(128));
    let mut x4 = load_512(p.add(192));
    x1 = _mm512_xor_si512(x1, _mm512_zextsi128_si512(_mm_cvtsi32_si128(crc as i32)));
    p = p.add(256);
    len -= 256;

    // four lanes, 256 bytes per step
    let k1k2 = broadcast_pair(WIDE_K1K2);
    while len >= 256 {
        x1 = fold_512(x1, load_512(p), k1k2);
        x2 = fold_512(x2, load_512(p.add(64)), k1k2);
        x3 = fold_512(x3, load_512(p.add(128)), k1k2);
        x4 = fold_512(x4, load_512(p.add(192)), k1k2);
        p = p.add(256);
        len -= 256;
    }

    let k3k4 = broadcast_pair(WIDE_K3K4);
    x1 = fold_512(x1, x2, k3k4);
    x1 = fold_512(x1, x3, k3k4);
    x1 = fold_512(x1, x4, k3k4);

    while len >= 64 {
        x1 = fold_512(x1, load_512(p), k3k4);
        p = p.add(64);
        len -= 64;
    }

    // 512 -> 384 -> 256 -> 128 bits
    let k5k6 = _mm_set_epi64x(WIDE_K5K6.1 as i64, WIDE_K5K6.0 as i64);
    let mut a = _mm512_extracti32x4_epi32(x1, 0);
    a = fold_128(a, _mm512_extracti32x4_epi32(x1, 1), k5k6);
    a = fold_128(a, _mm512_extracti32x4_epi32(x1, 2), k5k6);
    a = fold_128(a, _mm512_extracti32x4_epi32(x1, 3), k5k6);

    // 128 -> 64 bits
    let mask = _mm_setr_epi32(!0, 0, !0, 0);
    let mut t = _mm_clmulepi64_si128(a, k5k6, 0x10);
    a = _mm_xor_si128(_mm_srli_si128(a, 8), t);

    let k7 = _mm_set_epi64x(0, WIDE_K7 as i64);
    t = _mm_srli_si128(a, 4);
    a = _mm_and_si128(a, mask);
    a = _mm_clmulepi64_si128(a, k7, 0x00);
    a = _mm_xor_si128(a, t);

    // Barrett reduce to 32 bits
    let pu = _mm_set_epi64x(BARRETT_POLY_MU.1 as i64, BARRETT_POLY_MU.0 as i64);
    t = _mm_and_si128(a, mask);
    t = _mm_clmulepi64_si128(t, pu, 0x10);
    t = _mm_and_si128(t, mask);
    t = _mm_clmulepi64_si128(t, pu, 0x00);
    a = _mm_xor_si128(a, t);

    let rest = &data[data.len() - len..];
    (_mm_extract_epi32(a, 1) as u32, rest)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn load_512(ptr: *const u8) -> __m512i {
    _mm512_loadu_si512(ptr.cast())
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn broadcast_pair((lo, hi): (u64, u64)) -> __m512i {
    _mm512_broadcast_i32x4(_mm_set_epi64x(hi as i64, lo as i64))
}

/// `acc.lo * k.lo ^ acc.hi * k.hi ^ next`, per 128-bit lane.
#[target_feature(enable = "avx512f,vpclmulqdq")]
#[inline]
unsafe fn fold_512(acc: __m512i, next: __m512i, k: __m512i) -> __m512i {
    let lo = _mm512_clmulepi64_epi128(acc, k, 0x00);
    let hi = _mm512_clmulepi64_epi128(acc, k, 0x11);
    _mm512_ternarylogic_epi64(hi, lo, next, 0x96)
}

#[target_feature(enable = "pclmulqdq,sse2")]
#[inline]
unsafe fn fold_128(a: __m128i, b: __m128i, k: __m128i) -> __m128i {
    let lo = _mm_clmulepi64_si128(a, k, 0x00);
    let hi = _mm_clmulepi64_si128(a, k, 0x11);
    _mm_xor_si128(_mm_xor_si128(b, lo), hi)
}
