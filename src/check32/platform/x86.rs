use core::arch::x86_64::{
    _mm_clmulepi64_si128, _mm_crc32_u64, _mm_crc32_u8, _mm_cvtsi128_si64, _mm_cvtsi64_si128,
    _mm_prefetch, _MM_HINT_T0,
};

use super::avx512;
use crate::check32::constants::{STRIPE_KEYS_1024, STRIPE_KEYS_256, STRIPE_KEYS_3072};
use crate::check32::dispatch::Strategy;

/// Full CRC32C pipeline for a hardware strategy: byte-align, fold the bulk,
/// drain the rest with `crc32`.
///
/// # Safety
/// The CPU must support every feature `strategy` requires.
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn compute(strategy: Strategy, previous_crc: u32, data: &[u8]) -> u32 {
    let crc = !previous_crc;

    // `crc32 r32, m8` has no alignment requirement, so short inputs skip the prologue.
    if data.len() < 8 {
        return !drain_bytes(crc, data);
    }

    let leading = (8 - (data.as_ptr() as usize & 7)) & 7;
    let (head, body) = data.split_at(leading);
    let crc = drain_bytes(crc, head);

    let (crc, rest) = match strategy {
        Strategy::WideFold => avx512::fold_wide(crc, body),
        Strategy::StripeFold => fold_stripes(crc, body),
        Strategy::Scalar | Strategy::Software => (crc, body),
    };

    let (crc, tail) = drain_quads(crc, rest);
    !drain_bytes(crc, tail)
}

#[target_feature(enable = "sse4.2")]
#[inline]
unsafe fn drain_bytes(mut crc: u32, data: &[u8]) -> u32 {
    for &byte in data {
        crc = _mm_crc32_u8(crc, byte);
    }
    crc
}

/// Consumes whole 8-byte words and returns the 0..8 trailing bytes.
#[target_feature(enable = "sse4.2")]
#[inline]
unsafe fn drain_quads(crc: u32, mut data: &[u8]) -> (u32, &[u8]) {
    let mut crc = crc as u64;
    while let Some((word, rest)) = data.split_first_chunk::<8>() {
        crc = _mm_crc32_u64(crc, u64::from_le_bytes(*word));
        data = rest;
    }
    (crc as u32, data)
}

/// Folds 3072, then 1024, then 256-byte blocks until fewer than 256 bytes remain.
///
/// # Safety
/// Requires `sse4.2` and `pclmulqdq`.
#[target_feature(enable = "sse4.2,pclmulqdq")]
pub(crate) unsafe fn fold_stripes(mut crc: u32, mut data: &[u8]) -> (u32, &[u8]) {
    while let Some((block, rest)) = data.split_first_chunk::<3072>() {
        crc = fold_3072(crc, block);
        data = rest;
    }
    while let Some((block, rest)) = data.split_first_chunk::<1024>() {
        crc = fold_1024(crc, block);
        data = rest;
    }
    while let Some((block, rest)) = data.split_first_chunk::<256>() {
        crc = fold_256(crc, block);
        data = rest;
    }
    (crc, data)
}

/// # Safety
/// `ptr + offset .. ptr + offset + 8` must be readable.
#[inline(always)]
unsafe fn load_u64(ptr: *const u8, offset: usize) -> u64 {
    core::ptr::read_unaligned(ptr.add(offset) as *const u64)
}

#[inline(always)]
unsafe fn prefetch(ptr: *const u8, offset: usize) {
    _mm_prefetch::<_MM_HINT_T0>(ptr.wrapping_add(offset) as *const i8);
}

/// Advances three independent `crc32q` chains by `words` words each, starting at
/// `ptr + offsets[i]`.
#[target_feature(enable = "sse4.2")]
#[inline]
unsafe fn crc32q_3way(
    mut crcs: [u64; 3],
    ptr: *const u8,
    offsets: [usize; 3],
    words: usize,
) -> [u64; 3] {
    for i in 0..words {
        let at = i * 8;
        crcs[0] = _mm_crc32_u64(crcs[0], load_u64(ptr, offsets[0] + at));
        crcs[1] = _mm_crc32_u64(crcs[1], load_u64(ptr, offsets[1] + at));
        crcs[2] = _mm_crc32_u64(crcs[2], load_u64(ptr, offsets[2] + at));
    }
    crcs
}

/// Shift `c0` and `c1` past the stripes that follow them and merge with `c2`.
///
/// `clmul(c, k)` is at most 63 bits wide; one `crc32q` from zero reduces it.
#[target_feature(enable = "sse4.2,pclmulqdq")]
#[inline]
unsafe fn combine_stripes([c0, c1, c2]: [u64; 3], (k0, k1): (u64, u64)) -> u32 {
    let a = _mm_clmulepi64_si128(
        _mm_cvtsi64_si128(c0 as i64),
        _mm_cvtsi64_si128(k0 as i64),
        0x00,
    );
    let b = _mm_clmulepi64_si128(
        _mm_cvtsi64_si128(c1 as i64),
        _mm_cvtsi64_si128(k1 as i64),
        0x00,
    );
    let a = _mm_crc32_u64(0, _mm_cvtsi128_si64(a) as u64);
    let b = _mm_crc32_u64(0, _mm_cvtsi128_si64(b) as u64);
    (a ^ b ^ c2) as u32
}

/// Stripes of 88, 88 and 80 bytes.
#[target_feature(enable = "sse4.2,pclmulqdq")]
pub(crate) unsafe fn fold_256(crc: u32, block: &[u8; 256]) -> u32 {
    let p = block.as_ptr();
    let mut crcs = crc32q_3way([crc as u64, 0, 0], p, [0, 88, 176], 10);
    crcs[0] = _mm_crc32_u64(crcs[0], load_u64(p, 80));
    crcs[1] = _mm_crc32_u64(crcs[1], load_u64(p, 168));
    combine_stripes(crcs, STRIPE_KEYS_256)
}

/// Stripes of 344, 336 and 344 bytes, walked in five 64-byte steps plus a tail.
#[target_feature(enable = "sse4.2,pclmulqdq")]
pub(crate) unsafe fn fold_1024(crc: u32, block: &[u8; 1024]) -> u32 {
    const OFFSETS: [usize; 3] = [0, 344, 680];

    let mut p = block.as_ptr();
    let mut crcs = [crc as u64, 0, 0];
    for _ in 0..5 {
        prefetch(p, OFFSETS[0] + 128);
        prefetch(p, OFFSETS[1] + 128);
        prefetch(p, OFFSETS[2] + 128);
        crcs = crc32q_3way(crcs, p, OFFSETS, 8);
        p = p.add(64);
    }

    crcs = crc32q_3way(crcs, p, OFFSETS, 2);
    crcs[0] = _mm_crc32_u64(crcs[0], load_u64(p, 16));
    crcs[2] = _mm_crc32_u64(crcs[2], load_u64(p, OFFSETS[2] + 16));
    combine_stripes(crcs, STRIPE_KEYS_1024)
}

/// Three 1024-byte stripes, walked in sixteen 64-byte steps.
#[target_feature(enable = "sse4.2,pclmulqdq")]
pub(crate) unsafe fn fold_3072(crc: u32, block: &[u8; 3072]) -> u32 {
    const OFFSETS: [usize; 3] = [0, 1024, 2048];

    let mut p = block.as_ptr();
    let mut crcs = [crc as u64, 0, 0];
    for _ in 0..16 {
        prefetch(p, OFFSETS[0] + 128);
        prefetch(p, OFFSETS[1] + 128);
        prefetch(p, OFFSETS[2] + 128);
        crcs = crc32q_3way(crcs, p, OFFSETS, 8);
        p = p.add(64);
    }
    combine_stripes(crcs, STRIPE_KEYS_3072)
}
