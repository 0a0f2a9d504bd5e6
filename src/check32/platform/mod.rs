pub(crate) mod avx512;
pub(crate) mod x86;
