//! Table-driven CRC32 / CRC32C.
//!
//! This is the fallback used when the scalar CRC instruction is missing, and the
//! oracle every accelerated path is tested against.

pub const CRC32C_POLYNOMIAL: u32 = 0x1EDC6F41;
pub const CRC32_POLYNOMIAL: u32 = 0x04C11DB7;

pub(crate) static CRC32C_LOOKUP_TABLE: [[u32; 256]; 16] =
    generate_lookup_table_16(CRC32C_POLYNOMIAL);
pub(crate) static CRC32_LOOKUP_TABLE: [[u32; 256]; 16] =
    generate_lookup_table_16(CRC32_POLYNOMIAL);

/// Bit-at-a-time reflected CRC over `polynomial` (given in normal form).
pub const fn crc32_naive(prev_crc: u32, polynomial: u32, data: &[u8]) -> u32 {
    let mut crc = !prev_crc;
    let polynomial = polynomial.reverse_bits();
    let mut i = 0;
    while i < data.len() {
        crc ^= data[i] as u32;

        let mut j = 0;
        while j < 8 {
            if crc & 1u32 == 1u32 {
                crc = crc >> 1 ^ polynomial;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        i += 1;
    }

    !crc
}

/// Slicing-by-16 CRC using tables from [`generate_lookup_table_16`].
pub fn crc32_lookup(prev_crc: u32, lookup_table: &[[u32; 256]; 16], mut data: &[u8]) -> u32 {
    let mut crc: u32 = !prev_crc;

    while let Some((chunk, rest)) = data.split_first_chunk::<16>() {
        crc = lookup_table[0][chunk[15] as usize]
            ^ lookup_table[1][chunk[14] as usize]
            ^ lookup_table[2][chunk[13] as usize]
            ^ lookup_table[3][chunk[12] as usize]
            ^ lookup_table[4][chunk[11] as usize]
            ^ lookup_table[5][chunk[10] as usize]
            ^ lookup_table[6][chunk[9] as usize]
            ^ lookup_table[7][chunk[8] as usize]
            ^ lookup_table[8][chunk[7] as usize]
            ^ lookup_table[9][chunk[6] as usize]
            ^ lookup_table[10][chunk[5] as usize]
            ^ lookup_table[11][chunk[4] as usize]
            ^ lookup_table[12][(chunk[3] ^ (crc >> 24) as u8) as usize]
            ^ lookup_table[13][(chunk[2] ^ (crc >> 16) as u8) as usize]
            ^ lookup_table[14][(chunk[1] ^ (crc >> 8) as u8) as usize]
            ^ lookup_table[15][(chunk[0] ^ crc as u8) as usize];
        data = rest;
    }
    for &b in data {
        crc = lookup_table[0][((crc as u8) ^ b) as usize] ^ (crc >> 8);
    }

    !crc
}

/// CRC32C through the slicing-by-16 tables.
#[inline]
pub fn crc32c(prev_crc: u32, data: &[u8]) -> u32 {
    crc32_lookup(prev_crc, &CRC32C_LOOKUP_TABLE, data)
}

/// CRC32 (IEEE) through the slicing-by-16 tables.
#[inline]
pub fn crc32(prev_crc: u32, data: &[u8]) -> u32 {
    crc32_lookup(prev_crc, &CRC32_LOOKUP_TABLE, data)
}

pub const fn generate_lookup_table_16(polynomial: u32) -> [[u32; 256]; 16] {
    let mut table = [[0; 256]; 16];

    table[0] = generate_lookup_table(polynomial);
    let mut length = 0;

    while length < 256 {
        let mut crc = table[0][length];
        let mut j = 1;
        while j < 16 {
            crc = (crc >> 8) ^ table[0][crc as u8 as usize];
            table[j][length] = crc;
            j += 1;
        }
        length += 1;
    }

    table
}

pub const fn generate_lookup_table(polynomial: u32) -> [u32; 256] {
    let mut table = [0; 256];
    let polynomial = polynomial.reverse_bits();
    let mut length = 0;

    while length < 256 {
        let mut crc = length;
        let mut j = 0;
        while j < 8 {
            if crc & 1u32 == 1u32 {
                crc = (crc >> 1) ^ polynomial;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[length as usize] = crc;
        length += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32c_naive() {
        assert_eq!(crc32_naive(0, CRC32C_POLYNOMIAL, b""), 0);
        assert_eq!(crc32_naive(0, CRC32C_POLYNOMIAL, b"123456789"), 0xE3069283);
        assert_eq!(crc32_naive(0, CRC32C_POLYNOMIAL, b"hello-world"), 4099351003);
    }

    #[test]
    fn test_crc32_naive() {
        assert_eq!(crc32_naive(0, CRC32_POLYNOMIAL, b""), 0);
        assert_eq!(crc32_naive(0, CRC32_POLYNOMIAL, b"123456789"), 0xCBF43926);
        assert_eq!(crc32_naive(0, CRC32_POLYNOMIAL, b"hello-world"), 2983461467);
    }

    #[test]
    fn test_lookup_matches_naive() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 + 7) as u8).collect();
        for len in [0, 1, 15, 16, 17, 31, 32, 33, 255, 1000] {
            assert_eq!(
                crc32c(0, &data[..len]),
                crc32_naive(0, CRC32C_POLYNOMIAL, &data[..len]),
                "crc32c length {len}"
            );
            assert_eq!(
                crc32(0, &data[..len]),
                crc32_naive(0, CRC32_POLYNOMIAL, &data[..len]),
                "crc32 length {len}"
            );
        }
    }

    #[test]
    fn test_lookup_table_first_entries() {
        let table = generate_lookup_table(CRC32C_POLYNOMIAL);
        assert_eq!(table[0], 0);
        assert_eq!(table[1], 0xF26B8303);
        assert_eq!(table[128], 0x82F63B78);
    }
}
