//! MurmurHash3, x64 128-bit variant.
//!
//! Non-cryptographic. Used only to turn a canonical component string into a compact,
//! stable identifier.

use crate::error::{FingerprintError, Result};
use std::fmt;
use std::str::FromStr;

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// 128-bit fingerprint identifier, the two 64-bit halves of a murmur3 x64 128 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerprintId {
    pub h1: u64,
    pub h2: u64,
}

impl FingerprintId {
    /// `h1` in the high half.
    pub fn as_u128(&self) -> u128 {
        (u128::from(self.h1) << 64) | u128::from(self.h2)
    }

    /// 32 lowercase hex digits, `h1` first.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.h1, self.h2)
    }
}

impl FromStr for FingerprintId {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FingerprintError::Custom(format!("Invalid fingerprint id: '{s}'"));
        // from_str_radix alone would accept a leading sign
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let (high, low) = s.split_at(16);
        let h1 = u64::from_str_radix(high, 16).map_err(|_| invalid())?;
        let h2 = u64::from_str_radix(low, 16).map_err(|_| invalid())?;
        Ok(Self { h1, h2 })
    }
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

/// Hash `data` with the given seed.
pub fn murmur3_x64_128(data: &[u8], seed: u32) -> FingerprintId {
    let mut h1 = u64::from(seed);
    let mut h2 = u64::from(seed);

    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        let (lo, hi) = block.split_at(8);
        let k1 = u64::from_le_bytes(lo.try_into().unwrap_or([0; 8]));
        let k2 = u64::from_le_bytes(hi.try_into().unwrap_or([0; 8]));

        h1 ^= mix_k1(k1);
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);

        h2 ^= mix_k2(k2);
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }

    let tail = blocks.remainder();
    if tail.len() > 8 {
        let k2 = tail[8..]
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc ^ (u64::from(b) << (i * 8)));
        h2 ^= mix_k2(k2);
    }
    if !tail.is_empty() {
        let k1 = tail[..tail.len().min(8)]
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc ^ (u64::from(b) << (i * 8)));
        h1 ^= mix_k1(k1);
    }

    let len = data.len() as u64;
    h1 ^= len;
    h2 ^= len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    FingerprintId { h1, h2 }
}

/// Hash a string's UTF-8 bytes with seed 0.
pub fn hash_str(s: &str) -> FingerprintId {
    murmur3_x64_128(s.as_bytes(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_seed_zero() {
        assert_eq!(hash_str("").to_hex(), "00000000000000000000000000000000");
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(
            hash_str("The quick brown fox jumps over the lazy dog").to_hex(),
            "e34bbc7bbc071b6c7a433ca9c49a9347"
        );
        assert_eq!(hash_str("hello").to_hex(), "cbd8a7b341bd9b025b1e906a48ae1d19");
    }

    #[test]
    fn test_tail_lengths_differ() {
        // Exercise every tail length 0..=15 across a block boundary
        let data: Vec<u8> = (0u8..48).collect();
        let mut seen = std::collections::HashSet::new();
        for len in 16..=32 {
            assert!(seen.insert(murmur3_x64_128(&data[..len], 0)));
        }
    }

    #[test]
    fn test_hex_parse_roundtrip() {
        let id = hash_str("colorDepth:24");
        let parsed: FingerprintId = id.to_hex().parse().expect("valid hex");
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_u128() >> 64, u128::from(id.h1));
    }

    #[test]
    fn test_hex_parse_rejects_bad_input() {
        assert!("abc".parse::<FingerprintId>().is_err());
        assert!("zz".repeat(16).parse::<FingerprintId>().is_err());
        let signed_low = format!("{}+{}", "0".repeat(16), "f".repeat(15));
        assert!(signed_low.parse::<FingerprintId>().is_err());
        let signed_high = format!("+{}", "1".repeat(31));
        assert!(signed_high.parse::<FingerprintId>().is_err());
    }
}
