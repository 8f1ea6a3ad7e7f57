//! Key derivation - turning names into tree keys.
//!
//! Any deterministic `bytes -> u32` function works. Different names can
//! collide on one key; the catalog keeps every row of a key in one bucket
//! and filters by name when reading it back.

use crate::common::config::HashKind;
use crate::index::Key;

/// A deterministic byte-string hash.
pub trait KeyHasher {
    fn hash(&self, bytes: &[u8]) -> u32;
}

/// Bernstein's `h = h * 33 + c` hash, seeded with 5381.
#[derive(Debug, Clone, Copy, Default)]
pub struct Djb2;

impl KeyHasher for Djb2 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        bytes.iter().fold(5381u32, |hash, &byte| {
            (hash << 5).wrapping_add(hash).wrapping_add(u32::from(byte))
        })
    }
}

/// CRC-32 (IEEE) via `crc32fast`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32;

impl KeyHasher for Crc32 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        crc32fast::hash(bytes)
    }
}

/// Hasher picked at runtime from configuration.
#[derive(Debug, Clone, Copy)]
pub enum AnyHasher {
    Djb2(Djb2),
    Crc32(Crc32),
}

impl From<HashKind> for AnyHasher {
    fn from(kind: HashKind) -> Self {
        match kind {
            HashKind::Djb2 => AnyHasher::Djb2(Djb2),
            HashKind::Crc32 => AnyHasher::Crc32(Crc32),
        }
    }
}

impl KeyHasher for AnyHasher {
    fn hash(&self, bytes: &[u8]) -> u32 {
        match self {
            AnyHasher::Djb2(h) => h.hash(bytes),
            AnyHasher::Crc32(h) => h.hash(bytes),
        }
    }
}

/// Tree key for `name`.
///
/// The 32 hash bits are reinterpreted as a signed key, so hashes above
/// `i32::MAX` become negative keys. Ordering between hashed keys carries no
/// meaning anyway.
#[inline]
pub fn key_for<H: KeyHasher + ?Sized>(hasher: &H, name: &str) -> Key {
    hasher.hash(name.as_bytes()) as Key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(Djb2.hash(b""), 5381);
        // 5381 * 33 + 'a'
        assert_eq!(Djb2.hash(b"a"), 177_670);
        assert_eq!(Djb2.hash(b"ab"), 177_670 * 33 + 98);
    }

    #[test]
    fn test_djb2_wraps() {
        // Long inputs must not overflow-panic in debug builds
        let long = "x".repeat(1000);
        let _ = Djb2.hash(long.as_bytes());
    }

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(Crc32.hash(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_any_hasher_dispatch() {
        let djb2: AnyHasher = HashKind::Djb2.into();
        let crc: AnyHasher = HashKind::Crc32.into();
        assert_eq!(djb2.hash(b"Physics"), Djb2.hash(b"Physics"));
        assert_eq!(crc.hash(b"Physics"), Crc32.hash(b"Physics"));
    }

    #[test]
    fn test_key_for_reinterprets_bits() {
        assert_eq!(key_for(&Crc32, "123456789"), 0xCBF4_3926_u32 as i32);
        assert!(key_for(&Crc32, "123456789") < 0);
        assert_eq!(key_for(&Djb2, "a"), 177_670);
    }
}
