//! Content-addressed hash type using SHA-1

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Length of a raw digest in bytes
pub const HASH_LEN: usize = 20;

/// A 20-byte SHA-1 digest identifying an object by its canonical encoding
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// Create a hash from raw bytes
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    /// Create a hash from a slice that must be exactly 20 bytes long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; HASH_LEN] = bytes.try_into().ok()?;
        Some(Hash(arr))
    }

    /// Hash arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        Self::digest_many(&[data])
    }

    /// Hash multiple pieces of data as if they were concatenated
    pub fn digest_many(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha1::new();
        for part in parts {
            hasher.update(part);
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&hasher.finalize());
        Hash(arr)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Convert to a 40-character lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 40-character hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != HASH_LEN * 2 {
            return Err(crate::Error::InvalidHash(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| crate::Error::InvalidHash(s.to_string()))?;
        Self::from_slice(&bytes).ok_or_else(|| crate::Error::InvalidHash(s.to_string()))
    }

    /// Get a short prefix for display (first 7 chars, like git)
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// The fan-out directory name (first 2 hex chars)
    pub fn prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// The file name within the fan-out directory (remaining 38 hex chars)
    pub fn remainder(&self) -> String {
        hex::encode(&self.0[1..])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short())
    }
}

impl FromStr for Hash {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_digest() {
        let h1 = Hash::digest(b"hello");
        let h2 = Hash::digest(b"hello");
        let h3 = Hash::digest(b"world");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_known_sha1_value() {
        let h = Hash::digest(b"abc");
        assert_eq!(h.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_digest_many_matches_concatenation() {
        assert_eq!(
            Hash::digest_many(&[b"blob 3\0", b"abc"]),
            Hash::digest(b"blob 3\0abc")
        );
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h1 = Hash::digest(b"test data");
        let hex = h1.to_hex();
        assert_eq!(hex.len(), 40);
        let h2 = Hash::from_hex(&hex).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_from_hex_accepts_uppercase() {
        let h = Hash::from_hex("BD9DBF5AAE1A3862DD1526723246B20206E5FC37").unwrap();
        assert_eq!(h.to_hex(), "bd9dbf5aae1a3862dd1526723246b20206e5fc37");
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            Hash::from_hex("abc"),
            Err(crate::Error::InvalidHash(_))
        ));
        assert!(matches!(
            Hash::from_hex("zz9dbf5aae1a3862dd1526723246b20206e5fc37"),
            Err(crate::Error::InvalidHash(_))
        ));
    }

    #[test]
    fn test_fan_out_split() {
        let h = Hash::from_hex("bd9dbf5aae1a3862dd1526723246b20206e5fc37").unwrap();
        assert_eq!(h.prefix(), "bd");
        assert_eq!(h.remainder(), "9dbf5aae1a3862dd1526723246b20206e5fc37");
        assert_eq!(h.short(), "bd9dbf5");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let h = Hash::digest(b"serde");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
