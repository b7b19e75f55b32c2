//! Account addresses and small aliases.
//!
//! Addresses are fixed-size byte arrays derived from signing keys. The wire
//! and display form is fixed-width lowercase hex, so the lexicographic order
//! of the rendered strings equals the byte order of the raw arrays. Owner
//! lists rely on that equivalence when they are sorted.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Block height in the chain (0-indexed)
pub type BlockHeight = u64;

/// Size of an account address in bytes
pub const ADDRESS_SIZE: usize = 20;

/// Account address, derived from a signing public key.
///
/// Serialized as a lowercase hex string in every wire format.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; ADDRESS_SIZE])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_SIZE]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut buf = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(s, &mut buf)?;
        Ok(Self(buf))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
