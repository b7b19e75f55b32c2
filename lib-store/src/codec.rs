//! Store value codec.
//!
//! Values are bincode. Key encoding is a separate concern owned by each
//! module's `keys` module.

use serde::{de::DeserializeOwned, Serialize};

use crate::{StoreError, StoreResult};

/// Serialize a value for storage.
pub fn to_bytes<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Deserialize a stored value.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
