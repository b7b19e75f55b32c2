//! Canonical JSON encoding.
//!
//! Wire rule: any value that gets hashed (record attributes, sealed-bid
//! reveals) is rendered as compact JSON with every object's keys in
//! lexicographic order. Two logically equal values MUST produce
//! byte-identical encodings.

use serde::Serialize;
use serde_json::Value;

/// Canonical JSON bytes of any serializable value.
///
/// Round-trips through `serde_json::Value`, whose object representation is
/// a sorted map, so key order in the source (struct field order, client
/// JSON order) never leaks into the encoding.
pub fn to_canonical_json(value: &impl Serialize) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    canonical_value_bytes(&value)
}

/// Canonical JSON bytes of an already-parsed value.
pub fn canonical_value_bytes(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}
