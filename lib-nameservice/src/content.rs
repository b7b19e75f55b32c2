//! Content addressing.
//!
//! A record id is a CIDv1 over the canonical JSON of the record's
//! attributes: DAG-JSON codec, SHA2-256 multihash, rendered in the default
//! base32-lower multibase. Two implementations that agree on the canonical
//! bytes agree on the id.

use cid::multihash::Multihash;
use cid::Cid;
use sha2::{Digest, Sha256};

use crate::attributes::{attributes_to_json, Attributes};
use crate::errors::{RegistryError, RegistryResult};
use lib_types::canonical_value_bytes;

/// Multicodec code for DAG-JSON content.
const DAG_JSON_CODEC: u64 = 0x0129;

/// Multihash code for SHA2-256.
const SHA2_256_CODE: u64 = 0x12;

/// Canonical byte representation of an attribute map. These are also the
/// bytes record payload signatures are taken over.
pub fn canonical_bytes(attributes: &Attributes) -> RegistryResult<Vec<u8>> {
    canonical_value_bytes(&attributes_to_json(attributes))
        .map_err(|e| RegistryError::InvalidRequest(format!("invalid record JSON: {e}")))
}

/// Content id of a canonical byte string.
pub fn content_id(canonical: &[u8]) -> String {
    let digest = Sha256::digest(canonical);
    // A 32-byte digest always fits the 64-byte multihash buffer.
    let multihash =
        Multihash::<64>::wrap(SHA2_256_CODE, &digest).expect("sha2-256 digest fits multihash");
    Cid::new_v1(DAG_JSON_CODEC, multihash).to_string()
}

/// Content id of an attribute map.
pub fn record_id(attributes: &Attributes) -> RegistryResult<String> {
    Ok(content_id(&canonical_bytes(attributes)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::attributes_from_json;
    use serde_json::json;

    #[test]
    fn test_id_ignores_key_order() {
        let a = attributes_from_json(serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap()).unwrap();
        let b = attributes_from_json(serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap()).unwrap();
        assert_eq!(record_id(&a).unwrap(), record_id(&b).unwrap());
    }

    #[test]
    fn test_id_is_content_sensitive() {
        let a = attributes_from_json(json!({"type": "example", "name": "a"})).unwrap();
        let b = attributes_from_json(json!({"type": "example", "name": "b"})).unwrap();
        assert_ne!(record_id(&a).unwrap(), record_id(&b).unwrap());
    }

    #[test]
    fn test_id_shape() {
        let attributes = attributes_from_json(json!({"k": "v"})).unwrap();
        let id = record_id(&attributes).unwrap();
        // CIDv1 base32-lower strings start with the 'b' multibase prefix.
        assert!(id.starts_with('b'));
        let parsed: Cid = id.parse().unwrap();
        assert_eq!(parsed.codec(), DAG_JSON_CODEC);
    }

    #[test]
    fn test_canonical_bytes_are_compact_sorted() {
        let attributes =
            attributes_from_json(serde_json::from_str(r#"{"type":"example","name":"a"}"#).unwrap())
                .unwrap();
        assert_eq!(
            canonical_bytes(&attributes).unwrap(),
            br#"{"name":"a","type":"example"}"#.to_vec()
        );
    }
}
