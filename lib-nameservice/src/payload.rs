//! Record payloads and signature verification.
//!
//! Clients submit `(attributes, signatures)`. Each signature is taken over
//! the canonical bytes of the attributes; the record's owner set is the
//! sorted, deduplicated list of addresses behind the verified keys. One bad
//! signature rejects the whole payload.

use serde::{Deserialize, Serialize};

use lib_types::{Address, PublicKey, Signature};

use crate::attributes::Attributes;
use crate::content::{canonical_bytes, content_id};
use crate::errors::{RegistryError, RegistryResult};

/// A single `(public key, signature)` pair, base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSignature {
    pub pub_key: String,
    pub sig: String,
}

/// A signed record submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub record: Attributes,
    pub signatures: Vec<PayloadSignature>,
}

impl Payload {
    pub fn new(record: Attributes, signatures: Vec<PayloadSignature>) -> Self {
        Self { record, signatures }
    }

    /// The bytes every signature must cover.
    pub fn sign_bytes(&self) -> RegistryResult<Vec<u8>> {
        canonical_bytes(&self.record)
    }

    /// The content id this payload will be stored under.
    pub fn record_id(&self) -> RegistryResult<String> {
        Ok(content_id(&self.sign_bytes()?))
    }

    /// Verify every signature and derive the owner set: sorted and
    /// deduplicated addresses of the signing keys.
    pub fn verify_owners(&self) -> RegistryResult<Vec<Address>> {
        let sign_bytes = self.sign_bytes()?;
        let mut owners = Vec::with_capacity(self.signatures.len());
        for entry in &self.signatures {
            let key = PublicKey::from_base64(&entry.pub_key)
                .map_err(|_| RegistryError::Unauthorized("invalid public key".into()))?;
            let signature = Signature::from_base64(&entry.sig)
                .map_err(|_| RegistryError::Unauthorized("invalid signature".into()))?;
            key.verify(&sign_bytes, &signature)
                .map_err(|_| RegistryError::Unauthorized("signature mismatch".into()))?;
            owners.push(key.address());
        }
        owners.sort();
        owners.dedup();
        Ok(owners)
    }
}

/// Produce a signature entry for a payload (client-side helper, also used
/// heavily by the test fixtures).
pub fn sign_payload(
    attributes: &Attributes,
    key: &lib_types::SigningKey,
) -> RegistryResult<PayloadSignature> {
    let bytes = canonical_bytes(attributes)?;
    Ok(PayloadSignature {
        pub_key: key.public().to_base64(),
        sig: key.sign(&bytes).to_base64(),
    })
}
