//! Signing keys, public keys and detached signatures.
//!
//! The state machine only ever needs "verifies over a fixed byte string and
//! yields an address"; Ed25519 provides that. Keys and signatures travel in
//! base64 inside record payloads, and an address is the first 20 bytes of
//! the SHA-256 of the verifying key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

use crate::primitives::{Address, ADDRESS_SIZE};

/// Size of an Ed25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 detached signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Errors from key parsing and signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid public key size, expected {PUBLIC_KEY_SIZE}, got {0}")]
    BadKeySize(usize),

    #[error("invalid signature size, expected {SIGNATURE_SIZE}, got {0}")]
    BadSignatureSize(usize),

    #[error("invalid base64 encoding")]
    BadBase64,

    #[error("malformed public key")]
    MalformedKey,

    #[error("signature verification failed")]
    VerificationFailed,
}

/// Ed25519 verifying key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; PUBLIC_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::BadKeySize(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64.decode(text).map_err(|_| CryptoError::BadBase64)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Derive the account address: first 20 bytes of SHA-256 of the key.
    pub fn address(&self) -> Address {
        let digest = Sha256::digest(self.0);
        let mut out = [0u8; ADDRESS_SIZE];
        out.copy_from_slice(&digest[..ADDRESS_SIZE]);
        Address::new(out)
    }

    /// Verify a detached signature over `msg`.
    pub fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|_| CryptoError::MalformedKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(msg, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_base64(&s).map_err(de::Error::custom)
    }
}

/// Detached Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SIGNATURE_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::BadSignatureSize(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }

    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64.decode(text).map_err(|_| CryptoError::BadBase64)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0[..8]))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_base64(&s).map_err(de::Error::custom)
    }
}

/// Ed25519 signing key. Lives client-side and in test fixtures; the state
/// machine itself only verifies.
#[derive(Clone)]
pub struct SigningKey(ed25519_dalek::SigningKey);

impl SigningKey {
    /// Deterministic construction from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.verifying_key().to_bytes())
    }

    pub fn sign(&self, msg: &[u8]) -> Signature {
        use ed25519_dalek::Signer as _;
        Signature(self.0.sign(msg).to_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}
