//! Registry Errors
//!
//! Semantic failures of the name service, distinct from storage errors.
//! Validation errors abort a transaction before any store write; execution
//! errors unwind the transaction's buffered writes. The only error that is
//! converted to success is the content-addressed no-op on `SetRecord` of an
//! already-present id, which never reaches this type.

use thiserror::Error;

use crate::bond::BondError;
use lib_auction::AuctionError;
use lib_store::StoreError;

/// Error during name service message handling or queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Malformed input: missing required fields, unparseable WRN or JSON.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Signature mismatch, or signer is not an owner.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Id, name or WRN not present.
    #[error("not found: {0}")]
    NotFound(String),

    /// Message applied in a state that forbids it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Bond cannot cover rent.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Attempt to reserve a name that is active or under auction.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<BondError> for RegistryError {
    fn from(e: BondError) -> Self {
        match e {
            BondError::NotFound(_) => RegistryError::NotFound(e.to_string()),
            BondError::InsufficientFunds { .. } => RegistryError::InsufficientFunds(e.to_string()),
        }
    }
}

impl From<AuctionError> for RegistryError {
    fn from(e: AuctionError) -> Self {
        match e {
            AuctionError::InvalidRequest(msg) => RegistryError::InvalidRequest(msg),
            AuctionError::NotFound(msg) => RegistryError::NotFound(msg),
            AuctionError::InvalidState(msg) => RegistryError::InvalidState(msg),
            AuctionError::InsufficientFunds(msg) => RegistryError::InsufficientFunds(msg),
            AuctionError::Store(e) => RegistryError::Store(e),
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
