//! Auction Errors
//!
//! Semantic failures of the auction state machine, distinct from storage
//! errors. Validation errors abort before any store write; execution errors
//! unwind the transaction's buffered writes.

use thiserror::Error;

use crate::bank::BankError;
use lib_store::StoreError;

/// Error during auction message handling or settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("auction not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<BankError> for AuctionError {
    fn from(e: BankError) -> Self {
        match e {
            BankError::InsufficientFunds { .. } => AuctionError::InsufficientFunds(e.to_string()),
            BankError::UnknownAccount(_) => AuctionError::InvalidRequest(e.to_string()),
        }
    }
}

/// Result type for auction operations
pub type AuctionResult<T> = Result<T, AuctionError>;
