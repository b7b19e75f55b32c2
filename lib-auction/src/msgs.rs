//! Auction message types and stateless validation.
//!
//! `validate_basic` covers everything checkable without state: presence of
//! required fields and well-formed values. Stateful checks live in the
//! keeper.

use serde::{Deserialize, Serialize};

use lib_types::Address;

use crate::errors::{AuctionError, AuctionResult};
use crate::params::AuctionParams;

/// Open a standalone auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAuction {
    pub params: AuctionParams,
    pub signer: Address,
}

impl MsgCreateAuction {
    pub fn validate_basic(&self) -> AuctionResult<()> {
        if self.params.commits_duration.as_secs() <= 0 {
            return Err(AuctionError::InvalidRequest(
                "commits duration must be positive".into(),
            ));
        }
        if self.params.reveals_duration.as_secs() <= 0 {
            return Err(AuctionError::InvalidRequest(
                "reveals duration must be positive".into(),
            ));
        }
        if self.params.minimum_bid.is_zero() {
            return Err(AuctionError::InvalidRequest(
                "minimum bid must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Commit a sealed bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCommitBid {
    pub auction_id: String,
    pub commit_hash: String,
    pub signer: Address,
}

impl MsgCommitBid {
    pub fn validate_basic(&self) -> AuctionResult<()> {
        if self.auction_id.is_empty() {
            return Err(AuctionError::InvalidRequest("auction id is required".into()));
        }
        if self.commit_hash.is_empty() {
            return Err(AuctionError::InvalidRequest("commit hash is required".into()));
        }
        Ok(())
    }
}

/// Reveal a previously committed bid. `reveal` is the canonical JSON of
/// the [`crate::types::RevealPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRevealBid {
    pub auction_id: String,
    pub reveal: String,
    pub signer: Address,
}

impl MsgRevealBid {
    pub fn validate_basic(&self) -> AuctionResult<()> {
        if self.auction_id.is_empty() {
            return Err(AuctionError::InvalidRequest("auction id is required".into()));
        }
        if self.reveal.is_empty() {
            return Err(AuctionError::InvalidRequest("reveal is required".into()));
        }
        Ok(())
    }
}
