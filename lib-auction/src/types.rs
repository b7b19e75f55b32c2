//! Auction state model.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use lib_types::{to_canonical_json, Address, BlockTime, Coin};

use crate::params::AuctionParams;

/// Lifecycle state of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Accepting sealed commits.
    CommitsOpen,
    /// Accepting reveals of prior commits.
    RevealsOpen,
    /// Settled with a winner.
    Completed,
    /// Settled without a valid winner.
    Expired,
}

impl AuctionStatus {
    /// Settled auctions only await retention-window deletion.
    pub fn is_settled(&self) -> bool {
        matches!(self, AuctionStatus::Completed | AuctionStatus::Expired)
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuctionStatus::CommitsOpen => "commits_open",
            AuctionStatus::RevealsOpen => "reveals_open",
            AuctionStatus::Completed => "completed",
            AuctionStatus::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle state of a single bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Sealed commit recorded; hash not yet opened.
    Committed,
    /// Reveal matched the commit hash; amount escrowed.
    Revealed,
    /// Never revealed; commit fee forfeited at settlement.
    Expired,
}

/// A sealed-bid second-price auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: String,
    pub status: AuctionStatus,
    pub owner_address: Address,
    pub create_time: BlockTime,
    pub commits_end_time: BlockTime,
    pub reveals_end_time: BlockTime,
    pub commit_fee: Coin,
    pub reveal_fee: Coin,
    pub minimum_bid: Coin,
    /// Populated at settlement.
    pub winner_address: Option<Address>,
    pub winning_bid: Option<Coin>,
    pub winning_price: Option<Coin>,
}

impl Auction {
    /// Build a fresh auction in `commits_open`, windows anchored at `now`.
    ///
    /// Window arithmetic saturates only in theory; params are
    /// governance-bounded and block times are far from the representable
    /// edge.
    pub fn create(id: String, owner: Address, now: BlockTime, params: &AuctionParams) -> Self {
        let commits_end = now
            .checked_add(params.commits_duration)
            .unwrap_or(now);
        let reveals_end = commits_end
            .checked_add(params.reveals_duration)
            .unwrap_or(commits_end);
        Self {
            id,
            status: AuctionStatus::CommitsOpen,
            owner_address: owner,
            create_time: now,
            commits_end_time: commits_end,
            reveals_end_time: reveals_end,
            commit_fee: params.commit_fee.clone(),
            reveal_fee: params.reveal_fee.clone(),
            minimum_bid: params.minimum_bid.clone(),
            winner_address: None,
            winning_bid: None,
            winning_price: None,
        }
    }
}

/// A bid in an auction, keyed by (auction, bidder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub auction_id: String,
    pub bidder_address: Address,
    pub status: BidStatus,
    pub commit_hash: String,
    pub commit_time: BlockTime,
    pub reveal_time: Option<BlockTime>,
    pub commit_fee: Coin,
    pub reveal_fee: Option<Coin>,
    pub bid_amount: Option<Coin>,
}

/// The opened form of a sealed bid.
///
/// Clients hash the canonical JSON of this payload to produce the commit
/// hash, then submit the same JSON verbatim during the reveal window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealPayload {
    pub bid_amount: Coin,
    /// Client-chosen blinding noise, hex encoded.
    pub nonce: String,
}

impl RevealPayload {
    /// Hex SHA-256 over the canonical JSON encoding.
    pub fn commit_hash(&self) -> Result<String, serde_json::Error> {
        let bytes = to_canonical_json(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
