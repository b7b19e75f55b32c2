//! Auction Event Types
//!
//! Typed events emitted for successful state-changing auction messages and
//! settlements. Attributes carry everything needed to reconstruct the
//! change.

use serde::{Deserialize, Serialize};
use std::fmt;

use lib_types::{Address, Coin};

/// Events emitted by the auction module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// New auction opened for commits.
    CreateAuction {
        auction_id: String,
        signer: Address,
        commit_fee: Coin,
        reveal_fee: Coin,
        minimum_bid: Coin,
    },

    /// Sealed bid committed (fee escrowed).
    CommitBid {
        auction_id: String,
        signer: Address,
        commit_hash: String,
    },

    /// Bid revealed (fee and bid amount escrowed).
    RevealBid {
        auction_id: String,
        signer: Address,
        bid_amount: Coin,
    },

    /// Auction settled at end of block.
    AuctionSettled {
        auction_id: String,
        winner_address: Option<Address>,
        winning_bid: Option<Coin>,
        winning_price: Option<Coin>,
    },
}

impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionEvent::CreateAuction { auction_id, .. } => {
                write!(f, "CreateAuction({auction_id})")
            }
            AuctionEvent::CommitBid { auction_id, signer, .. } => {
                write!(f, "CommitBid({auction_id}, {signer})")
            }
            AuctionEvent::RevealBid { auction_id, signer, .. } => {
                write!(f, "RevealBid({auction_id}, {signer})")
            }
            AuctionEvent::AuctionSettled { auction_id, winner_address, .. } => match winner_address
            {
                Some(winner) => write!(f, "AuctionSettled({auction_id}, winner={winner})"),
                None => write!(f, "AuctionSettled({auction_id}, no winner)"),
            },
        }
    }
}
