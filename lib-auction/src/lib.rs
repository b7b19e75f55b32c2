//! Sealed-Bid Second-Price Auction Engine
//!
//! Commit-reveal auctions used to arbitrate ownership of contested names.
//! The lifecycle is driven entirely by block time:
//!
//! ```text
//!            create
//!  (none) ──────────▶ commits_open
//!                          │ block_time >= commits_end
//!                          ▼
//!                     reveals_open
//!                          │ block_time >= reveals_end
//!                          ▼
//!                 completed / expired ──── retention ────▶ (deleted)
//! ```
//!
//! Commit and reveal fees are escrowed into the auction module account and
//! forfeited at settlement; revealed bid amounts are escrowed and refunded
//! (minus the second price, for the winner). The engine never touches
//! collaborator state directly - coin movement goes through the [`Bank`]
//! trait.

pub mod bank;
pub mod errors;
pub mod events;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod params;
pub mod testkit;
pub mod types;

pub use bank::{Bank, BankError, AUCTION_MODULE_ACCOUNT};
pub use errors::{AuctionError, AuctionResult};
pub use events::AuctionEvent;
pub use keeper::AuctionKeeper;
pub use msgs::{MsgCommitBid, MsgCreateAuction, MsgRevealBid};
pub use params::AuctionParams;
pub use types::{Auction, AuctionStatus, Bid, BidStatus, RevealPayload};
