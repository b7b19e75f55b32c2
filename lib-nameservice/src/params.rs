//! Name service module parameters.
//!
//! Held in the `params` namespace of the store, initialized at genesis and
//! mutable only through the host's governance pathway. Keepers read them at
//! the start of each transaction and pass them explicitly; nothing reads
//! them through hidden context.

use serde::{Deserialize, Serialize};

use lib_auction::AuctionParams;
use lib_types::{Coin, Duration};

/// Denomination used by the default parameter set.
pub const DEFAULT_DENOM: &str = "uwire";

/// Governance-set name service parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Rent charged per record lifetime.
    pub record_rent: Coin,
    /// Lifetime bought by one rent payment.
    pub record_rent_duration: Duration,

    /// Rent charged per authority lifetime.
    pub authority_rent: Coin,
    /// Lifetime bought by one authority rent payment.
    pub authority_rent_duration: Duration,
    /// How long an expired authority lingers before deletion.
    pub authority_grace_period: Duration,

    /// Whether short names are auctioned instead of registered directly.
    pub authority_auction_enabled: bool,
    /// Names shorter than this go to auction.
    pub authority_auction_threshold_length: usize,

    /// Settings for authority auctions.
    pub auction: AuctionParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            record_rent: Coin::new(DEFAULT_DENOM, 1_000_000),
            record_rent_duration: Duration::from_secs(365 * 24 * 60 * 60),
            authority_rent: Coin::new(DEFAULT_DENOM, 10_000_000),
            authority_rent_duration: Duration::from_secs(365 * 24 * 60 * 60),
            authority_grace_period: Duration::from_secs(2 * 24 * 60 * 60),
            authority_auction_enabled: false,
            authority_auction_threshold_length: 4,
            auction: AuctionParams::default(),
        }
    }
}
