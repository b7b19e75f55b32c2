//! Auction module parameters.

use serde::{Deserialize, Serialize};

use lib_types::{Coin, Duration};

/// Default fee/bid denomination used by the default parameter set.
pub const DEFAULT_DENOM: &str = "uwire";

/// Governance-set auction parameters.
///
/// Passed explicitly into every keeper call; the engine holds no hidden
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionParams {
    /// Length of the commit window.
    pub commits_duration: Duration,
    /// Length of the reveal window.
    pub reveals_duration: Duration,
    /// Fee escrowed with each commit; forfeited at settlement.
    pub commit_fee: Coin,
    /// Fee escrowed with each reveal; forfeited at settlement.
    pub reveal_fee: Coin,
    /// Smallest bid that can win.
    pub minimum_bid: Coin,
    /// How long settled auctions are retained before deletion.
    pub completed_auction_delete_duration: Duration,
}

impl Default for AuctionParams {
    fn default() -> Self {
        Self {
            commits_duration: Duration::from_secs(24 * 60 * 60),
            reveals_duration: Duration::from_secs(24 * 60 * 60),
            commit_fee: Coin::new(DEFAULT_DENOM, 1_000_000),
            reveal_fee: Coin::new(DEFAULT_DENOM, 1_000_000),
            minimum_bid: Coin::new(DEFAULT_DENOM, 5_000_000),
            completed_auction_delete_duration: Duration::from_secs(24 * 60 * 60),
        }
    }
}
