//! Bank collaborator interface.
//!
//! The auction engine escrows fees and bid amounts in a module account.
//! The host chain's bank implements this trait; [`crate::testkit::MemBank`]
//! is the in-memory double.

use thiserror::Error;

use lib_types::{Address, Coin};

/// Module account holding auction escrow.
pub const AUCTION_MODULE_ACCOUNT: &str = "auction";

/// Errors surfaced by the bank collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("insufficient funds: {account} has less than {needed}")]
    InsufficientFunds { account: String, needed: Coin },

    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

/// Coin movement between user accounts and module accounts.
pub trait Bank {
    /// Move coins from a user account into a module account.
    fn send_to_module(&mut self, from: &Address, module: &str, amount: &Coin)
        -> Result<(), BankError>;

    /// Move coins from a module account back to a user account.
    fn send_from_module(
        &mut self,
        module: &str,
        to: &Address,
        amount: &Coin,
    ) -> Result<(), BankError>;

    /// Current balance of a module account.
    fn module_balance(&self, module: &str, denom: &str) -> Coin;
}
