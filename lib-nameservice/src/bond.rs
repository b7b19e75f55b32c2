//! Bond collaborator interface.
//!
//! Bonds are escrowed balances owned by the bond module, out of scope
//! here. The registry only needs to know who owns a bond and how to debit
//! it for rent; [`crate::testkit::TestBank`] is the in-memory double.

use thiserror::Error;

use lib_types::{Address, Coin};

/// Module account collecting record rent.
pub const RECORD_RENT_MODULE_ACCOUNT: &str = "record_rent";

/// Module account collecting authority rent.
pub const AUTHORITY_RENT_MODULE_ACCOUNT: &str = "authority_rent";

/// Errors surfaced by the bond collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BondError {
    #[error("bond not found: {0}")]
    NotFound(String),

    #[error("bond {bond_id} cannot cover {needed}")]
    InsufficientFunds { bond_id: String, needed: Coin },
}

/// The slice of the bond module the registry consumes.
pub trait BondKeeper {
    /// Owner of a bond, if the bond exists.
    fn bond_owner(&self, bond_id: &str) -> Option<Address>;

    /// Debit a bond into a module account (rent collection).
    fn transfer_to_module(
        &mut self,
        bond_id: &str,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BondError>;
}
