//! Name Service Event Types
//!
//! Typed events emitted for successful state-changing messages and sweep
//! transitions. Attributes carry enough to reconstruct the change: event
//! type, entity id, relevant amounts and the signer.

use serde::{Deserialize, Serialize};
use std::fmt;

use lib_auction::AuctionEvent;
use lib_types::Address;

/// Events emitted by the name service module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Record created.
    SetRecord {
        record_id: String,
        bond_id: String,
        signer: Address,
    },

    RenewRecord {
        record_id: String,
        signer: Address,
    },

    AssociateBond {
        record_id: String,
        bond_id: String,
        signer: Address,
    },

    DissociateBond {
        record_id: String,
        signer: Address,
    },

    DissociateRecords {
        bond_id: String,
        signer: Address,
    },

    ReAssociateRecords {
        old_bond_id: String,
        new_bond_id: String,
        signer: Address,
    },

    ReserveAuthority {
        name: String,
        /// Present when the reservation opened an auction.
        auction_id: Option<String>,
        signer: Address,
    },

    SetAuthorityBond {
        name: String,
        bond_id: String,
        signer: Address,
    },

    SetName {
        wrn: String,
        record_id: String,
        signer: Address,
    },

    DeleteName {
        wrn: String,
        signer: Address,
    },

    /// Record tombstoned by the expiry sweep.
    RecordExpired { record_id: String },

    /// Authority transitioned to expired by the sweep.
    AuthorityExpired { name: String },

    /// Expired authority removed after its grace period.
    AuthorityDeleted { name: String },

    /// Auction-backed authority resolved at settlement.
    AuthoritySettled {
        name: String,
        winner: Option<Address>,
    },

    /// Event from the embedded auction engine.
    Auction(AuctionEvent),
}

impl From<AuctionEvent> for Event {
    fn from(event: AuctionEvent) -> Self {
        Event::Auction(event)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SetRecord { record_id, .. } => write!(f, "SetRecord({record_id})"),
            Event::RenewRecord { record_id, .. } => write!(f, "RenewRecord({record_id})"),
            Event::AssociateBond { record_id, .. } => write!(f, "AssociateBond({record_id})"),
            Event::DissociateBond { record_id, .. } => write!(f, "DissociateBond({record_id})"),
            Event::DissociateRecords { bond_id, .. } => {
                write!(f, "DissociateRecords({bond_id})")
            }
            Event::ReAssociateRecords {
                old_bond_id,
                new_bond_id,
                ..
            } => write!(f, "ReAssociateRecords({old_bond_id}->{new_bond_id})"),
            Event::ReserveAuthority { name, .. } => write!(f, "ReserveAuthority({name})"),
            Event::SetAuthorityBond { name, .. } => write!(f, "SetAuthorityBond({name})"),
            Event::SetName { wrn, .. } => write!(f, "SetName({wrn})"),
            Event::DeleteName { wrn, .. } => write!(f, "DeleteName({wrn})"),
            Event::RecordExpired { record_id } => write!(f, "RecordExpired({record_id})"),
            Event::AuthorityExpired { name } => write!(f, "AuthorityExpired({name})"),
            Event::AuthorityDeleted { name } => write!(f, "AuthorityDeleted({name})"),
            Event::AuthoritySettled { name, .. } => write!(f, "AuthoritySettled({name})"),
            Event::Auction(event) => write!(f, "{event}"),
        }
    }
}
