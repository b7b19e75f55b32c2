//! Name service state model.

use serde::{Deserialize, Serialize};
use std::fmt;

use lib_types::{Address, BlockHeight, BlockTime};

use crate::attributes::Attributes;

/// A content-addressed immutable record.
///
/// Records are never mutated after creation except for the tombstone flag;
/// every public read treats `deleted == true` as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Content id of `attributes` (see [`crate::content`]).
    pub id: String,
    /// Bond paying this record's rent; `None` once dissociated.
    pub bond_id: Option<String>,
    pub create_time: BlockTime,
    pub expiry_time: BlockTime,
    pub attributes: Attributes,
    /// Sorted, deduplicated addresses of the payload signers.
    pub owners: Vec<Address>,
    pub deleted: bool,
}

impl Record {
    /// Whether `address` may act on this record.
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.binary_search(address).is_ok()
    }
}

/// Lifecycle state of a name authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityStatus {
    /// Owned; may bind names.
    Active,
    /// Ownership is being arbitrated by an auction.
    Auction,
    /// Grace period before deletion; owner cleared.
    Expired,
}

impl fmt::Display for AuthorityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthorityStatus::Active => "active",
            AuthorityStatus::Auction => "auction",
            AuthorityStatus::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Owner of a top-level name; gates who may publish under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAuthority {
    pub name: String,
    /// Unset while under auction and after expiry.
    pub owner_address: Option<Address>,
    pub owner_public_key: Option<String>,
    pub status: AuthorityStatus,
    /// Block height of creation.
    pub height: BlockHeight,
    /// Bond paying rent; must be set before names can be bound.
    pub bond_id: Option<String>,
    pub expiry_time: BlockTime,
    /// Present iff the authority was created under auction.
    pub auction_id: Option<String>,
}

/// One binding of a WRN to a record id at a height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecordEntry {
    /// `None` marks a cleared (soft-deleted) binding.
    pub id: Option<String>,
    pub height: BlockHeight,
}

/// The full naming history of one WRN. `history` is append-only with
/// non-decreasing heights; `latest` is the live binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub latest: NameRecordEntry,
    pub history: Vec<NameRecordEntry>,
}

impl NameRecord {
    pub fn new(id: Option<String>, height: BlockHeight) -> Self {
        Self {
            latest: NameRecordEntry { id, height },
            history: Vec::new(),
        }
    }

    /// Retire the current binding into history and install a new latest.
    pub fn push(&mut self, id: Option<String>, height: BlockHeight) {
        let previous = std::mem::replace(&mut self.latest, NameRecordEntry { id, height });
        self.history.push(previous);
    }
}

/// Entities touched at one block height; stored under the changeset index
/// for downstream indexers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockChangeSet {
    pub height: BlockHeight,
    pub records: Vec<String>,
    pub auctions: Vec<String>,
    pub authorities: Vec<String>,
    pub names: Vec<String>,
}

impl BlockChangeSet {
    pub fn new(height: BlockHeight) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            && self.auctions.is_empty()
            && self.authorities.is_empty()
            && self.names.is_empty()
    }
}
