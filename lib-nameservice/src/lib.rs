//! Name Service Core
//!
//! A decentralized name service layered over a deterministic block state
//! machine:
//!
//! - a content-addressed **record registry** whose entries are immutable
//!   objects identified by the digest of their canonical attributes;
//! - a hierarchical **name authority** registry mapping `wrn://` paths onto
//!   record ids, with auction-backed acquisition of contested names;
//! - two time-ordered **expiry queues** driving end-of-block maintenance;
//! - a bond-coupled **rent economy** binding records and authorities to a
//!   funding source.
//!
//! The host chain supplies the block clock, the transactional store and the
//! bank/bond collaborators; this crate owns everything else. All state
//! access goes through [`lib_store::MultiStore`]; all coin movement goes
//! through the [`bond::BondKeeper`] and [`lib_auction::Bank`] traits.

pub mod attributes;
pub mod bond;
pub mod content;
pub mod errors;
pub mod events;
pub mod genesis;
pub mod handler;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod params;
pub mod payload;
pub mod query;
pub mod testkit;
pub mod types;
pub mod wrn;

pub use attributes::{Attributes, AttributeValue};
pub use bond::{BondError, BondKeeper, AUTHORITY_RENT_MODULE_ACCOUNT, RECORD_RENT_MODULE_ACCOUNT};
pub use errors::{RegistryError, RegistryResult};
pub use events::Event;
pub use genesis::GenesisState;
pub use handler::{Msg, MsgResponse};
pub use keeper::Keeper;
pub use params::Params;
pub use payload::{Payload, PayloadSignature};
pub use types::{
    AuthorityStatus, BlockChangeSet, NameAuthority, NameRecord, NameRecordEntry, Record,
};
pub use wrn::Wrn;
