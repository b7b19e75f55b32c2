//! Canonical Primitive Types for the Name Service
//!
//! Rule: entities that cross a module boundary use these types, never
//! ad-hoc tuples or raw byte vectors.
//!
//! These types are the foundational building blocks for all state-machine
//! data structures. They are designed to be:
//! - Deterministically serializable
//! - Cheap to copy and compare
//! - Stable in their wire form (hex for addresses, seconds for durations)

pub mod canonical;
pub mod coin;
pub mod crypto;
pub mod primitives;
pub mod time;

pub use canonical::{canonical_value_bytes, to_canonical_json};
pub use coin::Coin;
pub use crypto::{CryptoError, PublicKey, Signature, SigningKey, PUBLIC_KEY_SIZE};
pub use primitives::{Address, BlockHeight, ADDRESS_SIZE};
pub use time::{BlockTime, Duration, TimeError, SORTABLE_TIME_LEN};
