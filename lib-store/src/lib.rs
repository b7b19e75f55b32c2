//! Name Service Storage Layer
//!
//! This crate defines the storage contract for the name service state
//! machine. All persistence operations MUST go through the [`MultiStore`]
//! trait.
//!
//! # Data Model Invariants
//!
//! 1. **Writes are transactional** - A transaction's writes are buffered and
//!    either all committed or all dropped on rollback. Reads inside a
//!    transaction observe its own buffered writes.
//!
//! 2. **Iteration order is lexicographic** - `iter_prefix` yields keys in
//!    ascending byte order. Time-indexed keys use a sortable encoding, so
//!    prefix iteration doubles as time-range iteration.
//!
//! 3. **Namespaces are disjoint** - Each module owns a namespace; key
//!    prefixes never collide across namespaces.
//!
//! # Design Principles
//!
//! - Keeper code MUST NOT know which database backend is used
//! - Key encoding is protocol - owned by each module's `keys` module
//! - Values are bincode; use the [`codec`] helpers, never ad-hoc formats

pub mod codec;
pub mod context;
pub mod mem_store;
pub mod sled_store;
mod overlay;

use thiserror::Error;

pub use context::Context;
pub use mem_store::MemMultiStore;
pub use sled_store::SledMultiStore;

/// Error from the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("transaction already active")]
    TransactionActive,

    #[error("no active transaction")]
    NoTransaction,
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Namespaced byte-keyed store with buffered-write transactions.
///
/// Point reads and writes, deletes and ascending prefix iteration; nothing
/// backend-specific leaks through this trait.
pub trait MultiStore {
    /// Point read.
    fn get(&self, ns: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Point write. Buffered if a transaction is active.
    fn set(&mut self, ns: &str, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Delete. Buffered if a transaction is active.
    fn delete(&mut self, ns: &str, key: &[u8]) -> StoreResult<()>;

    /// Existence check.
    fn has(&self, ns: &str, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(ns, key)?.is_some())
    }

    /// All pairs whose key starts with `prefix`, ascending by key.
    fn iter_prefix(&self, ns: &str, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Start buffering writes.
    fn begin(&mut self) -> StoreResult<()>;

    /// Apply all buffered writes atomically.
    fn commit(&mut self) -> StoreResult<()>;

    /// Drop all buffered writes.
    fn rollback(&mut self) -> StoreResult<()>;
}
