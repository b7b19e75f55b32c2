//! Sled-based MultiStore implementation.
//!
//! Namespaces map to sled trees. Do not rely on sled-specific features
//! beyond basic KV + batches; the keepers only see the [`MultiStore`]
//! trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use sled::{Batch, Db, Tree};

use crate::overlay::{merge_prefix, overlay_get, Overlay};
use crate::{MultiStore, StoreError, StoreResult};

/// Sled-backed implementation of [`MultiStore`].
///
/// Writes inside a transaction are buffered in an overlay and applied
/// through per-tree batches on commit.
pub struct SledMultiStore {
    db: Db,
    trees: Mutex<HashMap<String, Tree>>,
    pending: Option<Overlay>,
}

impl std::fmt::Debug for SledMultiStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledMultiStore")
            .field("tx_active", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl SledMultiStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(Self {
            db,
            trees: Mutex::new(HashMap::new()),
            pending: None,
        })
    }

    fn tree(&self, ns: &str) -> StoreResult<Tree> {
        let mut trees = self
            .trees
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if let Some(tree) = trees.get(ns) {
            return Ok(tree.clone());
        }
        let tree = self
            .db
            .open_tree(ns)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        trees.insert(ns.to_string(), tree.clone());
        Ok(tree)
    }
}

impl MultiStore for SledMultiStore {
    fn get(&self, ns: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        if let Some(pending) = &self.pending {
            if let Some(entry) = overlay_get(pending, ns, key) {
                return Ok(entry.clone());
            }
        }
        let value = self
            .tree(ns)?
            .get(key)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn set(&mut self, ns: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        match &mut self.pending {
            Some(pending) => {
                pending
                    .entry(ns.to_string())
                    .or_default()
                    .insert(key.to_vec(), Some(value.to_vec()));
                Ok(())
            }
            None => {
                self.tree(ns)?
                    .insert(key, value)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, ns: &str, key: &[u8]) -> StoreResult<()> {
        match &mut self.pending {
            Some(pending) => {
                pending
                    .entry(ns.to_string())
                    .or_default()
                    .insert(key.to_vec(), None);
                Ok(())
            }
            None => {
                self.tree(ns)?
                    .remove(key)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn iter_prefix(&self, ns: &str, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut base = Vec::new();
        for pair in self.tree(ns)?.scan_prefix(prefix) {
            let (key, value) = pair.map_err(|e| StoreError::Database(e.to_string()))?;
            base.push((key.to_vec(), value.to_vec()));
        }
        match &self.pending {
            Some(pending) => Ok(merge_prefix(base, pending, ns, prefix)),
            None => Ok(base),
        }
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.pending.is_some() {
            return Err(StoreError::TransactionActive);
        }
        self.pending = Some(Overlay::new());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        let pending = self.pending.take().ok_or(StoreError::NoTransaction)?;
        for (ns, entries) in pending {
            let tree = self.tree(&ns)?;
            let mut batch = Batch::default();
            for (key, entry) in entries {
                match entry {
                    Some(value) => batch.insert(key, value),
                    None => batch.remove(key),
                }
            }
            tree.apply_batch(batch)
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if self.pending.take().is_none() {
            return Err(StoreError::NoTransaction);
        }
        Ok(())
    }
}
