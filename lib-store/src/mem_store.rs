//! In-memory MultiStore.
//!
//! The reference backend: deterministic, dependency-free, used by every
//! keeper test. Namespaces are plain BTreeMaps so iteration order is the
//! byte order of keys.

use std::collections::BTreeMap;

use crate::overlay::{merge_prefix, overlay_get, Overlay};
use crate::{MultiStore, StoreError, StoreResult};

/// BTreeMap-backed implementation of [`MultiStore`].
#[derive(Debug, Default)]
pub struct MemMultiStore {
    trees: BTreeMap<String, BTreeMap<Vec<u8>, Vec<u8>>>,
    pending: Option<Overlay>,
}

impl MemMultiStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MultiStore for MemMultiStore {
    fn get(&self, ns: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        if let Some(pending) = &self.pending {
            if let Some(entry) = overlay_get(pending, ns, key) {
                return Ok(entry.clone());
            }
        }
        Ok(self.trees.get(ns).and_then(|tree| tree.get(key)).cloned())
    }

    fn set(&mut self, ns: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        match &mut self.pending {
            Some(pending) => {
                pending
                    .entry(ns.to_string())
                    .or_default()
                    .insert(key.to_vec(), Some(value.to_vec()));
            }
            None => {
                self.trees
                    .entry(ns.to_string())
                    .or_default()
                    .insert(key.to_vec(), value.to_vec());
            }
        }
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &[u8]) -> StoreResult<()> {
        match &mut self.pending {
            Some(pending) => {
                pending
                    .entry(ns.to_string())
                    .or_default()
                    .insert(key.to_vec(), None);
            }
            None => {
                if let Some(tree) = self.trees.get_mut(ns) {
                    tree.remove(key);
                }
            }
        }
        Ok(())
    }

    fn iter_prefix(&self, ns: &str, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let base = match self.trees.get(ns) {
            Some(tree) => tree
                .range(prefix.to_vec()..)
                .take_while(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            None => Vec::new(),
        };
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
        for (ns, tree) in pending {
            let target = self.trees.entry(ns).or_default();
            for (key, entry) in tree {
                match entry {
                    Some(value) => {
                        target.insert(key, value);
                    }
                    None => {
                        target.remove(&key);
                    }
                }
            }
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
