//! WRN bindings and resolution.
//!
//! Each WRN maps to at most one [`NameRecord`]; rebinding retires the
//! previous entry into an append-only history. Binding requires an active,
//! bonded authority owned by the signer.

use lib_auction::Bank;
use lib_store::{codec, Context};

use crate::bond::BondKeeper;
use crate::errors::{RegistryError, RegistryResult};
use crate::keys;
use crate::msgs::{MsgDeleteName, MsgSetName};
use crate::types::{AuthorityStatus, NameRecord, Record};
use crate::wrn::Wrn;

use super::authorities::require_authority_owner;
use super::{Keeper, STORE_NAMESPACE};

impl<B: Bank + BondKeeper> Keeper<B> {
    /// Bind a WRN to a record id. Identical rewrites are idempotent; an
    /// empty cid clears the live binding while preserving history.
    pub fn set_name(&mut self, ctx: &mut Context, msg: MsgSetName) -> RegistryResult<()> {
        msg.validate_basic()?;
        let new_id = if msg.cid.is_empty() {
            None
        } else {
            Some(msg.cid)
        };
        self.mutate_name(ctx, &msg.wrn, new_id, &msg.signer)
    }

    /// Clear the live binding of a WRN (soft delete), preserving history.
    pub fn delete_name(&mut self, ctx: &mut Context, msg: MsgDeleteName) -> RegistryResult<()> {
        msg.validate_basic()?;
        self.mutate_name(ctx, &msg.wrn, None, &msg.signer)
    }

    fn mutate_name(
        &mut self,
        ctx: &mut Context,
        wrn_text: &str,
        new_id: Option<String>,
        signer: &lib_types::Address,
    ) -> RegistryResult<()> {
        let wrn: Wrn = wrn_text.parse()?;
        let authority = self
            .get_authority(ctx, &wrn.authority)?
            .ok_or_else(|| RegistryError::NotFound(format!("authority {}", wrn.authority)))?;
        if authority.status != AuthorityStatus::Active {
            return Err(RegistryError::InvalidState(format!(
                "authority {} is not active (status: {})",
                authority.name, authority.status
            )));
        }
        require_authority_owner(&authority, signer)?;
        if authority.bond_id.is_none() {
            return Err(RegistryError::InvalidState(format!(
                "authority {} has no bond",
                authority.name
            )));
        }

        let rendered = wrn.to_string();
        let name_record = match self.get_name_record(ctx, &rendered)? {
            Some(mut existing) => {
                if existing.latest.id == new_id {
                    // Identical rewrite (or repeated clear): no-op.
                    return Ok(());
                }
                if let Some(previous) = &existing.latest.id {
                    ctx.store.delete(
                        STORE_NAMESPACE,
                        &keys::record_name_key(previous, &rendered),
                    )?;
                }
                existing.push(new_id.clone(), ctx.height);
                existing
            }
            None => {
                if new_id.is_none() {
                    return Err(RegistryError::NotFound(format!("name {rendered}")));
                }
                NameRecord::new(new_id.clone(), ctx.height)
            }
        };

        if let Some(id) = &new_id {
            ctx.store
                .set(STORE_NAMESPACE, &keys::record_name_key(id, &rendered), &[])?;
        }
        self.put_name_record(ctx, &rendered, &name_record)?;
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a WRN all the way to its record, or absent.
    pub fn resolve_wrn(&self, ctx: &Context, wrn_text: &str) -> RegistryResult<Option<Record>> {
        let wrn: Wrn = wrn_text.parse()?;
        let Some(name_record) = self.get_name_record(ctx, &wrn.to_string())? else {
            return Ok(None);
        };
        match name_record.latest.id {
            Some(id) => self.get_record(ctx, &id),
            None => Ok(None),
        }
    }

    /// Return the naming history of a WRN without dereferencing.
    pub fn lookup_wrn(&self, ctx: &Context, wrn_text: &str) -> RegistryResult<Option<NameRecord>> {
        let wrn: Wrn = wrn_text.parse()?;
        self.get_name_record(ctx, &wrn.to_string())
    }

    /// All `(wrn, name record)` pairs, ascending by WRN.
    pub fn list_name_records(&self, ctx: &Context) -> RegistryResult<Vec<(String, NameRecord)>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, keys::PREFIX_WRN_TO_NAME_RECORD)?;
        let mut names = Vec::with_capacity(pairs.len());
        for (key, bytes) in pairs {
            let Some(wrn) = keys::parse_suffix(&key, keys::PREFIX_WRN_TO_NAME_RECORD) else {
                continue;
            };
            names.push((wrn, codec::from_bytes(&bytes)?));
        }
        Ok(names)
    }

    /// WRNs currently bound to a record (reverse index).
    pub fn names_of_record(&self, ctx: &Context, record_id: &str) -> RegistryResult<Vec<String>> {
        let prefix = keys::record_names_prefix(record_id);
        let pairs = ctx.store.iter_prefix(STORE_NAMESPACE, &prefix)?;
        Ok(pairs
            .into_iter()
            .filter_map(|(key, _)| keys::parse_suffix(&key, &prefix))
            .collect())
    }
}
