//! Genesis state import and export.

use serde::{Deserialize, Serialize};
use tracing::info;

use lib_auction::Bank;
use lib_store::Context;

use crate::bond::BondKeeper;
use crate::errors::RegistryResult;
use crate::keeper::Keeper;
use crate::params::Params;
use crate::types::{NameAuthority, NameRecord, Record};

/// Everything needed to (re)start the module at a height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenesisState {
    pub params: Params,
    pub records: Vec<Record>,
    pub authorities: Vec<NameAuthority>,
    pub names: Vec<(String, NameRecord)>,
}

impl<B: Bank + BondKeeper> Keeper<B> {
    /// Write genesis state, rebuilding every derived index and queue.
    pub fn init_genesis(&mut self, ctx: &mut Context, state: GenesisState) -> RegistryResult<()> {
        self.set_params(ctx, &state.params)?;

        for record in &state.records {
            self.put_record(ctx, record)?;
            if !record.deleted {
                if let Some(bond_id) = &record.bond_id {
                    ctx.store.set(
                        crate::keeper::STORE_NAMESPACE,
                        &crate::keys::bond_record_key(bond_id, &record.id),
                        &[],
                    )?;
                }
                self.record_expiry_insert(ctx, record.expiry_time, &record.id)?;
            }
        }

        for authority in &state.authorities {
            self.put_authority(ctx, authority)?;
            if let Some(bond_id) = &authority.bond_id {
                ctx.store.set(
                    crate::keeper::STORE_NAMESPACE,
                    &crate::keys::bond_authority_key(bond_id, &authority.name),
                    &[],
                )?;
            }
            if let Some(auction_id) = &authority.auction_id {
                ctx.store.set(
                    crate::keeper::STORE_NAMESPACE,
                    &crate::keys::auction_authority_key(auction_id),
                    authority.name.as_bytes(),
                )?;
            }
            self.authority_expiry_insert(ctx, authority.expiry_time, &authority.name)?;
        }

        for (wrn, name_record) in &state.names {
            self.put_name_record(ctx, wrn, name_record)?;
            if let Some(id) = &name_record.latest.id {
                ctx.store.set(
                    crate::keeper::STORE_NAMESPACE,
                    &crate::keys::record_name_key(id, wrn),
                    &[],
                )?;
            }
        }

        info!(
            records = state.records.len(),
            authorities = state.authorities.len(),
            names = state.names.len(),
            "name service genesis initialized"
        );
        Ok(())
    }

    /// Snapshot the module state for export.
    pub fn export_genesis(&self, ctx: &Context) -> RegistryResult<GenesisState> {
        Ok(GenesisState {
            params: self.params(ctx)?,
            records: self.list_records(ctx)?,
            authorities: self.list_authorities(ctx)?,
            names: self.list_name_records(ctx)?,
        })
    }
}
