//! Record registry operations.
//!
//! Records are immutable after creation; the only later mutations are the
//! bond linkage and the tombstone set by the expiry sweep. `SetRecord` of
//! an already-present id is a no-op success (content-addressed
//! idempotence).

use tracing::debug;

use lib_auction::Bank;
use lib_store::{codec, Context};

use crate::bond::{BondKeeper, RECORD_RENT_MODULE_ACCOUNT};
use crate::errors::{RegistryError, RegistryResult};
use crate::keys;
use crate::msgs::{
    MsgAssociateBond, MsgDissociateBond, MsgDissociateRecords, MsgReAssociateRecords,
    MsgRenewRecord, MsgSetRecord,
};
use crate::types::Record;

use super::{Keeper, STORE_NAMESPACE};

impl<B: Bank + BondKeeper> Keeper<B> {
    /// Publish a signed record.
    ///
    /// Verifies every payload signature, derives the content id, charges
    /// one period of rent from the bond, and indexes the record. If the id
    /// already names a live record the call succeeds without touching
    /// state; a tombstoned id may be re-submitted.
    pub fn set_record(&mut self, ctx: &mut Context, msg: MsgSetRecord) -> RegistryResult<Record> {
        msg.validate_basic()?;

        let id = msg.payload.record_id()?;
        if let Some(existing) = self.get_record(ctx, &id)? {
            return Ok(existing);
        }
        let owners = msg.payload.verify_owners()?;

        let params = self.params(ctx)?;
        self.bank
            .transfer_to_module(&msg.bond_id, RECORD_RENT_MODULE_ACCOUNT, &params.record_rent)?;

        let expiry_time = ctx
            .time
            .checked_add(params.record_rent_duration)
            .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
        let record = Record {
            id: id.clone(),
            bond_id: Some(msg.bond_id.clone()),
            create_time: ctx.time,
            expiry_time,
            attributes: msg.payload.record,
            owners,
            deleted: false,
        };

        self.put_record(ctx, &record)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::bond_record_key(&msg.bond_id, &id),
            &[],
        )?;
        self.record_expiry_insert(ctx, record.expiry_time, &id)?;
        debug!(record_id = %id, "record created");
        Ok(record)
    }

    /// Re-charge rent and push the expiry forward one rent duration.
    ///
    /// Renewal never changes owners, attributes or the bond linkage.
    pub fn renew_record(&mut self, ctx: &mut Context, msg: MsgRenewRecord) -> RegistryResult<Record> {
        msg.validate_basic()?;

        let mut record = self
            .get_record(ctx, &msg.record_id)?
            .ok_or_else(|| RegistryError::NotFound(msg.record_id.clone()))?;
        let bond_id = record.bond_id.clone().ok_or_else(|| {
            RegistryError::InvalidState(format!("record {} has no bond", record.id))
        })?;

        let params = self.params(ctx)?;
        self.bank
            .transfer_to_module(&bond_id, RECORD_RENT_MODULE_ACCOUNT, &params.record_rent)?;

        self.record_expiry_remove(ctx, record.expiry_time, &record.id)?;
        record.expiry_time = ctx
            .time
            .checked_add(params.record_rent_duration)
            .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
        self.record_expiry_insert(ctx, record.expiry_time, &record.id)?;
        self.put_record(ctx, &record)?;
        Ok(record)
    }

    /// Attach a bond to a record that has none.
    pub fn associate_bond(&mut self, ctx: &mut Context, msg: MsgAssociateBond) -> RegistryResult<()> {
        msg.validate_basic()?;

        let mut record = self
            .get_record(ctx, &msg.record_id)?
            .ok_or_else(|| RegistryError::NotFound(msg.record_id.clone()))?;
        if record.bond_id.is_some() {
            return Err(RegistryError::InvalidRequest(format!(
                "record {} already has a bond",
                record.id
            )));
        }
        if !record.is_owner(&msg.signer) {
            return Err(RegistryError::Unauthorized(
                "signer is not a record owner".into(),
            ));
        }
        self.require_bond_owner(&msg.bond_id, &msg.signer)?;

        record.bond_id = Some(msg.bond_id.clone());
        self.put_record(ctx, &record)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::bond_record_key(&msg.bond_id, &record.id),
            &[],
        )?;
        Ok(())
    }

    /// Clear a record's bond. Bond-less records cannot be renewed.
    pub fn dissociate_bond(
        &mut self,
        ctx: &mut Context,
        msg: MsgDissociateBond,
    ) -> RegistryResult<()> {
        msg.validate_basic()?;

        let mut record = self
            .get_record(ctx, &msg.record_id)?
            .ok_or_else(|| RegistryError::NotFound(msg.record_id.clone()))?;
        if !record.is_owner(&msg.signer) {
            return Err(RegistryError::Unauthorized(
                "signer is not a record owner".into(),
            ));
        }
        let bond_id = record.bond_id.take().ok_or_else(|| {
            RegistryError::InvalidRequest(format!("record {} has no bond", record.id))
        })?;

        self.put_record(ctx, &record)?;
        ctx.store.delete(
            STORE_NAMESPACE,
            &keys::bond_record_key(&bond_id, &record.id),
        )?;
        Ok(())
    }

    /// Clear the bond of every record funded by `bond_id`.
    pub fn dissociate_records(
        &mut self,
        ctx: &mut Context,
        msg: MsgDissociateRecords,
    ) -> RegistryResult<()> {
        msg.validate_basic()?;
        self.require_bond_owner(&msg.bond_id, &msg.signer)?;

        for id in self.record_ids_by_bond(ctx, &msg.bond_id)? {
            if let Some(mut record) = self.get_record_raw(ctx, &id)? {
                record.bond_id = None;
                self.put_record(ctx, &record)?;
            }
            ctx.store
                .delete(STORE_NAMESPACE, &keys::bond_record_key(&msg.bond_id, &id))?;
        }
        Ok(())
    }

    /// Move every record from one bond to another in a single transaction.
    pub fn reassociate_records(
        &mut self,
        ctx: &mut Context,
        msg: MsgReAssociateRecords,
    ) -> RegistryResult<()> {
        msg.validate_basic()?;
        self.require_bond_owner(&msg.old_bond_id, &msg.signer)?;
        self.require_bond_owner(&msg.new_bond_id, &msg.signer)?;

        for id in self.record_ids_by_bond(ctx, &msg.old_bond_id)? {
            if let Some(mut record) = self.get_record_raw(ctx, &id)? {
                record.bond_id = Some(msg.new_bond_id.clone());
                self.put_record(ctx, &record)?;
            }
            ctx.store.delete(
                STORE_NAMESPACE,
                &keys::bond_record_key(&msg.old_bond_id, &id),
            )?;
            ctx.store.set(
                STORE_NAMESPACE,
                &keys::bond_record_key(&msg.new_bond_id, &id),
                &[],
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All live records, ascending by id.
    pub fn list_records(&self, ctx: &Context) -> RegistryResult<Vec<Record>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, keys::PREFIX_ID_TO_RECORD)?;
        let mut records = Vec::new();
        for (_, bytes) in pairs {
            let record: Record = codec::from_bytes(&bytes)?;
            if !record.deleted {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Live records funded by a bond.
    pub fn records_by_bond(&self, ctx: &Context, bond_id: &str) -> RegistryResult<Vec<Record>> {
        let mut records = Vec::new();
        for id in self.record_ids_by_bond(ctx, bond_id)? {
            if let Some(record) = self.get_record(ctx, &id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Batch point lookup; absent and tombstoned ids are skipped. Used by
    /// the read path to resolve link-valued attributes.
    pub fn records_by_ids(&self, ctx: &Context, ids: &[String]) -> RegistryResult<Vec<Record>> {
        let mut records = Vec::new();
        for id in ids {
            if let Some(record) = self.get_record(ctx, id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub(crate) fn record_ids_by_bond(
        &self,
        ctx: &Context,
        bond_id: &str,
    ) -> RegistryResult<Vec<String>> {
        let prefix = keys::bond_records_prefix(bond_id);
        let pairs = ctx.store.iter_prefix(STORE_NAMESPACE, &prefix)?;
        Ok(pairs
            .into_iter()
            .filter_map(|(key, _)| keys::parse_suffix(&key, &prefix))
            .collect())
    }

    /// Signer must own the referenced bond.
    pub(crate) fn require_bond_owner(
        &self,
        bond_id: &str,
        signer: &lib_types::Address,
    ) -> RegistryResult<()> {
        let owner = self
            .bank
            .bond_owner(bond_id)
            .ok_or_else(|| RegistryError::NotFound(format!("bond {bond_id}")))?;
        if owner != *signer {
            return Err(RegistryError::Unauthorized(
                "signer does not own the bond".into(),
            ));
        }
        Ok(())
    }
}
