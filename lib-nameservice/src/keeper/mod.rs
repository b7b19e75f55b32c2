//! Name Service Keeper
//!
//! The only code allowed to mutate the `nameservice` namespace. The keeper
//! owns the bank/bond collaborator and the embedded auction keeper; message
//! entry points live in the submodules:
//!
//! - [`records`]: content-addressed record registry
//! - [`authorities`]: authority lifecycle and auction settlement
//! - [`names`]: WRN bindings and resolution
//! - [`expiry`]: both expiry queues and the end-of-block sweep

pub mod authorities;
pub mod expiry;
pub mod names;
pub mod records;

use lib_auction::{AuctionKeeper, Bank};
use lib_store::{codec, Context};

use crate::bond::BondKeeper;
use crate::errors::RegistryResult;
use crate::keys;
use crate::params::Params;
use crate::types::{BlockChangeSet, NameAuthority, NameRecord, Record};

/// Store namespace owned by this module.
pub const STORE_NAMESPACE: &str = "nameservice";

/// Store namespace holding governance parameters.
pub const PARAMS_NAMESPACE: &str = "params";

/// Key of this module's parameter blob inside [`PARAMS_NAMESPACE`].
pub const PARAMS_KEY: &[u8] = b"nameservice";

/// Keeper for the name service module.
///
/// `B` is the host's bank, which must expose both coin transfers (for the
/// auction engine) and bond debits (for rent).
#[derive(Debug)]
pub struct Keeper<B> {
    pub(crate) bank: B,
    pub(crate) auction: AuctionKeeper,
}

impl<B: Bank + BondKeeper> Keeper<B> {
    pub fn new(bank: B) -> Self {
        Self {
            bank,
            auction: AuctionKeeper::new(),
        }
    }

    /// The embedded auction keeper (read-only access for queries).
    pub fn auction(&self) -> &AuctionKeeper {
        &self.auction
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Mutable bank access for host wiring and test setup.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Current module parameters. Falls back to defaults when genesis has
    /// not written them, so sweeps stay infallible.
    pub fn params(&self, ctx: &Context) -> RegistryResult<Params> {
        match ctx.store.get(PARAMS_NAMESPACE, PARAMS_KEY)? {
            Some(bytes) => Ok(codec::from_bytes(&bytes)?),
            None => Ok(Params::default()),
        }
    }

    /// Write parameters (genesis / governance pathway only).
    pub fn set_params(&self, ctx: &mut Context, params: &Params) -> RegistryResult<()> {
        let bytes = codec::to_bytes(params)?;
        ctx.store.set(PARAMS_NAMESPACE, PARAMS_KEY, &bytes)?;
        Ok(())
    }

    // =========================================================================
    // Primary index plumbing
    // =========================================================================

    pub(crate) fn put_record(&self, ctx: &mut Context, record: &Record) -> RegistryResult<()> {
        let bytes = codec::to_bytes(record)?;
        ctx.store
            .set(STORE_NAMESPACE, &keys::record_key(&record.id), &bytes)?;
        self.changeset(ctx, |cs| cs.records.push(record.id.clone()))
    }

    /// Raw record lookup, tombstones included. Public reads go through
    /// [`Self::get_record`].
    pub(crate) fn get_record_raw(
        &self,
        ctx: &Context,
        id: &str,
    ) -> RegistryResult<Option<Record>> {
        match ctx.store.get(STORE_NAMESPACE, &keys::record_key(id))? {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Record lookup as the public surface sees it: tombstoned records are
    /// absent.
    pub fn get_record(&self, ctx: &Context, id: &str) -> RegistryResult<Option<Record>> {
        Ok(self.get_record_raw(ctx, id)?.filter(|r| !r.deleted))
    }

    pub(crate) fn put_authority(
        &self,
        ctx: &mut Context,
        authority: &NameAuthority,
    ) -> RegistryResult<()> {
        let bytes = codec::to_bytes(authority)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::authority_key(&authority.name),
            &bytes,
        )?;
        self.changeset(ctx, |cs| cs.authorities.push(authority.name.clone()))
    }

    pub fn get_authority(
        &self,
        ctx: &Context,
        name: &str,
    ) -> RegistryResult<Option<NameAuthority>> {
        match ctx.store.get(STORE_NAMESPACE, &keys::authority_key(name))? {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn put_name_record(
        &self,
        ctx: &mut Context,
        wrn: &str,
        record: &NameRecord,
    ) -> RegistryResult<()> {
        let bytes = codec::to_bytes(record)?;
        ctx.store
            .set(STORE_NAMESPACE, &keys::name_record_key(wrn), &bytes)?;
        self.changeset(ctx, |cs| cs.names.push(wrn.to_string()))
    }

    pub fn get_name_record(&self, ctx: &Context, wrn: &str) -> RegistryResult<Option<NameRecord>> {
        match ctx.store.get(STORE_NAMESPACE, &keys::name_record_key(wrn))? {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Block changesets
    // =========================================================================

    /// Append to the current block's changeset.
    pub(crate) fn changeset(
        &self,
        ctx: &mut Context,
        apply: impl FnOnce(&mut BlockChangeSet),
    ) -> RegistryResult<()> {
        let key = keys::changeset_key(ctx.height);
        let mut changeset = match ctx.store.get(STORE_NAMESPACE, &key)? {
            Some(bytes) => codec::from_bytes(&bytes)?,
            None => BlockChangeSet::new(ctx.height),
        };
        apply(&mut changeset);
        let bytes = codec::to_bytes(&changeset)?;
        ctx.store.set(STORE_NAMESPACE, &key, &bytes)?;
        Ok(())
    }

    /// The changeset recorded at a height, if any.
    pub fn block_changeset(
        &self,
        ctx: &Context,
        height: u64,
    ) -> RegistryResult<Option<BlockChangeSet>> {
        match ctx.store.get(STORE_NAMESPACE, &keys::changeset_key(height))? {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }
}
