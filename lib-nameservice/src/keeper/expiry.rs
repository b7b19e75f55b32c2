//! Expiry queues and the end-of-block sweep.
//!
//! Two structurally identical queues: expiry time -> record ids and expiry
//! time -> authority names. Bucket keys use the sortable time encoding, so
//! ascending prefix iteration visits buckets chronologically; ids within a
//! bucket keep insertion order.
//!
//! # Sweep order (fixed by the host)
//!
//! 1. Record expiry: tombstone, no auto-renewal.
//! 2. Authority expiry: `active -> expired` with a grace period, then
//!    deletion.
//! 3. Auction phase transitions and settlement, including authorities
//!    linked to settled auctions.
//!
//! Sweeps must not fail a block: per-entry errors are logged and skipped.

use tracing::{debug, warn};

use lib_auction::{AuctionEvent, Bank};
use lib_store::{codec, Context};
use lib_types::BlockTime;

use crate::bond::BondKeeper;
use crate::errors::RegistryResult;
use crate::events::Event;
use crate::keys;
use crate::types::AuthorityStatus;

use super::{Keeper, STORE_NAMESPACE};

impl<B: Bank + BondKeeper> Keeper<B> {
    // =========================================================================
    // Queue plumbing
    // =========================================================================

    fn queue_slice(&self, ctx: &Context, key: &[u8]) -> RegistryResult<Vec<String>> {
        match ctx.store.get(STORE_NAMESPACE, key)? {
            Some(bytes) => Ok(codec::from_bytes(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn queue_insert(&self, ctx: &mut Context, key: Vec<u8>, id: &str) -> RegistryResult<()> {
        let mut slice = self.queue_slice(ctx, &key)?;
        slice.push(id.to_string());
        let bytes = codec::to_bytes(&slice)?;
        ctx.store.set(STORE_NAMESPACE, &key, &bytes)?;
        Ok(())
    }

    fn queue_remove(&self, ctx: &mut Context, key: Vec<u8>, id: &str) -> RegistryResult<()> {
        let mut slice = self.queue_slice(ctx, &key)?;
        slice.retain(|entry| entry != id);
        if slice.is_empty() {
            ctx.store.delete(STORE_NAMESPACE, &key)?;
        } else {
            let bytes = codec::to_bytes(&slice)?;
            ctx.store.set(STORE_NAMESPACE, &key, &bytes)?;
        }
        Ok(())
    }

    pub(crate) fn record_expiry_insert(
        &self,
        ctx: &mut Context,
        time: BlockTime,
        id: &str,
    ) -> RegistryResult<()> {
        self.queue_insert(ctx, keys::record_expiry_key(time), id)
    }

    pub(crate) fn record_expiry_remove(
        &self,
        ctx: &mut Context,
        time: BlockTime,
        id: &str,
    ) -> RegistryResult<()> {
        self.queue_remove(ctx, keys::record_expiry_key(time), id)
    }

    pub(crate) fn authority_expiry_insert(
        &self,
        ctx: &mut Context,
        time: BlockTime,
        name: &str,
    ) -> RegistryResult<()> {
        self.queue_insert(ctx, keys::authority_expiry_key(time), name)
    }

    pub(crate) fn authority_expiry_remove(
        &self,
        ctx: &mut Context,
        time: BlockTime,
        name: &str,
    ) -> RegistryResult<()> {
        self.queue_remove(ctx, keys::authority_expiry_key(time), name)
    }

    /// The whole record expiry queue, bucket by bucket.
    pub fn record_expiry_queue(
        &self,
        ctx: &Context,
    ) -> RegistryResult<Vec<(BlockTime, Vec<String>)>> {
        self.read_queue(ctx, keys::PREFIX_RECORD_EXPIRY_QUEUE)
    }

    /// The whole authority expiry queue, bucket by bucket.
    pub fn authority_expiry_queue(
        &self,
        ctx: &Context,
    ) -> RegistryResult<Vec<(BlockTime, Vec<String>)>> {
        self.read_queue(ctx, keys::PREFIX_AUTHORITY_EXPIRY_QUEUE)
    }

    fn read_queue(
        &self,
        ctx: &Context,
        prefix: &[u8],
    ) -> RegistryResult<Vec<(BlockTime, Vec<String>)>> {
        let pairs = ctx.store.iter_prefix(STORE_NAMESPACE, prefix)?;
        let mut buckets = Vec::with_capacity(pairs.len());
        for (key, bytes) in pairs {
            let Ok(time) = keys::parse_expiry_key(&key) else {
                continue;
            };
            buckets.push((time, codec::from_bytes(&bytes)?));
        }
        Ok(buckets)
    }

    /// Buckets due at or before `ctx.time`, chronological, decoded.
    fn due_buckets(
        &self,
        ctx: &Context,
        prefix: &[u8],
    ) -> RegistryResult<Vec<(Vec<u8>, BlockTime, Vec<String>)>> {
        let pairs = ctx.store.iter_prefix(STORE_NAMESPACE, prefix)?;
        let mut due = Vec::new();
        for (key, bytes) in pairs {
            let time = match keys::parse_expiry_key(&key) {
                Ok(time) => time,
                Err(e) => {
                    warn!(error = %e, "sweep: malformed queue key skipped");
                    continue;
                }
            };
            if time > ctx.time {
                // Keys are sorted; everything beyond is in the future.
                break;
            }
            let ids: Vec<String> = match codec::from_bytes(&bytes) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(error = %e, "sweep: malformed queue bucket skipped");
                    continue;
                }
            };
            due.push((key, time, ids));
        }
        Ok(due)
    }

    // =========================================================================
    // Sweeps
    // =========================================================================

    /// Tombstone every record whose expiry bucket has come due.
    ///
    /// There is no auto-renewal: the bond funds the initial lifetime and
    /// explicit renewals only. Expired records must be re-submitted.
    pub(crate) fn process_record_expiry(&mut self, ctx: &mut Context) -> Vec<Event> {
        let buckets = match self.due_buckets(ctx, keys::PREFIX_RECORD_EXPIRY_QUEUE) {
            Ok(buckets) => buckets,
            Err(e) => {
                warn!(error = %e, "record expiry sweep aborted");
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        for (key, _, ids) in buckets {
            for id in ids {
                if let Err(e) = self.tombstone_record(ctx, &id) {
                    warn!(error = %e, record_id = %id, "record expiry skipped");
                    continue;
                }
                events.push(Event::RecordExpired { record_id: id });
            }
            if let Err(e) = ctx.store.delete(STORE_NAMESPACE, &key) {
                warn!(error = %e, "record expiry bucket not deleted");
            }
        }
        events
    }

    fn tombstone_record(&mut self, ctx: &mut Context, id: &str) -> RegistryResult<()> {
        let Some(mut record) = self.get_record_raw(ctx, id)? else {
            return Ok(());
        };
        if record.deleted {
            return Ok(());
        }
        record.deleted = true;
        if let Some(bond_id) = &record.bond_id {
            ctx.store
                .delete(STORE_NAMESPACE, &keys::bond_record_key(bond_id, id))?;
        }
        self.put_record(ctx, &record)?;
        debug!(record_id = %id, "record expired");
        Ok(())
    }

    /// Expire active authorities whose bucket has come due, and delete
    /// authorities whose grace period has also elapsed.
    pub(crate) fn process_authority_expiry(&mut self, ctx: &mut Context) -> Vec<Event> {
        let params = match self.params(ctx) {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "authority expiry sweep aborted");
                return Vec::new();
            }
        };
        let buckets = match self.due_buckets(ctx, keys::PREFIX_AUTHORITY_EXPIRY_QUEUE) {
            Ok(buckets) => buckets,
            Err(e) => {
                warn!(error = %e, "authority expiry sweep aborted");
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        for (key, _, names) in buckets {
            for name in names {
                match self.expire_or_delete_authority(ctx, &name, &params) {
                    Ok(Some(event)) => events.push(event),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, name = %name, "authority expiry skipped"),
                }
            }
            if let Err(e) = ctx.store.delete(STORE_NAMESPACE, &key) {
                warn!(error = %e, "authority expiry bucket not deleted");
            }
        }
        events
    }

    fn expire_or_delete_authority(
        &mut self,
        ctx: &mut Context,
        name: &str,
        params: &crate::params::Params,
    ) -> RegistryResult<Option<Event>> {
        let Some(mut authority) = self.get_authority(ctx, name)? else {
            return Ok(None);
        };

        match authority.status {
            AuthorityStatus::Active | AuthorityStatus::Auction => {
                authority.status = AuthorityStatus::Expired;
                authority.owner_address = None;
                authority.owner_public_key = None;
                authority.expiry_time = ctx
                    .time
                    .checked_add(params.authority_grace_period)
                    .unwrap_or(ctx.time);
                self.authority_expiry_insert(ctx, authority.expiry_time, name)?;
                self.put_authority(ctx, &authority)?;
                debug!(name = %name, "authority expired");
                Ok(Some(Event::AuthorityExpired {
                    name: name.to_string(),
                }))
            }
            AuthorityStatus::Expired => {
                if let Some(bond_id) = &authority.bond_id {
                    ctx.store
                        .delete(STORE_NAMESPACE, &keys::bond_authority_key(bond_id, name))?;
                }
                if let Some(auction_id) = &authority.auction_id {
                    ctx.store
                        .delete(STORE_NAMESPACE, &keys::auction_authority_key(auction_id))?;
                }
                ctx.store
                    .delete(STORE_NAMESPACE, &keys::authority_key(name))?;
                self.changeset(ctx, |cs| cs.authorities.push(name.to_string()))?;
                debug!(name = %name, "expired authority deleted");
                Ok(Some(Event::AuthorityDeleted {
                    name: name.to_string(),
                }))
            }
        }
    }

    // =========================================================================
    // End of block
    // =========================================================================

    /// Run all end-of-block maintenance in the fixed order: record expiry,
    /// authority expiry, auction settlement (with linked authorities).
    pub fn end_block(&mut self, ctx: &mut Context) -> Vec<Event> {
        let mut events = self.process_record_expiry(ctx);
        events.extend(self.process_authority_expiry(ctx));

        let auction_params = match self.params(ctx) {
            Ok(params) => params.auction,
            Err(e) => {
                warn!(error = %e, "auction sweep aborted");
                return events;
            }
        };
        let settled = self.auction.end_block(ctx, &mut self.bank, &auction_params);
        for auction in settled {
            events.push(Event::Auction(AuctionEvent::AuctionSettled {
                auction_id: auction.id.clone(),
                winner_address: auction.winner_address,
                winning_bid: auction.winning_bid.clone(),
                winning_price: auction.winning_price.clone(),
            }));
            match self.settle_authority_auction(ctx, &auction) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, auction_id = %auction.id, "authority settlement skipped")
                }
            }
        }
        events
    }
}
