//! Read-only query surface.
//!
//! Side-effect free views over the keeper. Record-returning queries hide
//! tombstones; link-valued attributes are resolved here, on the read path
//! only, by batch-fetching the referenced records.

use lib_auction::{Auction, AuctionKeeper, Bank, Bid, AUCTION_MODULE_ACCOUNT};
use lib_store::Context;
use lib_types::{Address, BlockTime, Coin};

use crate::attributes::link_targets;
use crate::bond::{BondKeeper, AUTHORITY_RENT_MODULE_ACCOUNT, RECORD_RENT_MODULE_ACCOUNT};
use crate::errors::RegistryResult;
use crate::keeper::Keeper;
use crate::params::Params;
use crate::types::{NameAuthority, NameRecord, Record};

/// A record together with the records its link attributes point at.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordWithReferences {
    pub record: Record,
    pub references: Vec<Record>,
}

/// Balance of one module account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBalance {
    pub account_name: String,
    pub balance: Coin,
}

/// Read-only view over the name service state.
pub struct Querier<'a, B> {
    keeper: &'a Keeper<B>,
}

impl<'a, B: Bank + BondKeeper> Querier<'a, B> {
    pub fn new(keeper: &'a Keeper<B>) -> Self {
        Self { keeper }
    }

    fn auction_keeper(&self) -> &AuctionKeeper {
        self.keeper.auction()
    }

    // =========================================================================
    // Params
    // =========================================================================

    pub fn params(&self, ctx: &Context) -> RegistryResult<Params> {
        self.keeper.params(ctx)
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub fn list_records(&self, ctx: &Context) -> RegistryResult<Vec<Record>> {
        self.keeper.list_records(ctx)
    }

    pub fn get_record(&self, ctx: &Context, id: &str) -> RegistryResult<Option<Record>> {
        self.keeper.get_record(ctx, id)
    }

    /// Record plus its dereferenced links, for presentation layers.
    pub fn get_record_with_references(
        &self,
        ctx: &Context,
        id: &str,
    ) -> RegistryResult<Option<RecordWithReferences>> {
        let Some(record) = self.keeper.get_record(ctx, id)? else {
            return Ok(None);
        };
        let references = self
            .keeper
            .records_by_ids(ctx, &link_targets(&record.attributes))?;
        Ok(Some(RecordWithReferences { record, references }))
    }

    pub fn get_records_by_bond(&self, ctx: &Context, bond_id: &str) -> RegistryResult<Vec<Record>> {
        self.keeper.records_by_bond(ctx, bond_id)
    }

    pub fn get_records_by_ids(&self, ctx: &Context, ids: &[String]) -> RegistryResult<Vec<Record>> {
        self.keeper.records_by_ids(ctx, ids)
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn whois(&self, ctx: &Context, name: &str) -> RegistryResult<Option<NameAuthority>> {
        self.keeper.whois(ctx, name)
    }

    pub fn lookup_wrn(&self, ctx: &Context, wrn: &str) -> RegistryResult<Option<NameRecord>> {
        self.keeper.lookup_wrn(ctx, wrn)
    }

    pub fn resolve_wrn(&self, ctx: &Context, wrn: &str) -> RegistryResult<Option<Record>> {
        self.keeper.resolve_wrn(ctx, wrn)
    }

    pub fn list_name_records(&self, ctx: &Context) -> RegistryResult<Vec<(String, NameRecord)>> {
        self.keeper.list_name_records(ctx)
    }

    // =========================================================================
    // Auctions
    // =========================================================================

    pub fn get_auction(&self, ctx: &Context, id: &str) -> RegistryResult<Option<Auction>> {
        Ok(self.auction_keeper().get_auction(ctx, id)?)
    }

    pub fn get_all_auctions(&self, ctx: &Context) -> RegistryResult<Vec<Auction>> {
        Ok(self.auction_keeper().list_auctions(ctx)?)
    }

    pub fn get_bid(
        &self,
        ctx: &Context,
        auction_id: &str,
        bidder: &Address,
    ) -> RegistryResult<Option<Bid>> {
        Ok(self.auction_keeper().get_bid(ctx, auction_id, bidder)?)
    }

    pub fn get_bids(&self, ctx: &Context, auction_id: &str) -> RegistryResult<Vec<Bid>> {
        Ok(self.auction_keeper().get_bids(ctx, auction_id)?)
    }

    pub fn get_auctions_by_owner(
        &self,
        ctx: &Context,
        owner: &Address,
    ) -> RegistryResult<Vec<Auction>> {
        Ok(self.auction_keeper().auctions_by_owner(ctx, owner)?)
    }

    // =========================================================================
    // Queues and balances
    // =========================================================================

    pub fn get_record_expiry_queue(
        &self,
        ctx: &Context,
    ) -> RegistryResult<Vec<(BlockTime, Vec<String>)>> {
        self.keeper.record_expiry_queue(ctx)
    }

    pub fn get_authority_expiry_queue(
        &self,
        ctx: &Context,
    ) -> RegistryResult<Vec<(BlockTime, Vec<String>)>> {
        self.keeper.authority_expiry_queue(ctx)
    }

    /// Balances of the three module accounts this subsystem feeds.
    pub fn get_balances(&self, ctx: &Context) -> RegistryResult<Vec<ModuleBalance>> {
        let params = self.keeper.params(ctx)?;
        let bank = self.keeper.bank();
        let accounts = [
            (RECORD_RENT_MODULE_ACCOUNT, &params.record_rent.denom),
            (AUTHORITY_RENT_MODULE_ACCOUNT, &params.authority_rent.denom),
            (AUCTION_MODULE_ACCOUNT, &params.auction.minimum_bid.denom),
        ];
        Ok(accounts
            .into_iter()
            .map(|(name, denom)| ModuleBalance {
                account_name: name.to_string(),
                balance: bank.module_balance(name, denom),
            })
            .collect())
    }
}
