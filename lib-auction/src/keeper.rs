//! Auction Keeper - State Mutation and Settlement
//!
//! The only code allowed to mutate the auction namespace. Message entry
//! points validate state and escrow coins; `end_block` drives phase
//! transitions, winner selection and retention-window deletion.
//!
//! # Invariants
//!
//! - One bid per (auction, bidder); a replacement commit refunds the prior
//!   commit fee before overwriting.
//! - Settlement refunds every revealed loser in full and the winner down to
//!   the second price; commit and reveal fees stay in the module account.
//! - Sweep code never fails a block: per-entry errors are logged and the
//!   entry is skipped.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use lib_store::{codec, Context};
use lib_types::{Address, Coin};

use crate::bank::{Bank, AUCTION_MODULE_ACCOUNT};
use crate::errors::{AuctionError, AuctionResult};
use crate::keys;
use crate::msgs::{MsgCommitBid, MsgCreateAuction, MsgRevealBid};
use crate::params::AuctionParams;
use crate::types::{Auction, AuctionStatus, Bid, BidStatus, RevealPayload};

/// Store namespace owned by this module.
pub const STORE_NAMESPACE: &str = "auction";

/// Keeper for the auction module.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuctionKeeper;

impl AuctionKeeper {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    // Store accessors
    // =========================================================================

    fn put_auction(&self, ctx: &mut Context, auction: &Auction) -> AuctionResult<()> {
        let bytes = codec::to_bytes(auction)?;
        ctx.store
            .set(STORE_NAMESPACE, &keys::auction_key(&auction.id), &bytes)?;
        Ok(())
    }

    /// Point lookup of an auction.
    pub fn get_auction(&self, ctx: &Context, id: &str) -> AuctionResult<Option<Auction>> {
        match ctx.store.get(STORE_NAMESPACE, &keys::auction_key(id))? {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_auction(&self, ctx: &Context, id: &str) -> AuctionResult<bool> {
        Ok(ctx.store.has(STORE_NAMESPACE, &keys::auction_key(id))?)
    }

    /// All auctions, ascending by id.
    pub fn list_auctions(&self, ctx: &Context) -> AuctionResult<Vec<Auction>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, keys::PREFIX_ID_TO_AUCTION)?;
        let mut auctions = Vec::with_capacity(pairs.len());
        for (_, bytes) in pairs {
            auctions.push(codec::from_bytes(&bytes)?);
        }
        Ok(auctions)
    }

    /// Auctions opened by one owner.
    pub fn auctions_by_owner(&self, ctx: &Context, owner: &Address) -> AuctionResult<Vec<Auction>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, &keys::owner_auctions_prefix(owner))?;
        let mut auctions = Vec::new();
        for (key, _) in pairs {
            if let Some(id) = keys::parse_owner_auction_key(&key) {
                if let Some(auction) = self.get_auction(ctx, &id)? {
                    auctions.push(auction);
                }
            }
        }
        Ok(auctions)
    }

    fn put_bid(&self, ctx: &mut Context, bid: &Bid) -> AuctionResult<()> {
        let bytes = codec::to_bytes(bid)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::bid_key(&bid.auction_id, &bid.bidder_address),
            &bytes,
        )?;
        Ok(())
    }

    /// Lookup one bidder's bid in an auction.
    pub fn get_bid(
        &self,
        ctx: &Context,
        auction_id: &str,
        bidder: &Address,
    ) -> AuctionResult<Option<Bid>> {
        match ctx
            .store
            .get(STORE_NAMESPACE, &keys::bid_key(auction_id, bidder))?
        {
            Some(bytes) => Ok(Some(codec::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All bids of an auction, ascending by bidder address.
    pub fn get_bids(&self, ctx: &Context, auction_id: &str) -> AuctionResult<Vec<Bid>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, &keys::bids_prefix(auction_id))?;
        let mut bids = Vec::with_capacity(pairs.len());
        for (_, bytes) in pairs {
            bids.push(codec::from_bytes(&bytes)?);
        }
        Ok(bids)
    }

    /// Balance of the auction module account.
    pub fn module_balance(&self, bank: &dyn Bank, denom: &str) -> Coin {
        bank.module_balance(AUCTION_MODULE_ACCOUNT, denom)
    }

    // =========================================================================
    // Message entry points
    // =========================================================================

    /// Open a new auction. Ids are derived from a persisted sequence so
    /// they are unique and deterministic across replays.
    pub fn create_auction(
        &self,
        ctx: &mut Context,
        msg: MsgCreateAuction,
    ) -> AuctionResult<Auction> {
        msg.validate_basic()?;
        let id = self.next_auction_id(ctx, &msg.signer)?;
        let auction = Auction::create(id, msg.signer, ctx.time, &msg.params);
        self.put_auction(ctx, &auction)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::owner_auction_key(&auction.owner_address, &auction.id),
            &[],
        )?;
        debug!(auction_id = %auction.id, "created auction");
        Ok(auction)
    }

    /// Record a sealed commit and escrow the commit fee. A second commit
    /// from the same bidder replaces the first and refunds its fee.
    pub fn commit_bid(
        &self,
        ctx: &mut Context,
        bank: &mut dyn Bank,
        msg: MsgCommitBid,
    ) -> AuctionResult<Bid> {
        msg.validate_basic()?;
        let auction = self
            .get_auction(ctx, &msg.auction_id)?
            .ok_or_else(|| AuctionError::NotFound(msg.auction_id.clone()))?;
        if auction.status != AuctionStatus::CommitsOpen {
            return Err(AuctionError::InvalidState(format!(
                "auction {} is not accepting commits (status: {})",
                auction.id, auction.status
            )));
        }

        if let Some(prior) = self.get_bid(ctx, &auction.id, &msg.signer)? {
            bank.send_from_module(AUCTION_MODULE_ACCOUNT, &msg.signer, &prior.commit_fee)?;
        }
        bank.send_to_module(&msg.signer, AUCTION_MODULE_ACCOUNT, &auction.commit_fee)?;

        let bid = Bid {
            auction_id: auction.id.clone(),
            bidder_address: msg.signer,
            status: BidStatus::Committed,
            commit_hash: msg.commit_hash,
            commit_time: ctx.time,
            reveal_time: None,
            commit_fee: auction.commit_fee.clone(),
            reveal_fee: None,
            bid_amount: None,
        };
        self.put_bid(ctx, &bid)?;
        Ok(bid)
    }

    /// Open a sealed commit. The reveal must hash to the committed value;
    /// on success the reveal fee and the bid amount are escrowed.
    pub fn reveal_bid(
        &self,
        ctx: &mut Context,
        bank: &mut dyn Bank,
        msg: MsgRevealBid,
    ) -> AuctionResult<Bid> {
        msg.validate_basic()?;
        let auction = self
            .get_auction(ctx, &msg.auction_id)?
            .ok_or_else(|| AuctionError::NotFound(msg.auction_id.clone()))?;
        if auction.status != AuctionStatus::RevealsOpen {
            return Err(AuctionError::InvalidState(format!(
                "auction {} is not accepting reveals (status: {})",
                auction.id, auction.status
            )));
        }

        let mut bid = self
            .get_bid(ctx, &auction.id, &msg.signer)?
            .ok_or_else(|| {
                AuctionError::NotFound(format!("no commit by {} in {}", msg.signer, auction.id))
            })?;
        if bid.status != BidStatus::Committed {
            return Err(AuctionError::InvalidState(format!(
                "bid by {} in {} already revealed",
                msg.signer, auction.id
            )));
        }

        let payload: RevealPayload = serde_json::from_str(&msg.reveal)
            .map_err(|e| AuctionError::InvalidRequest(format!("malformed reveal: {e}")))?;
        let hash = payload
            .commit_hash()
            .map_err(|e| AuctionError::InvalidRequest(format!("malformed reveal: {e}")))?;
        if hash != bid.commit_hash {
            return Err(AuctionError::InvalidRequest(
                "reveal does not match commit hash".into(),
            ));
        }
        if payload.bid_amount.denom != auction.minimum_bid.denom {
            return Err(AuctionError::InvalidRequest(format!(
                "bid denom {} does not match auction denom {}",
                payload.bid_amount.denom, auction.minimum_bid.denom
            )));
        }

        bank.send_to_module(&msg.signer, AUCTION_MODULE_ACCOUNT, &auction.reveal_fee)?;
        bank.send_to_module(&msg.signer, AUCTION_MODULE_ACCOUNT, &payload.bid_amount)?;

        bid.status = BidStatus::Revealed;
        bid.reveal_time = Some(ctx.time);
        bid.reveal_fee = Some(auction.reveal_fee.clone());
        bid.bid_amount = Some(payload.bid_amount);
        self.put_bid(ctx, &bid)?;
        Ok(bid)
    }

    // =========================================================================
    // End-of-block sweep
    // =========================================================================

    /// Advance every auction past any deadline the block clock has crossed
    /// and delete settled auctions whose retention window has elapsed.
    ///
    /// Returns the auctions settled in this block (status `completed` or
    /// `expired`), in ascending id order, so callers can run linked
    /// settlement. Never fails; per-auction errors are logged and skipped.
    pub fn end_block(
        &self,
        ctx: &mut Context,
        bank: &mut dyn Bank,
        params: &AuctionParams,
    ) -> Vec<Auction> {
        let auctions = match self.list_auctions(ctx) {
            Ok(auctions) => auctions,
            Err(e) => {
                warn!(error = %e, "auction sweep: listing failed, skipping block");
                return Vec::new();
            }
        };

        let mut settled = Vec::new();
        for auction in auctions {
            match self.process_auction(ctx, bank, params, auction) {
                Ok(Some(done)) => settled.push(done),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "auction sweep: entry skipped"),
            }
        }
        settled
    }

    /// Phase-advance a single auction. Returns the auction if it settled in
    /// this call.
    fn process_auction(
        &self,
        ctx: &mut Context,
        bank: &mut dyn Bank,
        params: &AuctionParams,
        mut auction: Auction,
    ) -> AuctionResult<Option<Auction>> {
        let now = ctx.time;

        if auction.status == AuctionStatus::CommitsOpen && now >= auction.commits_end_time {
            auction.status = AuctionStatus::RevealsOpen;
            self.put_auction(ctx, &auction)?;
            debug!(auction_id = %auction.id, "commits closed, reveals open");
        }

        if auction.status == AuctionStatus::RevealsOpen && now >= auction.reveals_end_time {
            let settled = self.settle(ctx, bank, auction)?;
            return Ok(Some(settled));
        }

        if auction.status.is_settled() {
            let delete_at = auction
                .reveals_end_time
                .checked_add(params.completed_auction_delete_duration)
                .unwrap_or(auction.reveals_end_time);
            if now >= delete_at {
                self.delete_auction(ctx, &auction)?;
            }
        }

        Ok(None)
    }

    /// Select the winner and move escrowed coins.
    ///
    /// Second-price rule: the winner pays the highest revealed amount
    /// strictly below their own bid (at least the minimum bid); everyone
    /// else is refunded their full bid amount. Commit and reveal fees are
    /// forfeited by all bidders and finance the auction.
    fn settle(
        &self,
        ctx: &mut Context,
        bank: &mut dyn Bank,
        mut auction: Auction,
    ) -> AuctionResult<Auction> {
        let bids = self.get_bids(ctx, &auction.id)?;

        // Unrevealed commits forfeit their fee and drop out here.
        for bid in &bids {
            if bid.status == BidStatus::Committed {
                let mut expired = bid.clone();
                expired.status = BidStatus::Expired;
                self.put_bid(ctx, &expired)?;
            }
        }

        let mut candidates: Vec<&Bid> = bids
            .iter()
            .filter(|bid| bid.status == BidStatus::Revealed)
            .filter(|bid| {
                bid.bid_amount
                    .as_ref()
                    .is_some_and(|amount| amount.amount >= auction.minimum_bid.amount)
            })
            .collect();

        // Highest amount wins; ties break on earliest reveal, then smallest
        // bidder address.
        candidates.sort_by(|a, b| {
            let amount_a = a.bid_amount.as_ref().map(|c| c.amount).unwrap_or(0);
            let amount_b = b.bid_amount.as_ref().map(|c| c.amount).unwrap_or(0);
            amount_b
                .cmp(&amount_a)
                .then(a.reveal_time.cmp(&b.reveal_time))
                .then(a.bidder_address.cmp(&b.bidder_address))
        });

        match candidates.split_first() {
            None => {
                auction.status = AuctionStatus::Expired;
                debug!(auction_id = %auction.id, "settled without winner");
                // Revealed-but-underbid amounts still get refunded.
                for bid in bids.iter().filter(|b| b.status == BidStatus::Revealed) {
                    if let Some(amount) = &bid.bid_amount {
                        self.refund(bank, &bid.bidder_address, amount);
                    }
                }
            }
            Some((winner, losers)) => {
                let winning_bid = winner
                    .bid_amount
                    .clone()
                    .unwrap_or_else(|| auction.minimum_bid.clone());
                let second = losers
                    .iter()
                    .filter_map(|bid| bid.bid_amount.as_ref())
                    .map(|coin| coin.amount)
                    .find(|amount| *amount < winning_bid.amount);
                let winning_price = Coin::new(
                    winning_bid.denom.clone(),
                    second.unwrap_or(auction.minimum_bid.amount),
                );

                // Winner keeps the difference; losers take back everything.
                if let Some(refund) = winning_bid.checked_sub(&winning_price) {
                    if !refund.is_zero() {
                        self.refund(bank, &winner.bidder_address, &refund);
                    }
                }
                for bid in losers {
                    if let Some(amount) = &bid.bid_amount {
                        self.refund(bank, &bid.bidder_address, amount);
                    }
                }
                // Revealed bids below the minimum are not candidates but
                // their escrow is still returned.
                for bid in bids.iter().filter(|b| {
                    b.status == BidStatus::Revealed
                        && b.bid_amount
                            .as_ref()
                            .is_some_and(|amount| amount.amount < auction.minimum_bid.amount)
                }) {
                    if let Some(amount) = &bid.bid_amount {
                        self.refund(bank, &bid.bidder_address, amount);
                    }
                }

                auction.status = AuctionStatus::Completed;
                auction.winner_address = Some(winner.bidder_address);
                auction.winning_bid = Some(winning_bid);
                auction.winning_price = Some(winning_price);
                debug!(
                    auction_id = %auction.id,
                    winner = %winner.bidder_address,
                    "settled with winner"
                );
            }
        }

        self.put_auction(ctx, &auction)?;
        Ok(auction)
    }

    /// Refunds must not fail the sweep; a refused refund leaves the coins
    /// in the module account and is logged.
    fn refund(&self, bank: &mut dyn Bank, to: &Address, amount: &Coin) {
        if let Err(e) = bank.send_from_module(AUCTION_MODULE_ACCOUNT, to, amount) {
            warn!(error = %e, bidder = %to, "auction refund skipped");
        }
    }

    fn delete_auction(&self, ctx: &mut Context, auction: &Auction) -> AuctionResult<()> {
        for bid in self.get_bids(ctx, &auction.id)? {
            ctx.store.delete(
                STORE_NAMESPACE,
                &keys::bid_key(&auction.id, &bid.bidder_address),
            )?;
        }
        ctx.store.delete(
            STORE_NAMESPACE,
            &keys::owner_auction_key(&auction.owner_address, &auction.id),
        )?;
        ctx.store
            .delete(STORE_NAMESPACE, &keys::auction_key(&auction.id))?;
        debug!(auction_id = %auction.id, "deleted settled auction");
        Ok(())
    }

    /// Next id from the persisted sequence: hex SHA-256 over the sequence
    /// number and the creator address.
    fn next_auction_id(&self, ctx: &mut Context, owner: &Address) -> AuctionResult<String> {
        let seq: u64 = match ctx.store.get(STORE_NAMESPACE, keys::KEY_AUCTION_SEQUENCE)? {
            Some(bytes) => codec::from_bytes(&bytes)?,
            None => 0,
        };
        let next = seq + 1;
        ctx.store.set(
            STORE_NAMESPACE,
            keys::KEY_AUCTION_SEQUENCE,
            &codec::to_bytes(&next)?,
        )?;

        let mut hasher = Sha256::new();
        hasher.update(next.to_be_bytes());
        hasher.update(owner.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
