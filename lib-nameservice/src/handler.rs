//! Message dispatch.
//!
//! Transactions enter as typed messages, pass stateless validation, then
//! execute inside a store transaction: commit on success, rollback on any
//! error. Events are emitted only for messages that committed.

use serde::{Deserialize, Serialize};

use lib_auction::{AuctionEvent, Bank, MsgCommitBid, MsgCreateAuction, MsgRevealBid};
use lib_store::Context;

use crate::bond::BondKeeper;
use crate::errors::RegistryResult;
use crate::events::Event;
use crate::keeper::Keeper;
use crate::msgs::{
    MsgAssociateBond, MsgDeleteName, MsgDissociateBond, MsgDissociateRecords,
    MsgReAssociateRecords, MsgRenewRecord, MsgReserveAuthority, MsgSetAuthorityBond, MsgSetName,
    MsgSetRecord,
};

/// The full external command surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    // Record registry
    SetRecord(MsgSetRecord),
    RenewRecord(MsgRenewRecord),
    AssociateBond(MsgAssociateBond),
    DissociateBond(MsgDissociateBond),
    DissociateRecords(MsgDissociateRecords),
    ReAssociateRecords(MsgReAssociateRecords),

    // Authority registry
    ReserveAuthority(MsgReserveAuthority),
    SetAuthorityBond(MsgSetAuthorityBond),
    SetName(MsgSetName),
    DeleteName(MsgDeleteName),

    // Auction engine
    CreateAuction(MsgCreateAuction),
    CommitBid(MsgCommitBid),
    RevealBid(MsgRevealBid),
}

/// Result of a successfully applied message.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgResponse {
    pub events: Vec<Event>,
}

impl<B: Bank + BondKeeper> Keeper<B> {
    /// Apply one message transactionally.
    pub fn dispatch(&mut self, ctx: &mut Context, msg: Msg) -> RegistryResult<MsgResponse> {
        ctx.store.begin()?;
        match self.execute(ctx, msg) {
            Ok(response) => {
                ctx.store.commit()?;
                Ok(response)
            }
            Err(e) => {
                // Rollback failures are unreachable while a transaction is
                // active; the original error is the one that matters.
                let _ = ctx.store.rollback();
                Err(e)
            }
        }
    }

    fn execute(&mut self, ctx: &mut Context, msg: Msg) -> RegistryResult<MsgResponse> {
        let events = match msg {
            Msg::SetRecord(msg) => {
                let signer = msg.signer;
                let bond_id = msg.bond_id.clone();
                let record = self.set_record(ctx, msg)?;
                vec![Event::SetRecord {
                    record_id: record.id,
                    bond_id,
                    signer,
                }]
            }
            Msg::RenewRecord(msg) => {
                let signer = msg.signer;
                let record = self.renew_record(ctx, msg)?;
                vec![Event::RenewRecord {
                    record_id: record.id,
                    signer,
                }]
            }
            Msg::AssociateBond(msg) => {
                let event = Event::AssociateBond {
                    record_id: msg.record_id.clone(),
                    bond_id: msg.bond_id.clone(),
                    signer: msg.signer,
                };
                self.associate_bond(ctx, msg)?;
                vec![event]
            }
            Msg::DissociateBond(msg) => {
                let event = Event::DissociateBond {
                    record_id: msg.record_id.clone(),
                    signer: msg.signer,
                };
                self.dissociate_bond(ctx, msg)?;
                vec![event]
            }
            Msg::DissociateRecords(msg) => {
                let event = Event::DissociateRecords {
                    bond_id: msg.bond_id.clone(),
                    signer: msg.signer,
                };
                self.dissociate_records(ctx, msg)?;
                vec![event]
            }
            Msg::ReAssociateRecords(msg) => {
                let event = Event::ReAssociateRecords {
                    old_bond_id: msg.old_bond_id.clone(),
                    new_bond_id: msg.new_bond_id.clone(),
                    signer: msg.signer,
                };
                self.reassociate_records(ctx, msg)?;
                vec![event]
            }
            Msg::ReserveAuthority(msg) => {
                let signer = msg.signer;
                let (authority, auction) = self.reserve_authority(ctx, msg)?;
                vec![Event::ReserveAuthority {
                    name: authority.name,
                    auction_id: auction.map(|a| a.id),
                    signer,
                }]
            }
            Msg::SetAuthorityBond(msg) => {
                let event = Event::SetAuthorityBond {
                    name: msg.name.clone(),
                    bond_id: msg.bond_id.clone(),
                    signer: msg.signer,
                };
                self.set_authority_bond(ctx, msg)?;
                vec![event]
            }
            Msg::SetName(msg) => {
                let event = Event::SetName {
                    wrn: msg.wrn.clone(),
                    record_id: msg.cid.clone(),
                    signer: msg.signer,
                };
                self.set_name(ctx, msg)?;
                vec![event]
            }
            Msg::DeleteName(msg) => {
                let event = Event::DeleteName {
                    wrn: msg.wrn.clone(),
                    signer: msg.signer,
                };
                self.delete_name(ctx, msg)?;
                vec![event]
            }
            Msg::CreateAuction(msg) => {
                let signer = msg.signer;
                let auction = self.auction.create_auction(ctx, msg)?;
                vec![Event::Auction(AuctionEvent::CreateAuction {
                    auction_id: auction.id,
                    signer,
                    commit_fee: auction.commit_fee,
                    reveal_fee: auction.reveal_fee,
                    minimum_bid: auction.minimum_bid,
                })]
            }
            Msg::CommitBid(msg) => {
                let signer = msg.signer;
                let bid = self.auction.commit_bid(ctx, &mut self.bank, msg)?;
                vec![Event::Auction(AuctionEvent::CommitBid {
                    auction_id: bid.auction_id,
                    signer,
                    commit_hash: bid.commit_hash,
                })]
            }
            Msg::RevealBid(msg) => {
                let signer = msg.signer;
                let bid = self.auction.reveal_bid(ctx, &mut self.bank, msg)?;
                vec![Event::Auction(AuctionEvent::RevealBid {
                    auction_id: bid.auction_id,
                    signer,
                    bid_amount: bid
                        .bid_amount
                        .unwrap_or_else(|| lib_types::Coin::zero("")),
                })]
            }
        };
        Ok(MsgResponse { events })
    }
}
