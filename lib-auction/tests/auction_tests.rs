//! Auction Engine Integration Tests
//!
//! End-to-end tests for the commit-reveal lifecycle:
//! 1. Open auction, commit sealed bids
//! 2. Cross the commit deadline, reveal
//! 3. Settle at the reveal deadline (second-price rule)
//! 4. Retention-window deletion

use lib_auction::testkit::{test_address, MemBank};
use lib_auction::Bank;
use lib_auction::{
    Auction, AuctionError, AuctionKeeper, AuctionParams, AuctionStatus, BidStatus, MsgCommitBid,
    MsgCreateAuction, MsgRevealBid, RevealPayload, AUCTION_MODULE_ACCOUNT,
};
use lib_store::{Context, MemMultiStore};
use lib_types::{Address, BlockTime, Coin, Duration};

const DENOM: &str = "uwire";

fn test_params() -> AuctionParams {
    AuctionParams {
        commits_duration: Duration::from_secs(100),
        reveals_duration: Duration::from_secs(100),
        commit_fee: Coin::new(DENOM, 10),
        reveal_fee: Coin::new(DENOM, 10),
        minimum_bid: Coin::new(DENOM, 50),
        completed_auction_delete_duration: Duration::from_secs(1_000),
    }
}

fn open_auction(store: &mut MemMultiStore, owner: Address) -> Auction {
    let keeper = AuctionKeeper::new();
    let mut ctx = Context::new(store, 1, BlockTime::from_unix(1_000));
    keeper
        .create_auction(
            &mut ctx,
            MsgCreateAuction {
                params: test_params(),
                signer: owner,
            },
        )
        .expect("create auction")
}

fn commit(
    store: &mut MemMultiStore,
    bank: &mut MemBank,
    auction_id: &str,
    bidder: Address,
    reveal: &RevealPayload,
) {
    let keeper = AuctionKeeper::new();
    let mut ctx = Context::new(store, 1, BlockTime::from_unix(1_010));
    keeper
        .commit_bid(
            &mut ctx,
            bank,
            MsgCommitBid {
                auction_id: auction_id.to_string(),
                commit_hash: reveal.commit_hash().unwrap(),
                signer: bidder,
            },
        )
        .expect("commit bid");
}

fn reveal(
    store: &mut MemMultiStore,
    bank: &mut MemBank,
    auction_id: &str,
    bidder: Address,
    payload: &RevealPayload,
    at: i64,
) {
    let keeper = AuctionKeeper::new();
    let mut ctx = Context::new(store, 2, BlockTime::from_unix(at));
    keeper
        .reveal_bid(
            &mut ctx,
            bank,
            MsgRevealBid {
                auction_id: auction_id.to_string(),
                reveal: serde_json::to_string(payload).unwrap(),
                signer: bidder,
            },
        )
        .expect("reveal bid");
}

fn sweep(store: &mut MemMultiStore, bank: &mut MemBank, at: i64) -> Vec<Auction> {
    let keeper = AuctionKeeper::new();
    let mut ctx = Context::new(store, 3, BlockTime::from_unix(at));
    keeper.end_block(&mut ctx, bank, &test_params())
}

fn reveal_payload(amount: u128, nonce: &str) -> RevealPayload {
    RevealPayload {
        bid_amount: Coin::new(DENOM, amount),
        nonce: nonce.to_string(),
    }
}

#[test]
fn test_second_price_settlement() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();
    let keeper = AuctionKeeper::new();

    let (alice, bob, carol, dave) = (
        test_address(1),
        test_address(2),
        test_address(3),
        test_address(4),
    );
    for addr in [alice, bob, carol, dave] {
        bank.fund(addr, Coin::new(DENOM, 1_000));
    }

    let auction = open_auction(&mut store, test_address(9));

    // Three bidders reveal 100/80/60; dave commits but never reveals.
    let bids = [
        (alice, reveal_payload(100, "aa")),
        (bob, reveal_payload(80, "bb")),
        (carol, reveal_payload(60, "cc")),
        (dave, reveal_payload(90, "dd")),
    ];
    for (bidder, payload) in &bids {
        commit(&mut store, &mut bank, &auction.id, *bidder, payload);
    }

    // Cross the commit deadline.
    let settled = sweep(&mut store, &mut bank, 1_150);
    assert!(settled.is_empty());

    for (bidder, payload) in &bids[..3] {
        reveal(&mut store, &mut bank, &auction.id, *bidder, payload, 1_160);
    }

    // Cross the reveal deadline: settlement.
    let settled = sweep(&mut store, &mut bank, 1_250);
    assert_eq!(settled.len(), 1);
    let done = &settled[0];
    assert_eq!(done.status, AuctionStatus::Completed);
    assert_eq!(done.winner_address, Some(alice));
    assert_eq!(done.winning_bid, Some(Coin::new(DENOM, 100)));
    // Second price: the highest bid strictly below the winner's.
    assert_eq!(done.winning_price, Some(Coin::new(DENOM, 80)));

    // Winner paid 80 plus both fees.
    assert_eq!(bank.account_balance(&alice, DENOM).amount, 1_000 - 10 - 10 - 80);
    // Losers paid only their fees.
    assert_eq!(bank.account_balance(&bob, DENOM).amount, 1_000 - 10 - 10);
    assert_eq!(bank.account_balance(&carol, DENOM).amount, 1_000 - 10 - 10);
    // The unrevealed commit forfeits its commit fee.
    assert_eq!(bank.account_balance(&dave, DENOM).amount, 1_000 - 10);

    let ctx = Context::new(&mut store, 4, BlockTime::from_unix(1_300));
    let dave_bid = keeper.get_bid(&ctx, &done.id, &dave).unwrap().unwrap();
    assert_eq!(dave_bid.status, BidStatus::Expired);

    // Module account keeps all fees plus the winning price (invariant:
    // charged minus refunded).
    let expected_escrow = 4 * 10 + 3 * 10 + 80;
    assert_eq!(
        bank.module_balance(AUCTION_MODULE_ACCOUNT, DENOM).amount,
        expected_escrow as u128
    );
    // Nothing minted or burned.
    assert_eq!(bank.total_supply(DENOM), 4_000);
}

#[test]
fn test_no_valid_winner_expires_auction() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();

    let alice = test_address(1);
    bank.fund(alice, Coin::new(DENOM, 1_000));

    let auction = open_auction(&mut store, test_address(9));

    // Revealed bid below the minimum: no candidate.
    let payload = reveal_payload(40, "aa");
    commit(&mut store, &mut bank, &auction.id, alice, &payload);
    sweep(&mut store, &mut bank, 1_150);
    reveal(&mut store, &mut bank, &auction.id, alice, &payload, 1_160);

    let settled = sweep(&mut store, &mut bank, 1_250);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].status, AuctionStatus::Expired);
    assert!(settled[0].winner_address.is_none());

    // The underbid escrow is refunded, fees are kept.
    assert_eq!(bank.account_balance(&alice, DENOM).amount, 1_000 - 10 - 10);
}

#[test]
fn test_replacement_commit_refunds_prior_fee() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();
    let keeper = AuctionKeeper::new();

    let alice = test_address(1);
    bank.fund(alice, Coin::new(DENOM, 100));

    let auction = open_auction(&mut store, test_address(9));
    commit(&mut store, &mut bank, &auction.id, alice, &reveal_payload(60, "aa"));
    commit(&mut store, &mut bank, &auction.id, alice, &reveal_payload(70, "bb"));

    // Only one commit fee outstanding.
    assert_eq!(bank.account_balance(&alice, DENOM).amount, 90);

    let ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_020));
    let bid = keeper.get_bid(&ctx, &auction.id, &alice).unwrap().unwrap();
    assert_eq!(
        bid.commit_hash,
        reveal_payload(70, "bb").commit_hash().unwrap()
    );
}

#[test]
fn test_phase_guards() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();
    let keeper = AuctionKeeper::new();

    let alice = test_address(1);
    bank.fund(alice, Coin::new(DENOM, 1_000));

    let auction = open_auction(&mut store, test_address(9));
    let payload = reveal_payload(60, "aa");

    // Reveal during the commit window is rejected.
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(1_010));
    let err = keeper
        .reveal_bid(
            &mut ctx,
            &mut bank,
            MsgRevealBid {
                auction_id: auction.id.clone(),
                reveal: serde_json::to_string(&payload).unwrap(),
                signer: alice,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AuctionError::InvalidState(_)));
    drop(ctx);

    sweep(&mut store, &mut bank, 1_150);

    // Commit after the commit window is rejected.
    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_160));
    let err = keeper
        .commit_bid(
            &mut ctx,
            &mut bank,
            MsgCommitBid {
                auction_id: auction.id.clone(),
                commit_hash: payload.commit_hash().unwrap(),
                signer: alice,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AuctionError::InvalidState(_)));
}

#[test]
fn test_mismatched_reveal_leaves_commit_intact() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();
    let keeper = AuctionKeeper::new();

    let alice = test_address(1);
    bank.fund(alice, Coin::new(DENOM, 1_000));

    let auction = open_auction(&mut store, test_address(9));
    commit(&mut store, &mut bank, &auction.id, alice, &reveal_payload(60, "aa"));
    sweep(&mut store, &mut bank, 1_150);

    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_160));
    let err = keeper
        .reveal_bid(
            &mut ctx,
            &mut bank,
            MsgRevealBid {
                auction_id: auction.id.clone(),
                reveal: serde_json::to_string(&reveal_payload(61, "aa")).unwrap(),
                signer: alice,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AuctionError::InvalidRequest(_)));
    drop(ctx);

    let ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_161));
    let bid = keeper.get_bid(&ctx, &auction.id, &alice).unwrap().unwrap();
    assert_eq!(bid.status, BidStatus::Committed);
}

#[test]
fn test_retention_deletion() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();
    let keeper = AuctionKeeper::new();

    let auction = open_auction(&mut store, test_address(9));

    // Settles with no bids at the reveal deadline.
    sweep(&mut store, &mut bank, 1_250);
    let ctx = Context::new(&mut store, 3, BlockTime::from_unix(1_251));
    assert!(keeper.has_auction(&ctx, &auction.id).unwrap());
    drop(ctx);

    // Before the retention window elapses nothing is deleted.
    sweep(&mut store, &mut bank, 1_300);
    let ctx = Context::new(&mut store, 4, BlockTime::from_unix(1_301));
    assert!(keeper.has_auction(&ctx, &auction.id).unwrap());
    drop(ctx);

    // After reveals_end + retention it is gone.
    sweep(&mut store, &mut bank, 2_300);
    let ctx = Context::new(&mut store, 5, BlockTime::from_unix(2_301));
    assert!(!keeper.has_auction(&ctx, &auction.id).unwrap());
}

#[test]
fn test_auction_ids_are_unique_per_owner() {
    let mut store = MemMultiStore::new();
    let owner = test_address(9);

    let first = open_auction(&mut store, owner);
    let second = open_auction(&mut store, owner);
    assert_ne!(first.id, second.id);

    let keeper = AuctionKeeper::new();
    let ctx = Context::new(&mut store, 1, BlockTime::from_unix(1_001));
    assert_eq!(keeper.auctions_by_owner(&ctx, &owner).unwrap().len(), 2);
}

#[test]
fn test_tiebreak_on_reveal_time_then_address() {
    let mut store = MemMultiStore::new();
    let mut bank = MemBank::new();

    let (alice, bob) = (test_address(2), test_address(1));
    bank.fund(alice, Coin::new(DENOM, 1_000));
    bank.fund(bob, Coin::new(DENOM, 1_000));

    let auction = open_auction(&mut store, test_address(9));
    let payload_a = reveal_payload(100, "aa");
    let payload_b = reveal_payload(100, "bb");
    commit(&mut store, &mut bank, &auction.id, alice, &payload_a);
    commit(&mut store, &mut bank, &auction.id, bob, &payload_b);
    sweep(&mut store, &mut bank, 1_150);

    // Equal amounts, equal reveal times: the smaller address wins.
    reveal(&mut store, &mut bank, &auction.id, alice, &payload_a, 1_160);
    reveal(&mut store, &mut bank, &auction.id, bob, &payload_b, 1_160);

    let settled = sweep(&mut store, &mut bank, 1_250);
    assert_eq!(settled[0].winner_address, Some(bob));
    // No revealed amount strictly below the winning bid: price falls back
    // to the minimum bid.
    assert_eq!(settled[0].winning_price, Some(Coin::new(DENOM, 50)));
}
