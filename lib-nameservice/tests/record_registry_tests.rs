//! Record Registry Integration Tests
//!
//! End-to-end coverage of the record lifecycle: signed submission, rent
//! collection, idempotence, bond management, renewal and the expiry sweep.

use serde_json::json;

use lib_auction::bank::Bank;
use lib_nameservice::msgs::{
    MsgAssociateBond, MsgDissociateBond, MsgDissociateRecords, MsgReAssociateRecords,
    MsgRenewRecord, MsgSetRecord,
};
use lib_nameservice::testkit::{attributes, signed_payload, signing_key, TestBank};
use lib_nameservice::{Keeper, Params, RegistryError};
use lib_store::{Context, MemMultiStore, MultiStore};
use lib_types::{BlockTime, Coin, Duration};

const DENOM: &str = "uwire";

fn test_params() -> Params {
    Params {
        record_rent: Coin::new(DENOM, 1),
        record_rent_duration: Duration::from_secs(1_000),
        ..Params::default()
    }
}

fn setup(store: &mut MemMultiStore) -> Keeper<TestBank> {
    let keeper = Keeper::new(TestBank::new());
    let mut ctx = Context::new(store, 0, BlockTime::from_unix(0));
    keeper.set_params(&mut ctx, &test_params()).unwrap();
    keeper
}

fn set_record_msg(seed: u8, bond_id: &str, json: serde_json::Value) -> MsgSetRecord {
    let key = signing_key(seed);
    let attrs = attributes(json);
    MsgSetRecord {
        payload: signed_payload(&attrs, &[&key]),
        bond_id: bond_id.to_string(),
        signer: key.public().address(),
    }
}

#[test]
fn test_set_record_charges_rent_and_schedules_expiry() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    let owner = key.public().address();
    keeper
        .bank_mut()
        .create_bond("bond-1", owner, Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example", "name": "a"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();

    assert_eq!(record.owners, vec![owner]);
    assert_eq!(record.create_time, BlockTime::from_unix(100));
    assert_eq!(record.expiry_time, BlockTime::from_unix(1_100));
    assert!(!record.deleted);

    // Rent moved from the bond into the record-rent module account.
    assert_eq!(keeper.bank().bond_balance("bond-1", DENOM).amount, 9);
    assert_eq!(
        keeper.bank().module_balance("record_rent", DENOM).amount,
        1
    );

    // Exactly one queue entry at the record's expiry time.
    let ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let queue = keeper.record_expiry_queue(&ctx).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].0, BlockTime::from_unix(1_100));
    assert_eq!(queue[0].1, vec![record.id.clone()]);

    // The stored record round-trips through the public read.
    let fetched = keeper.get_record(&ctx, &record.id).unwrap().unwrap();
    assert_eq!(fetched, record);
}

#[test]
fn test_set_record_is_idempotent() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example", "name": "a"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let first = keeper.set_record(&mut ctx, msg.clone()).unwrap();
    drop(ctx);

    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(200));
    let second = keeper.set_record(&mut ctx, msg).unwrap();

    // Same id, original timestamps, and rent charged only once.
    assert_eq!(second, first);
    assert_eq!(keeper.bank().bond_balance("bond-1", DENOM).amount, 9);

    let ctx = Context::new(&mut store, 2, BlockTime::from_unix(200));
    assert_eq!(keeper.record_expiry_queue(&ctx).unwrap()[0].1.len(), 1);
}

#[test]
fn test_same_attributes_different_key_order_share_an_id() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let a: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
    let b: serde_json::Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();

    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let first = keeper
        .set_record(&mut ctx, set_record_msg(1, "bond-1", a))
        .unwrap();
    drop(ctx);
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let second = keeper
        .set_record(&mut ctx, set_record_msg(1, "bond-1", b))
        .unwrap();

    assert_eq!(first.id, second.id);
}

#[test]
fn test_multi_signer_owners_are_sorted() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let k1 = signing_key(1);
    let k2 = signing_key(2);
    keeper
        .bank_mut()
        .create_bond("bond-1", k1.public().address(), Coin::new(DENOM, 10));

    let attrs = attributes(json!({"type": "example"}));
    let msg = MsgSetRecord {
        payload: signed_payload(&attrs, &[&k2, &k1]),
        bond_id: "bond-1".into(),
        signer: k1.public().address(),
    };
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();

    let mut expected = vec![k1.public().address(), k2.public().address()];
    expected.sort();
    assert_eq!(record.owners, expected);
}

#[test]
fn test_tampered_signature_is_unauthorized() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let mut msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    // Signature over different attributes.
    let other = attributes(json!({"type": "tampered"}));
    msg.payload.signatures[0].sig = signed_payload(&other, &[&key]).signatures[0].sig.clone();

    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let err = keeper.set_record(&mut ctx, msg).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized(_)));
}

#[test]
fn test_rent_shortage_is_insufficient_funds() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 0));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let err = keeper.set_record(&mut ctx, msg).unwrap_err();
    assert!(matches!(err, RegistryError::InsufficientFunds(_)));
}

#[test]
fn test_renew_extends_expiry_and_rebuckets() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();
    drop(ctx);

    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(500));
    let renewed = keeper
        .renew_record(
            &mut ctx,
            MsgRenewRecord {
                record_id: record.id.clone(),
                signer: key.public().address(),
            },
        )
        .unwrap();

    assert_eq!(renewed.expiry_time, BlockTime::from_unix(1_500));
    // Renewal never changes owners, attributes or the bond.
    assert_eq!(renewed.owners, record.owners);
    assert_eq!(renewed.attributes, record.attributes);
    assert_eq!(renewed.bond_id, record.bond_id);
    assert_eq!(keeper.bank().bond_balance("bond-1", DENOM).amount, 8);

    // The old bucket is gone; exactly one entry remains.
    let ctx = Context::new(&mut store, 2, BlockTime::from_unix(500));
    let queue = keeper.record_expiry_queue(&ctx).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].0, BlockTime::from_unix(1_500));
}

#[test]
fn test_renew_missing_record_is_not_found() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let err = keeper
        .renew_record(
            &mut ctx,
            MsgRenewRecord {
                record_id: "bafymissing".into(),
                signer: signing_key(1).public().address(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[test]
fn test_dissociated_record_cannot_renew() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    let owner = key.public().address();
    keeper
        .bank_mut()
        .create_bond("bond-1", owner, Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();

    keeper
        .dissociate_bond(
            &mut ctx,
            MsgDissociateBond {
                record_id: record.id.clone(),
                signer: owner,
            },
        )
        .unwrap();

    let err = keeper
        .renew_record(
            &mut ctx,
            MsgRenewRecord {
                record_id: record.id.clone(),
                signer: owner,
            },
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidState(_)));
}

#[test]
fn test_associate_bond_requires_owner() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    let owner = key.public().address();
    let stranger = signing_key(9).public().address();
    keeper
        .bank_mut()
        .create_bond("bond-1", owner, Coin::new(DENOM, 10));
    keeper
        .bank_mut()
        .create_bond("bond-2", stranger, Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();

    keeper
        .dissociate_bond(
            &mut ctx,
            MsgDissociateBond {
                record_id: record.id.clone(),
                signer: owner,
            },
        )
        .unwrap();

    // A non-owner cannot attach a bond.
    let err = keeper
        .associate_bond(
            &mut ctx,
            MsgAssociateBond {
                record_id: record.id.clone(),
                bond_id: "bond-2".into(),
                signer: stranger,
            },
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized(_)));

    // The owner can, using a bond they own.
    keeper
        .associate_bond(
            &mut ctx,
            MsgAssociateBond {
                record_id: record.id.clone(),
                bond_id: "bond-1".into(),
                signer: owner,
            },
        )
        .unwrap();
    let fetched = keeper.get_record(&ctx, &record.id).unwrap().unwrap();
    assert_eq!(fetched.bond_id.as_deref(), Some("bond-1"));
}

#[test]
fn test_bond_level_dissociate_and_reassociate() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    let owner = key.public().address();
    keeper
        .bank_mut()
        .create_bond("bond-1", owner, Coin::new(DENOM, 10));
    keeper
        .bank_mut()
        .create_bond("bond-2", owner, Coin::new(DENOM, 10));

    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let r1 = keeper
        .set_record(&mut ctx, set_record_msg(1, "bond-1", json!({"n": 1})))
        .unwrap();
    let r2 = keeper
        .set_record(&mut ctx, set_record_msg(1, "bond-1", json!({"n": 2})))
        .unwrap();

    keeper
        .reassociate_records(
            &mut ctx,
            MsgReAssociateRecords {
                old_bond_id: "bond-1".into(),
                new_bond_id: "bond-2".into(),
                signer: owner,
            },
        )
        .unwrap();

    assert!(keeper.records_by_bond(&ctx, "bond-1").unwrap().is_empty());
    let moved = keeper.records_by_bond(&ctx, "bond-2").unwrap();
    let mut moved_ids: Vec<&str> = moved.iter().map(|r| r.id.as_str()).collect();
    moved_ids.sort_unstable();
    let mut expected = vec![r1.id.as_str(), r2.id.as_str()];
    expected.sort_unstable();
    assert_eq!(moved_ids, expected);

    keeper
        .dissociate_records(
            &mut ctx,
            MsgDissociateRecords {
                bond_id: "bond-2".into(),
                signer: owner,
            },
        )
        .unwrap();
    assert!(keeper.records_by_bond(&ctx, "bond-2").unwrap().is_empty());
    assert_eq!(
        keeper.get_record(&ctx, &r1.id).unwrap().unwrap().bond_id,
        None
    );
}

#[test]
fn test_expiry_sweep_tombstones_record() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg).unwrap();
    drop(ctx);

    // Sweep one second past the expiry bucket.
    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_101));
    let events = keeper.end_block(&mut ctx);
    assert!(events
        .iter()
        .any(|e| format!("{e}") == format!("RecordExpired({})", record.id)));
    drop(ctx);

    let ctx = Context::new(&mut store, 3, BlockTime::from_unix(1_102));
    // Public reads see the record as absent.
    assert!(keeper.get_record(&ctx, &record.id).unwrap().is_none());
    assert!(keeper.list_records(&ctx).unwrap().is_empty());
    // The bucket entry is gone.
    assert!(keeper.record_expiry_queue(&ctx).unwrap().is_empty());
    // No bond index entry survives.
    assert!(keeper.records_by_bond(&ctx, "bond-1").unwrap().is_empty());
}

#[test]
fn test_tombstoned_id_can_be_resubmitted() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let msg = set_record_msg(1, "bond-1", json!({"type": "example"}));
    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper.set_record(&mut ctx, msg.clone()).unwrap();
    drop(ctx);

    let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_101));
    keeper.end_block(&mut ctx);
    drop(ctx);

    let mut ctx = Context::new(&mut store, 3, BlockTime::from_unix(1_200));
    let resubmitted = keeper.set_record(&mut ctx, msg).unwrap();
    assert_eq!(resubmitted.id, record.id);
    assert!(!resubmitted.deleted);
    assert_eq!(resubmitted.create_time, BlockTime::from_unix(1_200));
}

#[test]
fn test_records_by_ids_skips_absent() {
    let mut store = MemMultiStore::new();
    let mut keeper = setup(&mut store);

    let key = signing_key(1);
    keeper
        .bank_mut()
        .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));

    let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let record = keeper
        .set_record(&mut ctx, set_record_msg(1, "bond-1", json!({"n": 1})))
        .unwrap();
    drop(ctx);

    let ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
    let found = keeper
        .records_by_ids(&ctx, &[record.id.clone(), "bafymissing".into()])
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, record.id);
}

#[test]
fn test_store_state_matches_between_runs() {
    // The same message sequence applied to two fresh stores leaves
    // identical state: determinism across replays.
    let run = || {
        let mut store = MemMultiStore::new();
        let mut keeper = setup(&mut store);
        let key = signing_key(1);
        keeper
            .bank_mut()
            .create_bond("bond-1", key.public().address(), Coin::new(DENOM, 10));
        let mut ctx = Context::new(&mut store, 1, BlockTime::from_unix(100));
        keeper
            .set_record(&mut ctx, set_record_msg(1, "bond-1", json!({"n": 1})))
            .unwrap();
        drop(ctx);
        let mut ctx = Context::new(&mut store, 2, BlockTime::from_unix(1_101));
        keeper.end_block(&mut ctx);
        drop(ctx);
        store.iter_prefix("nameservice", &[]).unwrap()
    };
    assert_eq!(run(), run());
}
