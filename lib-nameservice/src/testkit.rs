//! Test fixtures for the name service.
//!
//! `TestBank` wires the auction bank double together with an in-memory
//! bond module: each bond is backed by a synthetic escrow account inside
//! the bank, so coin conservation holds across rent, fees and refunds.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use lib_auction::testkit::MemBank;
use lib_auction::{Bank, BankError};
use lib_types::{Address, Coin, SigningKey, ADDRESS_SIZE};

use crate::attributes::{attributes_from_json, Attributes};
use crate::bond::{BondError, BondKeeper};
use crate::payload::{sign_payload, Payload};

/// In-memory bank + bond double.
#[derive(Debug, Clone, Default)]
pub struct TestBank {
    pub bank: MemBank,
    bonds: BTreeMap<String, TestBond>,
}

#[derive(Debug, Clone)]
struct TestBond {
    owner: Address,
    escrow: Address,
}

impl TestBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bond and fund its escrow account.
    pub fn create_bond(&mut self, bond_id: &str, owner: Address, balance: Coin) {
        let escrow = bond_escrow_address(bond_id);
        self.bank.fund(escrow, balance);
        self.bonds
            .insert(bond_id.to_string(), TestBond { owner, escrow });
    }

    /// Remaining balance of a bond.
    pub fn bond_balance(&self, bond_id: &str, denom: &str) -> Coin {
        match self.bonds.get(bond_id) {
            Some(bond) => self.bank.account_balance(&bond.escrow, denom),
            None => Coin::zero(denom),
        }
    }

    pub fn fund(&mut self, account: Address, amount: Coin) {
        self.bank.fund(account, amount);
    }

    pub fn account_balance(&self, account: &Address, denom: &str) -> Coin {
        self.bank.account_balance(account, denom)
    }

    pub fn total_supply(&self, denom: &str) -> u128 {
        self.bank.total_supply(denom)
    }
}

fn bond_escrow_address(bond_id: &str) -> Address {
    let digest = Sha256::digest(format!("bond:{bond_id}").as_bytes());
    let mut bytes = [0u8; ADDRESS_SIZE];
    bytes.copy_from_slice(&digest[..ADDRESS_SIZE]);
    Address::new(bytes)
}

impl Bank for TestBank {
    fn send_to_module(
        &mut self,
        from: &Address,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BankError> {
        self.bank.send_to_module(from, module, amount)
    }

    fn send_from_module(
        &mut self,
        module: &str,
        to: &Address,
        amount: &Coin,
    ) -> Result<(), BankError> {
        self.bank.send_from_module(module, to, amount)
    }

    fn module_balance(&self, module: &str, denom: &str) -> Coin {
        self.bank.module_balance(module, denom)
    }
}

impl BondKeeper for TestBank {
    fn bond_owner(&self, bond_id: &str) -> Option<Address> {
        self.bonds.get(bond_id).map(|bond| bond.owner)
    }

    fn transfer_to_module(
        &mut self,
        bond_id: &str,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BondError> {
        let escrow = self
            .bonds
            .get(bond_id)
            .map(|bond| bond.escrow)
            .ok_or_else(|| BondError::NotFound(bond_id.to_string()))?;
        self.bank
            .send_to_module(&escrow, module, amount)
            .map_err(|_| BondError::InsufficientFunds {
                bond_id: bond_id.to_string(),
                needed: amount.clone(),
            })
    }
}

/// Deterministic signing key from a one-byte seed.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_seed([seed; 32])
}

/// Attribute map from literal JSON. Panics on non-object input (tests
/// only).
pub fn attributes(json: serde_json::Value) -> Attributes {
    attributes_from_json(json).expect("test attributes must be a JSON object")
}

/// A payload signed by every given key.
pub fn signed_payload(attributes: &Attributes, keys: &[&SigningKey]) -> Payload {
    let signatures = keys
        .iter()
        .map(|key| sign_payload(attributes, key).expect("test payload signs"))
        .collect();
    Payload::new(attributes.clone(), signatures)
}
