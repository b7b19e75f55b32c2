//! Test fixtures shared by auction tests and downstream crates.

use std::collections::BTreeMap;

use lib_types::{Address, Coin};

use crate::bank::{Bank, BankError};

/// In-memory bank double tracking user accounts and module accounts.
///
/// Conservation holds by construction: every transfer moves an amount from
/// one map entry to another.
#[derive(Debug, Clone, Default)]
pub struct MemBank {
    accounts: BTreeMap<Address, BTreeMap<String, u128>>,
    modules: BTreeMap<String, BTreeMap<String, u128>>,
}

impl MemBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a user account out of thin air (test setup only).
    pub fn fund(&mut self, account: Address, amount: Coin) {
        *self
            .accounts
            .entry(account)
            .or_default()
            .entry(amount.denom)
            .or_insert(0) += amount.amount;
    }

    pub fn account_balance(&self, account: &Address, denom: &str) -> Coin {
        let amount = self
            .accounts
            .get(account)
            .and_then(|balances| balances.get(denom))
            .copied()
            .unwrap_or(0);
        Coin::new(denom, amount)
    }

    /// Sum of one denom across all user and module accounts.
    pub fn total_supply(&self, denom: &str) -> u128 {
        let users: u128 = self
            .accounts
            .values()
            .filter_map(|balances| balances.get(denom))
            .sum();
        let modules: u128 = self
            .modules
            .values()
            .filter_map(|balances| balances.get(denom))
            .sum();
        users + modules
    }
}

impl Bank for MemBank {
    fn send_to_module(
        &mut self,
        from: &Address,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BankError> {
        let balance = self
            .accounts
            .entry(*from)
            .or_default()
            .entry(amount.denom.clone())
            .or_insert(0);
        if *balance < amount.amount {
            return Err(BankError::InsufficientFunds {
                account: from.to_string(),
                needed: amount.clone(),
            });
        }
        *balance -= amount.amount;
        *self
            .modules
            .entry(module.to_string())
            .or_default()
            .entry(amount.denom.clone())
            .or_insert(0) += amount.amount;
        Ok(())
    }

    fn send_from_module(
        &mut self,
        module: &str,
        to: &Address,
        amount: &Coin,
    ) -> Result<(), BankError> {
        let balance = self
            .modules
            .entry(module.to_string())
            .or_default()
            .entry(amount.denom.clone())
            .or_insert(0);
        if *balance < amount.amount {
            return Err(BankError::InsufficientFunds {
                account: module.to_string(),
                needed: amount.clone(),
            });
        }
        *balance -= amount.amount;
        *self
            .accounts
            .entry(*to)
            .or_default()
            .entry(amount.denom.clone())
            .or_insert(0) += amount.amount;
        Ok(())
    }

    fn module_balance(&self, module: &str, denom: &str) -> Coin {
        let amount = self
            .modules
            .get(module)
            .and_then(|balances| balances.get(denom))
            .copied()
            .unwrap_or(0);
        Coin::new(denom, amount)
    }
}

/// Deterministic test address.
pub fn test_address(id: u8) -> Address {
    Address::new([id; 20])
}
