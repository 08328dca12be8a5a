//! Account ledger interface for registration fee payments
//!
//! Provides a small, synchronous interface for moving value between
//! principals. A transfer either completes fully or fails with no change to
//! any balance.

use anyhow::{bail, Result};
use prodreg_types::{Amount, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Interface for payment transfers between principals.
pub trait PaymentLedger: Send + Sync {
    /// Move `amount` from `from` to `to`. Must leave all balances untouched on error.
    fn transfer(&mut self, amount: Amount, from: &Principal, to: &Principal) -> Result<()>;

    /// Current balance of a principal.
    fn balance_of(&self, principal: &Principal) -> Amount;
}

/// A single attempted transfer, as seen by [`MockPaymentLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub amount: Amount,
    pub from: Principal,
    pub to: Principal,
}

// -----------------------------------------------------------------------------
// In-memory implementation (CLI state file, integration tests)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryPaymentLedger {
    balances: BTreeMap<Principal, Amount>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self {
            balances: BTreeMap::new(),
        }
    }

    /// Mint `amount` into a principal's balance.
    pub fn credit(&mut self, principal: &Principal, amount: Amount) {
        let balance = self.balances.entry(principal.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Sum of every balance held by the ledger.
    pub fn total_supply(&self) -> Amount {
        self.balances
            .values()
            .fold(0, |acc, balance| acc.saturating_add(*balance))
    }
}

impl PaymentLedger for InMemoryPaymentLedger {
    fn transfer(&mut self, amount: Amount, from: &Principal, to: &Principal) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        if to.is_null() {
            bail!("cannot transfer to the null principal");
        }

        let available = self.balance_of(from);
        if available < amount {
            bail!("insufficient balance for {from}: have {available}, need {amount}");
        }

        self.balances.insert(from.clone(), available - amount);
        self.credit(to, amount);
        debug!(target: "treasury", %from, %to, amount, "transfer applied");
        Ok(())
    }

    fn balance_of(&self, principal: &Principal) -> Amount {
        self.balances.get(principal).copied().unwrap_or(0)
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (records every transfer for assertions)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MockPaymentLedger {
    transfers: Vec<TransferRecord>,
    fail_next: bool,
}

impl MockPaymentLedger {
    pub fn new() -> Self {
        Self {
            transfers: Vec::new(),
            fail_next: false,
        }
    }

    /// Successful transfers, in call order.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Make the next transfer fail without being recorded.
    pub fn fail_next_transfer(&mut self) {
        self.fail_next = true;
    }
}

impl PaymentLedger for MockPaymentLedger {
    fn transfer(&mut self, amount: Amount, from: &Principal, to: &Principal) -> Result<()> {
        if std::mem::take(&mut self.fail_next) {
            bail!("mock transfer failure");
        }
        self.transfers.push(TransferRecord {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn balance_of(&self, principal: &Principal) -> Amount {
        self.transfers.iter().fold(0, |acc, t| {
            if &t.to == principal {
                acc.saturating_add(t.amount)
            } else {
                acc
            }
        })
    }
}
