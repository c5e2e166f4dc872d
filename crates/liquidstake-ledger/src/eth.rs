//! Native ETH balances.
//!
//! All mutations are atomic: either the full transfer succeeds or both
//! balances are unchanged.

use std::collections::HashMap;

use liquidstake_types::{Address, Result, StakingError, Wei};

/// Per-address native ETH balances.
#[derive(Debug, Clone, Default)]
pub struct EthLedger {
    balances: HashMap<Address, Wei>,
}

impl EthLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Genesis credit: create ETH out of thin air for `account`.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if the balance would overflow.
    pub fn fund(&mut self, account: Address, amount: Wei) -> Result<()> {
        let entry = self.balances.entry(account).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("ETH balance"))?;
        Ok(())
    }

    /// Move ETH between accounts.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()> {
        let available = self.balance(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("ETH balance"))?;

        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }

    /// Balance of `account` (zero if never funded).
    #[must_use]
    pub fn balance(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Sum of every balance.
    #[must_use]
    pub fn total(&self) -> Wei {
        self.balances.values().copied().sum()
    }
}
