//! Governance-controlled whitelist.
//!
//! Entries are toggled only by the governance principal. Everything that
//! moves pool-receipt tokens or escrow ETH consults it through
//! [`AccessGate`].

use std::collections::HashMap;

use liquidstake_types::{AccessGate, Address, Result, StakingError};

/// Address → approved map with a single privileged governor.
#[derive(Debug, Clone)]
pub struct WhitelistManager {
    address: Address,
    governor: Address,
    entries: HashMap<Address, bool>,
}

impl WhitelistManager {
    /// An empty whitelist deployed at `address`, controlled by `governor`.
    #[must_use]
    pub fn new(address: Address, governor: Address) -> Self {
        Self {
            address,
            governor,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn governor(&self) -> Address {
        self.governor
    }

    /// Approve or revoke `account`.
    ///
    /// # Errors
    /// Returns `AccessDenied(caller)` unless `caller` is the governor.
    pub fn update_white_list(
        &mut self,
        caller: &Address,
        account: Address,
        approved: bool,
    ) -> Result<()> {
        if *caller != self.governor {
            return Err(StakingError::AccessDenied(*caller));
        }
        self.entries.insert(account, approved);
        Ok(())
    }

    /// Number of currently approved accounts.
    #[must_use]
    pub fn approved_count(&self) -> usize {
        self.entries.values().filter(|approved| **approved).count()
    }
}

impl AccessGate for WhitelistManager {
    fn is_whitelisted(&self, account: &Address) -> bool {
        self.entries.get(account).copied().unwrap_or(false)
    }
}
