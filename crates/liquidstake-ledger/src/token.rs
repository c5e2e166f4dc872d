//! A single fungible token: balances, allowances, and a restricted mint.
//!
//! Minting is a capability, not an inheritance: the token keeps an explicit
//! minter set, only the token admin may extend it, and [`TokenLedger::mint`]
//! checks membership before touching supply.
//!
//! Allowances follow the usual approve/spend model. An allowance of
//! [`Wei::MAX`] is unlimited and is never decremented.

use std::collections::{HashMap, HashSet};

use liquidstake_types::{Address, Result, StakingError, Wei, constants};

/// Role name of the mint capability, as reported in `MissingRole` errors.
pub const MINTER_ROLE: &str = "MINTER_ROLE";

/// Role name of the token administrator.
pub const ADMIN_ROLE: &str = "DEFAULT_ADMIN_ROLE";

/// Ledger of one token.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    address: Address,
    symbol: String,
    decimals: u32,
    /// May grant the mint capability.
    admin: Address,
    minters: HashSet<Address>,
    /// Transfers require both parties to pass the host's access gate.
    restricted: bool,
    balances: HashMap<Address, Wei>,
    allowances: HashMap<(Address, Address), Wei>,
    total_supply: Wei,
}

impl TokenLedger {
    /// A new token with zero supply and no minters.
    #[must_use]
    pub fn new(address: Address, symbol: impl Into<String>, admin: Address) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals: constants::ETHER_DECIMALS,
            admin,
            minters: HashSet::new(),
            restricted: false,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: Wei::ZERO,
        }
    }

    /// Gate every transfer of this token through the host's whitelist.
    #[must_use]
    pub fn with_restricted_transfers(mut self) -> Self {
        self.restricted = true;
        self
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    #[must_use]
    pub fn is_minter(&self, account: &Address) -> bool {
        self.minters.contains(account)
    }

    /// Grant the mint capability. Only the admin may do this.
    ///
    /// # Errors
    /// Returns `MissingRole` if `caller` is not the admin.
    pub fn grant_minter(&mut self, caller: &Address, account: Address) -> Result<()> {
        if *caller != self.admin {
            return Err(StakingError::MissingRole {
                role: ADMIN_ROLE.to_string(),
                account: *caller,
            });
        }
        self.minters.insert(account);
        Ok(())
    }

    /// Create new tokens.
    ///
    /// # Errors
    /// - `MissingRole` if `minter` lacks the mint capability (checked first)
    /// - `InvalidAmount` if supply or the balance would overflow
    pub fn mint(&mut self, minter: &Address, to: &Address, amount: Wei) -> Result<()> {
        if !self.is_minter(minter) {
            return Err(StakingError::MissingRole {
                role: MINTER_ROLE.to_string(),
                account: *minter,
            });
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("total supply"))?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("token balance"))?;

        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s tokens, replacing any
    /// previous value.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Wei) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Move tokens between holders.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()> {
        let available = self.balance_of(from);
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
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("token balance"))?;

        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }

    /// Destroy `from`'s tokens on behalf of `spender`.
    ///
    /// The allowance is checked before the balance, so a spender with no
    /// approval learns nothing about the holder's balance.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if `spender` was approved for less than `amount`
    /// - `InsufficientBalance` if `from` holds less than `amount`
    pub fn burn_from(&mut self, spender: &Address, from: &Address, amount: Wei) -> Result<()> {
        let approved = self.allowance(from, spender);
        let remaining = if approved == Wei::MAX {
            Wei::MAX
        } else {
            approved
                .checked_sub(amount)
                .ok_or(StakingError::InsufficientAllowance {
                    needed: amount,
                    available: approved,
                })?
        };

        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or_else(|| StakingError::Internal("burn exceeds total supply".to_string()))?;

        self.allowances.insert((*from, *spender), remaining);
        self.balances.insert(*from, debited);
        self.total_supply = supply;
        Ok(())
    }

    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> Wei {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Wei {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_supply(&self) -> Wei {
        self.total_supply
    }

    /// Number of addresses with a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }
}
