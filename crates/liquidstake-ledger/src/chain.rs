//! The in-memory host.
//!
//! [`Chain`] owns every external ledger the orchestrator talks to and
//! implements [`Host`] over them. Transactions are snapshot-based: the whole
//! chain is cloned before `f` runs and restored if `f` fails, so no partial
//! effect (balances, supply, allowances, events) ever survives an error.
//!
//! The access gate is a type parameter so the governance whitelist can be
//! swapped for [`OpenGate`](liquidstake_types::OpenGate) in tests.

use std::collections::HashMap;

use liquidstake_types::{
    AccessGate, Address, EscrowAdapter, FungibleLedger, Host, LedgerEvent, NativeLedger,
    PoolAdapter, Result, StakingError, Wei,
};

use crate::{
    escrow::Escrow,
    eth::EthLedger,
    pool::StakingPool,
    token::{MINTER_ROLE, TokenLedger},
    whitelist::WhitelistManager,
};

/// World state: ETH, tokens, pools, escrows, the access gate, and the
/// committed event log.
#[derive(Debug, Clone)]
pub struct Chain<G = WhitelistManager> {
    eth: EthLedger,
    tokens: HashMap<Address, TokenLedger>,
    pools: HashMap<Address, StakingPool>,
    escrows: HashMap<Address, Escrow>,
    gate: G,
    events: Vec<LedgerEvent>,
}

impl<G: AccessGate + Clone> Chain<G> {
    /// An empty chain guarded by `gate`.
    #[must_use]
    pub fn new(gate: G) -> Self {
        Self {
            eth: EthLedger::new(),
            tokens: HashMap::new(),
            pools: HashMap::new(),
            escrows: HashMap::new(),
            gate,
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Deployment
    // -----------------------------------------------------------------

    /// Deploy a token contract at its own address.
    ///
    /// # Errors
    /// Returns `Configuration` if the address is already occupied.
    pub fn deploy_token(&mut self, token: TokenLedger) -> Result<Address> {
        let address = token.address();
        self.ensure_vacant(&address)?;
        tracing::info!(
            token = %address,
            symbol = token.symbol(),
            restricted = token.is_restricted(),
            "Token deployed"
        );
        self.tokens.insert(address, token);
        Ok(address)
    }

    /// Deploy a staking pool. Its receipt token must already be deployed and
    /// must already have granted the pool the mint capability.
    ///
    /// # Errors
    /// - `UnknownContract` if the receipt token is not deployed
    /// - `Configuration` if the address is occupied or the pool cannot mint
    pub fn deploy_pool(&mut self, pool: StakingPool) -> Result<Address> {
        let address = pool.address();
        self.ensure_vacant(&address)?;
        let receipt = self.token(&pool.receipt_token())?;
        if !receipt.is_minter(&address) {
            return Err(StakingError::Configuration(format!(
                "pool {address} cannot mint its receipt token {}",
                receipt.address()
            )));
        }
        tracing::info!(pool = %address, receipt_token = %pool.receipt_token(), "Pool deployed");
        self.pools.insert(address, pool);
        Ok(address)
    }

    /// Deploy an escrow.
    ///
    /// # Errors
    /// Returns `Configuration` if the address is already occupied.
    pub fn deploy_escrow(&mut self, escrow: Escrow) -> Result<Address> {
        let address = escrow.address();
        self.ensure_vacant(&address)?;
        tracing::info!(escrow = %address, "Escrow deployed");
        self.escrows.insert(address, escrow);
        Ok(address)
    }

    fn ensure_vacant(&self, address: &Address) -> Result<()> {
        if address.is_zero()
            || self.tokens.contains_key(address)
            || self.pools.contains_key(address)
            || self.escrows.contains_key(address)
        {
            return Err(StakingError::Configuration(format!(
                "address {address} is zero or already occupied"
            )));
        }
        Ok(())
    }

    /// Genesis credit of ETH. Not recorded as an event.
    ///
    /// # Errors
    /// Returns `InvalidAmount` on overflow.
    pub fn fund(&mut self, account: Address, amount: Wei) -> Result<()> {
        self.eth.fund(account, amount)
    }

    /// Grant the mint capability on `token`. `caller` must be its admin.
    pub fn grant_minter(
        &mut self,
        token: &Address,
        caller: &Address,
        account: Address,
    ) -> Result<()> {
        self.token_mut(token)?.grant_minter(caller, account)?;
        self.events.push(LedgerEvent::RoleGranted {
            token: *token,
            role: MINTER_ROLE.to_string(),
            account,
        });
        Ok(())
    }

    // -----------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------

    /// The token deployed at `address`.
    pub fn token(&self, address: &Address) -> Result<&TokenLedger> {
        self.tokens
            .get(address)
            .ok_or(StakingError::UnknownContract(*address))
    }

    fn token_mut(&mut self, address: &Address) -> Result<&mut TokenLedger> {
        self.tokens
            .get_mut(address)
            .ok_or(StakingError::UnknownContract(*address))
    }

    /// The pool deployed at `address`.
    pub fn pool(&self, address: &Address) -> Result<&StakingPool> {
        self.pools
            .get(address)
            .ok_or(StakingError::UnknownContract(*address))
    }

    /// Mutable pool access, e.g. to pause deposits.
    pub fn pool_mut(&mut self, address: &Address) -> Result<&mut StakingPool> {
        self.pools
            .get_mut(address)
            .ok_or(StakingError::UnknownContract(*address))
    }

    /// The escrow deployed at `address`.
    pub fn escrow(&self, address: &Address) -> Result<&Escrow> {
        self.escrows
            .get(address)
            .ok_or(StakingError::UnknownContract(*address))
    }

    #[must_use]
    pub fn eth(&self) -> &EthLedger {
        &self.eth
    }

    #[must_use]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Every committed event, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Events committed after the first `from` events.
    #[must_use]
    pub fn events_since(&self, from: usize) -> &[LedgerEvent] {
        self.events.get(from..).unwrap_or_default()
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Snapshot, run, restore on error.
    fn guarded<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn require_whitelisted(&self, account: &Address) -> Result<()> {
        if self.gate.is_whitelisted(account) {
            Ok(())
        } else {
            tracing::debug!(account = %account, "Access gate rejected participant");
            Err(StakingError::AccessDenied(*account))
        }
    }
}

impl Chain<WhitelistManager> {
    /// Governance toggle of a whitelist entry.
    ///
    /// # Errors
    /// Returns `AccessDenied(caller)` unless `caller` is the governor.
    pub fn update_white_list(
        &mut self,
        caller: &Address,
        account: Address,
        approved: bool,
    ) -> Result<()> {
        self.gate.update_white_list(caller, account, approved)?;
        tracing::info!(account = %account, approved, "Whitelist updated");
        self.events
            .push(LedgerEvent::WhitelistUpdated { account, approved });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Adapter implementations
// ---------------------------------------------------------------------------

impl<G: AccessGate> AccessGate for Chain<G> {
    fn is_whitelisted(&self, account: &Address) -> bool {
        self.gate.is_whitelisted(account)
    }
}

impl<G: AccessGate + Clone> NativeLedger for Chain<G> {
    fn eth_balance(&self, account: &Address) -> Wei {
        self.eth.balance(account)
    }

    fn transfer_eth(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()> {
        self.eth.transfer(from, to, amount)?;
        self.events.push(LedgerEvent::EthTransfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}

impl<G: AccessGate + Clone> PoolAdapter for Chain<G> {
    fn pool_deposit(&mut self, pool: &Address, depositor: &Address, value: Wei) -> Result<Wei> {
        self.guarded(|chain| {
            chain.require_whitelisted(depositor)?;
            let (minted, receipt_token) = {
                let p = chain
                    .pools
                    .get_mut(pool)
                    .ok_or(StakingError::UnknownContract(*pool))?;
                (p.accept(value)?, p.receipt_token())
            };

            chain.transfer_eth(depositor, pool, value)?;
            chain.token_mut(&receipt_token)?.mint(pool, depositor, minted)?;
            chain.events.push(LedgerEvent::Mint {
                token: receipt_token,
                to: *depositor,
                amount: minted,
            });
            chain.events.push(LedgerEvent::PoolDeposit {
                pool: *pool,
                depositor: *depositor,
                value,
                minted,
            });
            tracing::debug!(
                pool = %pool,
                depositor = %depositor,
                value = %value,
                minted = %minted,
                "Pool deposit accepted"
            );
            Ok(minted)
        })
    }
}

impl<G: AccessGate + Clone> EscrowAdapter for Chain<G> {
    fn escrow_liquidity(&self, escrow: &Address) -> Result<Wei> {
        self.escrow(escrow)?;
        Ok(self.eth.balance(escrow))
    }

    fn escrow_payout(
        &mut self,
        escrow: &Address,
        caller: &Address,
        beneficiary: &Address,
        amount: Wei,
    ) -> Result<()> {
        self.guarded(|chain| {
            chain.escrow(escrow)?;
            chain.require_whitelisted(escrow)?;
            chain.require_whitelisted(caller)?;

            let buffer = chain.eth.balance(escrow);
            chain.escrow(escrow)?.ensure_liquidity(buffer, amount)?;
            chain.transfer_eth(escrow, beneficiary, amount)?;

            chain
                .escrows
                .get_mut(escrow)
                .ok_or(StakingError::UnknownContract(*escrow))?
                .record_payout(amount)?;
            chain.events.push(LedgerEvent::EscrowPayout {
                escrow: *escrow,
                caller: *caller,
                beneficiary: *beneficiary,
                amount,
            });
            tracing::debug!(
                escrow = %escrow,
                beneficiary = %beneficiary,
                amount = %amount,
                "Escrow payout"
            );
            Ok(())
        })
    }
}

impl<G: AccessGate + Clone> FungibleLedger for Chain<G> {
    fn balance_of(&self, token: &Address, holder: &Address) -> Result<Wei> {
        Ok(self.token(token)?.balance_of(holder))
    }

    fn total_supply(&self, token: &Address) -> Result<Wei> {
        Ok(self.token(token)?.total_supply())
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Result<Wei> {
        Ok(self.token(token)?.allowance(owner, spender))
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Wei,
    ) -> Result<()> {
        if self.token(token)?.is_restricted() {
            self.require_whitelisted(from)?;
            self.require_whitelisted(to)?;
        }
        self.token_mut(token)?.transfer(from, to, amount)?;
        self.events.push(LedgerEvent::Transfer {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn approve(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: Wei,
    ) -> Result<()> {
        self.token_mut(token)?.approve(owner, spender, amount);
        self.events.push(LedgerEvent::Approval {
            token: *token,
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    fn mint(&mut self, token: &Address, minter: &Address, to: &Address, amount: Wei) -> Result<()> {
        self.token_mut(token)?.mint(minter, to, amount)?;
        self.events.push(LedgerEvent::Mint {
            token: *token,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn burn_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        amount: Wei,
    ) -> Result<()> {
        self.token_mut(token)?.burn_from(spender, from, amount)?;
        self.events.push(LedgerEvent::Burn {
            token: *token,
            from: *from,
            amount,
        });
        Ok(())
    }
}

impl<G: AccessGate + Clone> Host for Chain<G> {
    fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let events_before = self.events.len();
        let result = self.guarded(f);
        match &result {
            Ok(_) => tracing::debug!(
                events = self.events.len() - events_before,
                "Transaction committed"
            ),
            Err(err) => tracing::warn!(
                code = err.code(),
                error = %err,
                "Transaction reverted"
            ),
        }
        result
    }
}
