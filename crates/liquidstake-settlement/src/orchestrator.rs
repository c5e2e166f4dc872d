//! The staking orchestrator.
//!
//! Holds nothing but its configuration. Every operation reads the
//! collaborators' state through the [`Host`], applies the minimal set of
//! transfers / mints / burns, and re-checks the peg, all inside one host
//! transaction. If any step fails, the host restores the pre-call state.

use chrono::Utc;
use liquidstake_types::{
    Address, Host, OrchestratorConfig, Result, SettlementId, SettlementKind, SettlementReceipt,
    StakingError, Wei, constants,
};

use crate::peg;

/// Orchestrates `stake` and `request` as atomic settlements.
#[derive(Debug, Clone)]
pub struct StakingOrchestrator {
    config: OrchestratorConfig,
}

/// Orchestrator-side balances read at the start and end of a settlement.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    custody: Wei,
    supply: Wei,
    eth: Wei,
}

impl StakingOrchestrator {
    /// Bind an orchestrator to its collaborators.
    ///
    /// # Errors
    /// Returns `Configuration` if the config has zero or duplicate addresses.
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            client = %config.client,
            pool = %config.pool,
            escrow = %config.escrow,
            pool_receipt_token = %config.pool_receipt_token,
            public_token = %config.public_token,
            "Orchestrator bound"
        );
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The orchestrator's own address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.config.client
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Pool-receipt tokens held in custody.
    pub fn custody_balance<H: Host>(&self, host: &H) -> Result<Wei> {
        host.balance_of(&self.config.pool_receipt_token, &self.config.client)
    }

    /// Circulating public token supply.
    pub fn total_supply<H: Host>(&self, host: &H) -> Result<Wei> {
        host.total_supply(&self.config.public_token)
    }

    /// Fail unless custody equals public supply.
    pub fn check_peg<H: Host>(&self, host: &H) -> Result<()> {
        peg::ensure_pegged(self.total_supply(host)?, self.custody_balance(host)?)
    }

    // -----------------------------------------------------------------
    // stake
    // -----------------------------------------------------------------

    /// Stake `value` ETH supplied by `caller`.
    ///
    /// Forwards the ETH to the pool, keeps the pool-receipt tokens in
    /// custody, and mints `value` public tokens to `caller`.
    ///
    /// # Errors
    /// - `InvalidAmount` for a zero value or overflowing accounting
    /// - `AccessDenied` if the orchestrator is not whitelisted
    /// - `InsufficientBalance` if `caller` cannot supply `value`
    /// - `ExternalCallFailure` if the pool rejects the deposit
    /// - `PegViolation` if custody and supply did not both grow by `value`
    pub fn stake<H: Host>(
        &self,
        host: &mut H,
        caller: &Address,
        value: Wei,
    ) -> Result<SettlementReceipt> {
        let result = self
            .preflight_stake(host, caller, value)
            .and_then(|()| host.atomically(|h| self.settle_stake(h, caller, value)));
        log_outcome(SettlementKind::Stake, caller, value, &result);
        result
    }

    fn preflight_stake<H: Host>(&self, host: &H, caller: &Address, value: Wei) -> Result<()> {
        ensure_positive(value)?;
        ensure_whitelisted(host, &self.config.client)?;
        let available = host.eth_balance(caller);
        if available < value {
            return Err(StakingError::InsufficientBalance {
                needed: value,
                available,
            });
        }
        Ok(())
    }

    fn settle_stake<H: Host>(
        &self,
        host: &mut H,
        caller: &Address,
        value: Wei,
    ) -> Result<SettlementReceipt> {
        let cfg = &self.config;
        let before = self.snapshot(host)?;

        // Call value: the caller pays the orchestrator.
        host.transfer_eth(caller, &cfg.client, value)?;

        let minted = host.pool_deposit(&cfg.pool, &cfg.client, value)?;
        tracing::debug!(caller = %caller, value = %value, minted = %minted, "Deposited into pool");
        if minted != value {
            return Err(StakingError::PegViolation {
                reason: format!("pool issued {minted} receipt tokens for {value}"),
            });
        }

        host.mint(&cfg.public_token, &cfg.client, caller, value)?;
        tracing::debug!(caller = %caller, amount = %value, "Public token minted");

        let after = self.snapshot(host)?;
        peg::ensure_credited("custody", before.custody, after.custody, value)?;
        peg::ensure_credited("public supply", before.supply, after.supply, value)?;
        peg::ensure_unchanged("orchestrator ETH", before.eth, after.eth)?;

        Ok(receipt(SettlementKind::Stake, caller, value, after))
    }

    // -----------------------------------------------------------------
    // request
    // -----------------------------------------------------------------

    /// Redeem `amount` public tokens held by `caller` for ETH from the
    /// escrow buffer.
    ///
    /// Ordered sub-steps: burn the caller's tokens via allowance, have the
    /// escrow pay the caller, then move `amount` of custody to the escrow.
    ///
    /// # Errors
    /// - `InvalidAmount` for a zero amount
    /// - `AccessDenied` if the orchestrator or escrow is not whitelisted
    /// - `InsufficientAllowance` if `caller` approved less than `amount`
    /// - `InsufficientBalance` if `caller` holds less than `amount`
    /// - `InsufficientLiquidity` if the escrow buffer cannot cover `amount`
    /// - `PegViolation` if custody cannot cover `amount` or the deltas drift
    pub fn request<H: Host>(
        &self,
        host: &mut H,
        caller: &Address,
        amount: Wei,
    ) -> Result<SettlementReceipt> {
        let result = self
            .preflight_request(host, caller, amount)
            .and_then(|()| host.atomically(|h| self.settle_request(h, caller, amount)));
        log_outcome(SettlementKind::Request, caller, amount, &result);
        result
    }

    fn preflight_request<H: Host>(&self, host: &H, caller: &Address, amount: Wei) -> Result<()> {
        let cfg = &self.config;
        ensure_positive(amount)?;
        ensure_whitelisted(host, &cfg.client)?;
        ensure_whitelisted(host, &cfg.escrow)?;

        let approved = host.allowance(&cfg.public_token, caller, &cfg.client)?;
        if approved < amount {
            return Err(StakingError::InsufficientAllowance {
                needed: amount,
                available: approved,
            });
        }

        let held = host.balance_of(&cfg.public_token, caller)?;
        if held < amount {
            return Err(StakingError::InsufficientBalance {
                needed: amount,
                available: held,
            });
        }

        let buffer = host.escrow_liquidity(&cfg.escrow)?;
        if buffer < amount {
            return Err(StakingError::InsufficientLiquidity {
                needed: amount,
                available: buffer,
            });
        }

        let custody = self.custody_balance(host)?;
        if custody < amount {
            return Err(StakingError::PegViolation {
                reason: format!("custody {custody} cannot back redemption of {amount}"),
            });
        }
        Ok(())
    }

    fn settle_request<H: Host>(
        &self,
        host: &mut H,
        caller: &Address,
        amount: Wei,
    ) -> Result<SettlementReceipt> {
        let cfg = &self.config;
        let before = self.snapshot(host)?;

        // (a) burn
        host.burn_from(&cfg.public_token, &cfg.client, caller, amount)?;
        tracing::debug!(caller = %caller, amount = %amount, "Public token burned");

        // (b) payout
        host.escrow_payout(&cfg.escrow, &cfg.client, caller, amount)?;
        tracing::debug!(caller = %caller, amount = %amount, "Escrow paid out");

        // (c) compensate the escrow
        host.transfer(&cfg.pool_receipt_token, &cfg.client, &cfg.escrow, amount)?;
        tracing::debug!(escrow = %cfg.escrow, amount = %amount, "Custody moved to escrow");

        let after = self.snapshot(host)?;
        peg::ensure_debited("custody", before.custody, after.custody, amount)?;
        peg::ensure_debited("public supply", before.supply, after.supply, amount)?;
        peg::ensure_unchanged("orchestrator ETH", before.eth, after.eth)?;

        Ok(receipt(SettlementKind::Request, caller, amount, after))
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn snapshot<H: Host>(&self, host: &H) -> Result<Snapshot> {
        Ok(Snapshot {
            custody: self.custody_balance(host)?,
            supply: self.total_supply(host)?,
            eth: host.eth_balance(&self.config.client),
        })
    }
}

fn ensure_positive(amount: Wei) -> Result<()> {
    if amount.is_zero() {
        return Err(StakingError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn ensure_whitelisted<H: Host>(host: &H, account: &Address) -> Result<()> {
    if host.is_whitelisted(account) {
        Ok(())
    } else {
        Err(StakingError::AccessDenied(*account))
    }
}

fn receipt(
    kind: SettlementKind,
    account: &Address,
    amount: Wei,
    after: Snapshot,
) -> SettlementReceipt {
    SettlementReceipt {
        id: SettlementId::new(),
        kind,
        account: *account,
        amount,
        custody_after: after.custody,
        supply_after: after.supply,
        settled_at: Utc::now(),
    }
}

fn log_outcome(
    kind: SettlementKind,
    caller: &Address,
    amount: Wei,
    result: &Result<SettlementReceipt>,
) {
    match result {
        Ok(receipt) => tracing::info!(
            settlement = %receipt.id,
            kind = %kind,
            caller = %caller,
            amount_eth = amount.as_ether_f64(),
            custody = %receipt.custody_after,
            supply = %receipt.supply_after,
            "Settlement committed"
        ),
        Err(err) => tracing::warn!(
            kind = %kind,
            caller = %caller,
            amount = %amount,
            code = err.code(),
            error = %err,
            "Settlement rejected"
        ),
    }
}
