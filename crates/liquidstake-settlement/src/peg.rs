//! Peg invariant checks.
//!
//! Mathematical invariant enforced at every settled state:
//! ```text
//! totalSupply(public) == custody == Σ(staked) - Σ(redeemed)
//! ```
//!
//! The orchestrator checks the per-transaction form (both sides moved by
//! exactly the settled amount) inside every transaction. [`PegMonitor`]
//! checks the cumulative form from the outside, across a whole session of
//! receipts.

use liquidstake_types::{
    FungibleLedger, OrchestratorConfig, Result, SettlementKind, SettlementReceipt, StakingError,
    Wei,
};

/// Fail unless `supply == custody`.
pub fn ensure_pegged(supply: Wei, custody: Wei) -> Result<()> {
    if supply != custody {
        return Err(StakingError::PegViolation {
            reason: format!("public supply {supply} != custody {custody}"),
        });
    }
    Ok(())
}

/// Fail unless `after == before + amount`.
pub fn ensure_credited(what: &str, before: Wei, after: Wei, amount: Wei) -> Result<()> {
    let expected = before
        .checked_add(amount)
        .ok_or_else(|| StakingError::overflow(what))?;
    if after != expected {
        return Err(StakingError::PegViolation {
            reason: format!("{what} moved from {before} to {after}, expected {expected}"),
        });
    }
    Ok(())
}

/// Fail unless `after == before - amount`.
pub fn ensure_debited(what: &str, before: Wei, after: Wei, amount: Wei) -> Result<()> {
    let expected = before
        .checked_sub(amount)
        .ok_or_else(|| StakingError::PegViolation {
            reason: format!("{what} {before} cannot cover debit of {amount}"),
        })?;
    if after != expected {
        return Err(StakingError::PegViolation {
            reason: format!("{what} moved from {before} to {after}, expected {expected}"),
        });
    }
    Ok(())
}

/// Fail unless a balance returned to its baseline.
pub fn ensure_unchanged(what: &str, before: Wei, after: Wei) -> Result<()> {
    if before != after {
        return Err(StakingError::PegViolation {
            reason: format!("{what} drifted from {before} to {after}"),
        });
    }
    Ok(())
}

/// Tracks cumulative staked / redeemed principal from settlement receipts
/// and validates the peg against live ledger state.
#[derive(Debug, Clone, Default)]
pub struct PegMonitor {
    staked: Wei,
    redeemed: Wei,
    settlements: usize,
}

impl PegMonitor {
    /// Create a new monitor for a freshly deployed orchestrator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a committed settlement into the running totals.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if a running total would overflow, or
    /// `PegViolation` if the receipt itself records an unpegged state.
    pub fn record(&mut self, receipt: &SettlementReceipt) -> Result<()> {
        match receipt.kind {
            SettlementKind::Stake => {
                self.staked = self
                    .staked
                    .checked_add(receipt.amount)
                    .ok_or_else(|| StakingError::overflow("total staked"))?;
            }
            SettlementKind::Request => {
                self.redeemed = self
                    .redeemed
                    .checked_add(receipt.amount)
                    .ok_or_else(|| StakingError::overflow("total redeemed"))?;
            }
        }
        self.settlements += 1;
        ensure_pegged(receipt.supply_after, receipt.custody_after)
    }

    /// Expected public supply: staked - redeemed.
    ///
    /// # Errors
    /// Returns `PegViolation` if more was redeemed than ever staked.
    pub fn expected_supply(&self) -> Result<Wei> {
        self.staked
            .checked_sub(self.redeemed)
            .ok_or_else(|| StakingError::PegViolation {
                reason: format!(
                    "redeemed {} exceeds staked {}",
                    self.redeemed, self.staked
                ),
            })
    }

    /// Verify live supply and custody against each other and against the
    /// recorded history.
    ///
    /// # Errors
    /// Returns `PegViolation` describing the first mismatch.
    pub fn verify<L: FungibleLedger>(&self, ledger: &L, config: &OrchestratorConfig) -> Result<()> {
        let supply = ledger.total_supply(&config.public_token)?;
        let custody = ledger.balance_of(&config.pool_receipt_token, &config.client)?;
        ensure_pegged(supply, custody)?;

        let expected = self.expected_supply()?;
        if supply != expected {
            return Err(StakingError::PegViolation {
                reason: format!(
                    "public supply {supply} != expected {expected} \
                     (staked={}, redeemed={})",
                    self.staked, self.redeemed
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_staked(&self) -> Wei {
        self.staked
    }

    #[must_use]
    pub fn total_redeemed(&self) -> Wei {
        self.redeemed
    }

    /// Number of receipts recorded.
    #[must_use]
    pub fn settlements(&self) -> usize {
        self.settlements
    }
}
