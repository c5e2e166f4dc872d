//! The withdrawal escrow.
//!
//! The escrow's ETH buffer lives in the host's [`EthLedger`] under the
//! escrow's address; this type only keeps payout statistics. Authorization
//! and liquidity checks happen in the host, which can see both the gate and
//! the buffer.
//!
//! [`EthLedger`]: crate::EthLedger

use liquidstake_types::{Address, Result, StakingError, Wei};

/// In-memory escrow.
#[derive(Debug, Clone)]
pub struct Escrow {
    address: Address,
    total_paid_out: Wei,
    payouts: u64,
}

impl Escrow {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            total_paid_out: Wei::ZERO,
            payouts: 0,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Cumulative ETH paid out.
    #[must_use]
    pub fn total_paid_out(&self) -> Wei {
        self.total_paid_out
    }

    /// Number of payouts made.
    #[must_use]
    pub fn payouts(&self) -> u64 {
        self.payouts
    }

    /// Check the buffer can cover `amount`.
    ///
    /// # Errors
    /// Returns `InsufficientLiquidity` if `buffer < amount`.
    pub fn ensure_liquidity(&self, buffer: Wei, amount: Wei) -> Result<()> {
        if buffer < amount {
            return Err(StakingError::InsufficientLiquidity {
                needed: amount,
                available: buffer,
            });
        }
        Ok(())
    }

    /// Record a completed payout.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if the cumulative total would overflow.
    pub fn record_payout(&mut self, amount: Wei) -> Result<()> {
        self.total_paid_out = self
            .total_paid_out
            .checked_add(amount)
            .ok_or_else(|| StakingError::overflow("escrow payouts"))?;
        self.payouts += 1;
        Ok(())
    }
}
