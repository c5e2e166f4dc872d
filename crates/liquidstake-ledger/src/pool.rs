//! The staking pool.
//!
//! Accepts ETH and issues its receipt token 1:1. Yield accrual is out of
//! scope; the pool only tracks cumulative principal and whether it is
//! currently accepting deposits.

use liquidstake_types::{Address, Result, StakingError, Wei};

/// In-memory staking pool.
#[derive(Debug, Clone)]
pub struct StakingPool {
    address: Address,
    receipt_token: Address,
    paused: bool,
    total_deposited: Wei,
}

impl StakingPool {
    #[must_use]
    pub fn new(address: Address, receipt_token: Address) -> Self {
        Self {
            address,
            receipt_token,
            paused: false,
            total_deposited: Wei::ZERO,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn receipt_token(&self) -> Address {
        self.receipt_token
    }

    /// Stop (or resume) accepting deposits.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn total_deposited(&self) -> Wei {
        self.total_deposited
    }

    /// Record a deposit and return the receipt amount to mint.
    ///
    /// # Errors
    /// - `ExternalCallFailure` if the pool is paused
    /// - `InvalidAmount` for a zero deposit or an overflowing total
    pub fn accept(&mut self, value: Wei) -> Result<Wei> {
        if self.paused {
            return Err(StakingError::ExternalCallFailure {
                target: self.address,
                reason: "pool is paused".to_string(),
            });
        }
        if value.is_zero() {
            return Err(StakingError::InvalidAmount {
                reason: "pool deposit must be positive".to_string(),
            });
        }
        self.total_deposited = self
            .total_deposited
            .checked_add(value)
            .ok_or_else(|| StakingError::overflow("pool deposits"))?;
        // Receipt tokens are issued 1:1.
        Ok(value)
    }
}
