//! Integer amounts in the smallest ETH unit.
//!
//! Ledger arithmetic is exact: every balance, supply and allowance is a
//! [`Wei`] and every mutation goes through `checked_add` / `checked_sub`.
//! `rust_decimal` only appears at the edge, converting to and from
//! human-facing ether values (`"0.5"` ETH ⇄ `500_000_000_000_000_000` wei).

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Result, StakingError, constants};

/// An amount of ETH or of an 18-decimal token, in wei.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Self = Self(0);

    /// Largest representable amount. As an allowance it means "unlimited".
    pub const MAX: Self = Self(u128::MAX);

    /// Exactly one ether.
    pub const ONE_ETHER: Self = Self(constants::WEI_PER_ETHER);

    #[must_use]
    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    #[must_use]
    pub const fn get(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Whole ether, e.g. `Wei::ether(5)`.
    ///
    /// # Panics
    /// Panics if the result does not fit in 128 bits.
    #[must_use]
    pub const fn ether(whole: u64) -> Self {
        match (whole as u128).checked_mul(constants::WEI_PER_ETHER) {
            Some(wei) => Self(wei),
            None => panic!("ether amount overflows u128"),
        }
    }

    /// Convert a decimal ether amount to wei.
    ///
    /// # Errors
    /// Returns [`StakingError::InvalidAmount`] if `ether` is negative, has more
    /// than 18 fractional digits, or does not fit in 128 bits.
    pub fn from_ether(ether: Decimal) -> Result<Self> {
        if ether.is_sign_negative() && !ether.is_zero() {
            return Err(StakingError::InvalidAmount {
                reason: format!("negative ether amount {ether}"),
            });
        }
        if ether.scale() > constants::ETHER_DECIMALS {
            return Err(StakingError::InvalidAmount {
                reason: format!("{ether} has more than {} decimals", constants::ETHER_DECIMALS),
            });
        }
        // Scale the mantissa up to 18 decimals; avoids Decimal's 28-digit ceiling.
        let mantissa = ether.mantissa().unsigned_abs();
        let shift = 10u128.pow(constants::ETHER_DECIMALS - ether.scale());
        mantissa
            .checked_mul(shift)
            .map(Self)
            .ok_or_else(|| StakingError::InvalidAmount {
                reason: format!("{ether} ETH overflows wei range"),
            })
    }

    /// Parse a decimal ether string such as `"0.5"`.
    ///
    /// # Errors
    /// Returns [`StakingError::InvalidAmount`] if the string is not a valid
    /// non-negative decimal within range.
    pub fn parse_ether(s: &str) -> Result<Self> {
        let ether: Decimal = s.trim().parse().map_err(|e| StakingError::InvalidAmount {
            reason: format!("cannot parse {s:?} as ether: {e}"),
        })?;
        Self::from_ether(ether)
    }

    /// Convert to a decimal ether amount. `None` if the value exceeds the
    /// 96-bit decimal mantissa.
    #[must_use]
    pub fn to_ether(self) -> Option<Decimal> {
        let mantissa = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(mantissa, constants::ETHER_DECIMALS)
            .ok()
            .map(|d| d.normalize())
    }

    /// Whole-ether part, truncating the fraction.
    #[must_use]
    pub fn whole_ether(self) -> u128 {
        self.0 / constants::WEI_PER_ETHER
    }

    /// Lossy floating conversion for log fields.
    #[must_use]
    pub fn as_ether_f64(self) -> f64 {
        self.to_ether().and_then(|d| d.to_f64()).unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl From<u128> for Wei {
    fn from(wei: u128) -> Self {
        Self(wei)
    }
}

impl std::iter::Sum for Wei {
    /// Saturating sum, for reporting only. Ledger code uses `checked_add`.
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, w| Self(acc.0.saturating_add(w.0)))
    }
}
