//! Settlement receipts.
//!
//! Every committed `stake` or `request` produces a [`SettlementReceipt`]
//! recording what moved and the custody / supply totals left behind, so a
//! caller can audit the peg without re-reading the ledgers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Address, Wei};

/// Unique identifier of a committed settlement. Uses UUIDv7 for
/// time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", self.0)
    }
}

/// Which orchestrator operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    /// ETH deposited into the pool, public token minted.
    Stake,
    /// Public token burned, ETH paid out of the escrow buffer.
    Request,
}

impl fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stake => write!(f, "STAKE"),
            Self::Request => write!(f, "REQUEST"),
        }
    }
}

/// Proof of one committed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub id: SettlementId,
    pub kind: SettlementKind,
    /// The user who staked or redeemed.
    pub account: Address,
    pub amount: Wei,
    /// Orchestrator's pool-receipt balance after the settlement.
    pub custody_after: Wei,
    /// Public token total supply after the settlement.
    pub supply_after: Wei,
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// Whether the totals recorded in this receipt are pegged.
    #[must_use]
    pub fn is_pegged(&self) -> bool {
        self.custody_after == self.supply_after
    }
}
