//! Orchestrator configuration.
//!
//! The orchestrator is bound to its collaborators at construction and has no
//! runtime reconfiguration surface: the config is validated once and then
//! only read.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Address, Result, StakingError, constants};

/// Addresses an orchestrator is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// The orchestrator's own address (custody holder, minter, spender).
    pub client: Address,
    /// Staking pool accepting ETH deposits.
    pub pool: Address,
    /// Escrow paying ETH on withdrawal requests.
    pub escrow: Address,
    /// Token the pool issues for deposits.
    pub pool_receipt_token: Address,
    /// User-facing token minted 1:1 with staked principal.
    pub public_token: Address,
}

impl OrchestratorConfig {
    /// Config bound to the well-known mainnet pool, escrow and receipt token.
    pub fn mainnet(client: Address, public_token: Address) -> Result<Self> {
        Ok(Self {
            client,
            pool: constants::MAINNET_POOL.parse()?,
            escrow: constants::MAINNET_ESCROW.parse()?,
            pool_receipt_token: constants::MAINNET_STAKED_ETH.parse()?,
            public_token,
        })
    }

    /// Labelled addresses, in declaration order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Address); 5] {
        [
            ("client", self.client),
            ("pool", self.pool),
            ("escrow", self.escrow),
            ("pool_receipt_token", self.pool_receipt_token),
            ("public_token", self.public_token),
        ]
    }

    /// Reject zero addresses and any address bound to two roles.
    ///
    /// # Errors
    /// Returns [`StakingError::Configuration`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (name, addr) in self.entries() {
            if addr.is_zero() {
                return Err(StakingError::Configuration(format!(
                    "{name} address must not be zero"
                )));
            }
            if !seen.insert(addr) {
                return Err(StakingError::Configuration(format!(
                    "{name} address {addr} is already bound to another role"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
