//! # liquidstake-ledger
//!
//! **Host plane**: the in-memory execution environment the orchestrator runs
//! against. It plays the part of the external world: native ETH balances,
//! token contracts, the whitelist, the staking pool, and the escrow.
//!
//! ## Architecture
//!
//! 1. **EthLedger**: native ETH balances per address
//! 2. **TokenLedger**: one fungible token (balances, allowances, mint role)
//! 3. **WhitelistManager**: governance-controlled [`AccessGate`]
//! 4. **StakingPool**: accepts ETH, issues pool-receipt tokens 1:1
//! 5. **Escrow**: ETH buffer paying authorized withdrawal requests
//! 6. **Chain**: owns all of the above, implements [`Host`], and gives every
//!    transaction snapshot/rollback semantics
//!
//! ## Transaction Flow
//!
//! ```text
//! Chain.atomically(|chain| {
//!     chain.transfer_eth(..)?;      ─┐
//!     chain.pool_deposit(..)?;       │ any Err → restore snapshot
//!     chain.mint(..)?;              ─┘
//! })                                → Ok: effects + events committed
//! ```
//!
//! [`AccessGate`]: liquidstake_types::AccessGate
//! [`Host`]: liquidstake_types::Host

pub mod chain;
pub mod escrow;
pub mod eth;
pub mod pool;
pub mod token;
pub mod whitelist;

pub use chain::Chain;
pub use escrow::Escrow;
pub use eth::EthLedger;
pub use pool::StakingPool;
pub use token::{MINTER_ROLE, TokenLedger};
pub use whitelist::WhitelistManager;
