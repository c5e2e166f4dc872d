//! # liquidstake-settlement
//!
//! **Settlement Plane**: the staking orchestrator and the peg invariant.
//!
//! ## Architecture
//!
//! The [`StakingOrchestrator`] is stateless pass-through logic bound to four
//! collaborator addresses. Each call is one host transaction:
//!
//! **stake(value)**
//! 1. Pre-flight: amount, orchestrator whitelisted, caller can pay
//! 2. Take the call value (caller → orchestrator)
//! 3. Forward it to the pool; receipt tokens land in custody
//! 4. Mint the same amount of public token to the caller
//! 5. Check custody and supply both grew by `value`
//!
//! **request(amount)**
//! 1. Pre-flight: amount, access, allowance, balance, escrow liquidity
//! 2. Burn the caller's public token via allowance
//! 3. Escrow pays the caller ETH
//! 4. Custody compensates the escrow with pool-receipt tokens
//! 5. Check custody and supply both shrank by `amount`
//!
//! ## Peg
//!
//! ```text
//! totalSupply(public token) == balanceOf(pool-receipt token, orchestrator)
//! ```
//!
//! [`PegMonitor`] audits this across a whole session.

pub mod orchestrator;
pub mod peg;

pub use orchestrator::StakingOrchestrator;
pub use peg::PegMonitor;
