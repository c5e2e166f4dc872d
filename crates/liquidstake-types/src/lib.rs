//! # liquidstake-types
//!
//! Shared types, errors, and collaborator interfaces for the **liquidstake**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`SettlementId`]
//! - **Amounts**: [`Wei`] with checked arithmetic and ether conversion
//! - **Receipts**: [`SettlementReceipt`], [`SettlementKind`]
//! - **Events**: [`LedgerEvent`] appended by the host for every committed mutation
//! - **Configuration**: [`OrchestratorConfig`]
//! - **Errors**: [`StakingError`] with `LS_ERR_` prefix codes
//! - **Adapters**: [`AccessGate`], [`NativeLedger`], [`PoolAdapter`],
//!   [`EscrowAdapter`], [`FungibleLedger`], [`Host`]
//! - **Constants**: unit scales and well-known deployment addresses

pub mod adapters;
pub mod address;
pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use liquidstake_types::{Address, Wei, StakingError, Host, ...};

pub use adapters::*;
pub use address::*;
pub use amount::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use receipt::*;

// Constants are accessed via `liquidstake_types::constants::FOO`
// (not re-exported to avoid name collisions).
