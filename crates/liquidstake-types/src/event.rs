//! Ledger events.
//!
//! The host appends one [`LedgerEvent`] per committed balance or permission
//! mutation. Events produced inside a transaction that later fails are
//! discarded with the rest of its effects, so the log only ever shows
//! settled history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Wei};

/// A committed mutation of host state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Native ETH moved between accounts.
    EthTransfer { from: Address, to: Address, amount: Wei },
    /// Tokens moved between holders.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: Wei,
    },
    /// An owner set a spender's allowance.
    Approval {
        token: Address,
        owner: Address,
        spender: Address,
        amount: Wei,
    },
    /// New tokens created.
    Mint { token: Address, to: Address, amount: Wei },
    /// Tokens destroyed.
    Burn { token: Address, from: Address, amount: Wei },
    /// The pool accepted ETH and issued receipt tokens.
    PoolDeposit {
        pool: Address,
        depositor: Address,
        value: Wei,
        minted: Wei,
    },
    /// The escrow paid ETH out of its buffer.
    EscrowPayout {
        escrow: Address,
        caller: Address,
        beneficiary: Address,
        amount: Wei,
    },
    /// Governance toggled a whitelist entry.
    WhitelistUpdated { account: Address, approved: bool },
    /// A token admin granted the mint capability.
    RoleGranted {
        token: Address,
        role: String,
        account: Address,
    },
}

impl LedgerEvent {
    /// Short event name, used in logs and ordering assertions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::EthTransfer { .. } => "EthTransfer",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::PoolDeposit { .. } => "PoolDeposit",
            Self::EscrowPayout { .. } => "EscrowPayout",
            Self::WhitelistUpdated { .. } => "WhitelistUpdated",
            Self::RoleGranted { .. } => "RoleGranted",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EthTransfer { from, to, amount } => {
                write!(f, "EthTransfer({from} -> {to}, {amount})")
            }
            Self::Transfer {
                token,
                from,
                to,
                amount,
            } => write!(f, "Transfer[{}]({from} -> {to}, {amount})", token.short()),
            Self::Approval {
                token,
                owner,
                spender,
                amount,
            } => write!(f, "Approval[{}]({owner} -> {spender}, {amount})", token.short()),
            Self::Mint { token, to, amount } => {
                write!(f, "Mint[{}]({to}, {amount})", token.short())
            }
            Self::Burn { token, from, amount } => {
                write!(f, "Burn[{}]({from}, {amount})", token.short())
            }
            Self::PoolDeposit {
                pool,
                depositor,
                value,
                minted,
            } => write!(
                f,
                "PoolDeposit[{}]({depositor}, value {value}, minted {minted})",
                pool.short()
            ),
            Self::EscrowPayout {
                escrow,
                beneficiary,
                amount,
                ..
            } => write!(f, "EscrowPayout[{}]({beneficiary}, {amount})", escrow.short()),
            Self::WhitelistUpdated { account, approved } => {
                write!(f, "WhitelistUpdated({account}, {approved})")
            }
            Self::RoleGranted {
                token,
                role,
                account,
            } => write!(f, "RoleGranted[{}]({role}, {account})", token.short()),
        }
    }
}
