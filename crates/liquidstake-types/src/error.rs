//! Error types for the liquidstake settlement engine.
//!
//! All errors use the `LS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Amount errors
//! - 2xx: Balance / allowance / liquidity errors
//! - 3xx: Access-control errors
//! - 4xx: External collaborator errors
//! - 5xx: Invariant errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, Wei};

/// Central error enum for all liquidstake operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    // =================================================================
    // Amount Errors (1xx)
    // =================================================================
    /// Zero amount, or an amount whose accounting would overflow.
    #[error("LS_ERR_100: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// The holder does not own enough of the asset.
    #[error("LS_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Wei, available: Wei },

    /// The spender was not approved for enough of the owner's tokens.
    #[error("LS_ERR_201: Insufficient allowance: need {needed}, approved {available}")]
    InsufficientAllowance { needed: Wei, available: Wei },

    /// The escrow buffer cannot cover the payout.
    #[error("LS_ERR_202: Insufficient escrow liquidity: need {needed}, buffer holds {available}")]
    InsufficientLiquidity { needed: Wei, available: Wei },

    // =================================================================
    // Access Errors (3xx)
    // =================================================================
    /// A participant is not whitelisted, or the caller is not privileged.
    #[error("LS_ERR_300: Access denied for {0}")]
    AccessDenied(Address),

    /// The caller lacks a ledger capability such as minting.
    #[error("LS_ERR_301: Account {account} is missing role {role}")]
    MissingRole { role: String, account: Address },

    // =================================================================
    // External Errors (4xx)
    // =================================================================
    /// The pool or escrow rejected the call.
    #[error("LS_ERR_400: External call to {target} failed: {reason}")]
    ExternalCallFailure { target: Address, reason: String },

    /// No contract is deployed at the address.
    #[error("LS_ERR_401: No contract deployed at {0}")]
    UnknownContract(Address),

    // =================================================================
    // Invariant Errors (5xx)
    // =================================================================
    /// Custody and public supply moved out of lock-step. Critical alert.
    #[error("LS_ERR_500: Peg invariant violation: {reason}")]
    PegViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("LS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("LS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (bad address, missing fields, etc.).
    #[error("LS_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl StakingError {
    /// The `LS_ERR_NNN` code of this error.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } => 100,
            Self::InsufficientBalance { .. } => 200,
            Self::InsufficientAllowance { .. } => 201,
            Self::InsufficientLiquidity { .. } => 202,
            Self::AccessDenied(_) => 300,
            Self::MissingRole { .. } => 301,
            Self::ExternalCallFailure { .. } => 400,
            Self::UnknownContract(_) => 401,
            Self::PegViolation { .. } => 500,
            Self::Internal(_) => 900,
            Self::Serialization(_) => 901,
            Self::Configuration(_) => 902,
        }
    }

    /// Shorthand for an overflowing accounting step.
    #[must_use]
    pub fn overflow(what: &str) -> Self {
        Self::InvalidAmount {
            reason: format!("{what} overflows"),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, StakingError>;

impl From<serde_json::Error> for StakingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
