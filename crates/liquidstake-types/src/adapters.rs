//! Interfaces to the orchestrator's external collaborators.
//!
//! The orchestrator never touches ledger state directly. It sees the world
//! through these traits:
//!
//! ```text
//!   AccessGate      is the participant whitelisted?
//!   NativeLedger    ETH balances and call-value transfers
//!   PoolAdapter     deposit(ETH) -> pool-receipt tokens
//!   EscrowAdapter   authorized ETH payout from the buffer
//!   FungibleLedger  token balances, allowances, mint, burn_from
//!   Host            all of the above + all-or-nothing transactions
//! ```
//!
//! Every fallible call may fail for reasons outside the orchestrator's
//! control; callers must not assume any partial effect survives an `Err`.

use crate::{Address, Result, Wei};

/// Address-level access control.
pub trait AccessGate {
    fn is_whitelisted(&self, account: &Address) -> bool;
}

/// Gate that admits everyone. Substitutes for the whitelist when only the
/// settlement arithmetic is under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl AccessGate for OpenGate {
    fn is_whitelisted(&self, _account: &Address) -> bool {
        true
    }
}

/// Native ETH balances.
pub trait NativeLedger {
    fn eth_balance(&self, account: &Address) -> Wei;

    /// Move `amount` ETH. Fails with `InsufficientBalance` if `from` is short.
    fn transfer_eth(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()>;
}

/// The external staking pool.
pub trait PoolAdapter {
    /// Deposit `value` ETH held by `depositor` into `pool`.
    ///
    /// Returns the amount of pool-receipt tokens credited to `depositor`.
    fn pool_deposit(&mut self, pool: &Address, depositor: &Address, value: Wei) -> Result<Wei>;
}

/// The external escrow holding the withdrawal buffer.
pub trait EscrowAdapter {
    /// ETH currently available for payouts.
    fn escrow_liquidity(&self, escrow: &Address) -> Result<Wei>;

    /// Pay `amount` ETH from `escrow` to `beneficiary`. Only authorized
    /// callers may instruct a payout.
    fn escrow_payout(
        &mut self,
        escrow: &Address,
        caller: &Address,
        beneficiary: &Address,
        amount: Wei,
    ) -> Result<()>;
}

/// Standard fungible-token bookkeeping, addressed by token.
pub trait FungibleLedger {
    fn balance_of(&self, token: &Address, holder: &Address) -> Result<Wei>;

    fn total_supply(&self, token: &Address) -> Result<Wei>;

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Result<Wei>;

    fn transfer(&mut self, token: &Address, from: &Address, to: &Address, amount: Wei)
    -> Result<()>;

    fn approve(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: Wei,
    ) -> Result<()>;

    /// Create `amount` tokens for `to`. `minter` must hold the mint capability.
    fn mint(&mut self, token: &Address, minter: &Address, to: &Address, amount: Wei)
    -> Result<()>;

    /// Destroy `amount` of `from`'s tokens, spending `spender`'s allowance.
    fn burn_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        amount: Wei,
    ) -> Result<()>;
}

/// The execution environment: every collaborator plus transactions.
pub trait Host: AccessGate + NativeLedger + PoolAdapter + EscrowAdapter + FungibleLedger {
    /// Run `f` as one indivisible transaction.
    ///
    /// On `Ok` every effect of `f` is committed. On `Err` the host is
    /// restored to exactly the state it had before the call and the error
    /// is returned unchanged.
    fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;
}
