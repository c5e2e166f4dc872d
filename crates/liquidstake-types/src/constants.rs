//! System-wide constants for the liquidstake settlement engine.

/// Decimal places of ETH and of every token tracked by the engine.
pub const ETHER_DECIMALS: u32 = 18;

/// Wei in one ether (10^18).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Domain separator for deterministic address derivation.
pub const ADDRESS_DERIVATION_DOMAIN: &[u8] = b"liquidstake:address:v1:";

/// Mainnet staking pool accepting ETH deposits.
pub const MAINNET_POOL: &str = "0xeA6b7151b138c274eD8d4D61328352545eF2D4b7";

/// Mainnet pool escrow holding the ETH withdrawal buffer.
pub const MAINNET_ESCROW: &str = "0xa57C8861d923B57A09BC9270fA76198c8cDCB002";

/// Mainnet whitelist manager gating pool-receipt transfers.
pub const MAINNET_WHITELIST: &str = "0x57a9cbED053f37EB67d6f5932b1F2f9Afbe347F3";

/// Mainnet pool-receipt (staked ETH) token.
pub const MAINNET_STAKED_ETH: &str = "0x65077fA7Df8e38e135bd4052ac243F603729892d";

/// Governance multisig allowed to update the mainnet whitelist.
pub const MAINNET_GOVERNANCE: &str = "0x6C7692dB59FDC7A659208EEE57C2c876aE54a448";

/// Symbol of the user-facing principal-pegged token.
pub const PUBLIC_TOKEN_SYMBOL: &str = "pETH";

/// Symbol of the pool-receipt token.
pub const POOL_RECEIPT_SYMBOL: &str = "sETH2";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "liquidstake";
