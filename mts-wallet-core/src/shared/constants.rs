//! Constants for the wallet core
//!
//! Network defaults target the Injective EVM testnet the factory is deployed on.

// Network defaults
pub const DEFAULT_CHAIN_ID: u64 = 1439; // 0x59f
pub const DEFAULT_CHAIN_NAME: &str = "Injective EVM";
pub const DEFAULT_RPC_URL: &str = "https://k8s.testnet.json-rpc.injective.network/";
pub const DEFAULT_BLOCK_EXPLORER: &str = "https://testnet.blockscout.injective.network/blocks";
pub const DEFAULT_NATIVE_NAME: &str = "Injective";
pub const DEFAULT_NATIVE_SYMBOL: &str = "INJ";
pub const DEFAULT_NATIVE_DECIMALS: u8 = 18;

// Contract defaults
pub const DEFAULT_FACTORY_ADDRESS: &str = "0x715513b13Aa8118827167Dc5B51E3d6DE492417E";
pub const DEFAULT_WRAPPED_SYMBOL: &str = "wINJ";

// Token creation form defaults
pub const DEFAULT_SUPPLY: &str = "1000000";
pub const DEFAULT_DECIMALS: &str = "18";
pub const MAX_TOKEN_DECIMALS: u32 = 18;

/// Decimals shown for balances in the session header.
pub const BALANCE_DISPLAY_DECIMALS: u32 = 4;

/// Upper bound accepted for configured currency decimals.
pub const MAX_CURRENCY_DECIMALS: u8 = 36;

// Status messages
pub const MSG_PREPARING_CREATION: &str = "Preparing token creation...";
pub const MSG_TX_SENT: &str = "Transaction sent, waiting for confirmation...";

// Environment keys
pub const ENV_CHAIN_ID: &str = "MTS_CHAIN_ID";
pub const ENV_CHAIN_NAME: &str = "MTS_CHAIN_NAME";
pub const ENV_RPC_URL: &str = "MTS_RPC_URL";
pub const ENV_BLOCK_EXPLORER: &str = "MTS_BLOCK_EXPLORER";
pub const ENV_NATIVE_NAME: &str = "MTS_NATIVE_NAME";
pub const ENV_NATIVE_SYMBOL: &str = "MTS_NATIVE_SYMBOL";
pub const ENV_NATIVE_DECIMALS: &str = "MTS_NATIVE_DECIMALS";
pub const ENV_FACTORY_ADDRESS: &str = "MTS_FACTORY_ADDRESS";
pub const ENV_FEE_VARIANT: &str = "MTS_FEE_VARIANT";
pub const ENV_WRAPPED_TOKEN_ADDRESS: &str = "MTS_WRAPPED_TOKEN_ADDRESS";
pub const ENV_WRAPPED_SYMBOL: &str = "MTS_WRAPPED_SYMBOL";
pub const ENV_WALLET_ENDPOINT: &str = "MTS_WALLET_ENDPOINT";
