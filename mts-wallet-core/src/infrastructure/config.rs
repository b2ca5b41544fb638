//! Configuration for the wallet core
//!
//! Values come from `MTS_*` environment variables (after `.env` is loaded) and fall back to the
//! Injective EVM testnet deployment.

use std::env;

use serde::{Deserialize, Serialize};

use crate::domain::{NativeCurrency, Network};
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, FeeVariant};
use crate::shared::utils::parse_address;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrappedTokenConfig {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletCoreConfig {
    pub network: Network,
    pub factory_address: Address,
    pub fee_variant: FeeVariant,
    pub wrapped_token: Option<WrappedTokenConfig>,
    /// JSON-RPC endpoint of the wallet. No endpoint means no provider.
    pub wallet_endpoint: Option<String>,
}

impl Default for WalletCoreConfig {
    fn default() -> Self {
        Self {
            network: Network::injective_testnet(),
            factory_address: DEFAULT_FACTORY_ADDRESS.parse().unwrap_or_default(),
            fee_variant: FeeVariant::NativeOnly,
            wrapped_token: None,
            wallet_endpoint: None,
        }
    }
}

fn lookup_or<F>(lookup: &F, key: &str, fallback: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn lookup_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl WalletCoreConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, WalletError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup and validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain_id = lookup_or(&lookup, ENV_CHAIN_ID, &DEFAULT_CHAIN_ID.to_string());
        let chain_id = match chain_id.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => chain_id.parse::<u64>(),
        }
        .map_err(|_| WalletError::config(format!("Invalid {}: '{}'", ENV_CHAIN_ID, chain_id)))?;

        let native_decimals = lookup_or(&lookup, ENV_NATIVE_DECIMALS, &DEFAULT_NATIVE_DECIMALS.to_string());
        let native_decimals = native_decimals.parse::<u8>().map_err(|_| {
            WalletError::config(format!("Invalid {}: '{}'", ENV_NATIVE_DECIMALS, native_decimals))
        })?;

        let network = Network {
            chain_id,
            name: lookup_or(&lookup, ENV_CHAIN_NAME, DEFAULT_CHAIN_NAME),
            rpc_url: lookup_or(&lookup, ENV_RPC_URL, DEFAULT_RPC_URL),
            native_currency: NativeCurrency {
                name: lookup_or(&lookup, ENV_NATIVE_NAME, DEFAULT_NATIVE_NAME),
                symbol: lookup_or(&lookup, ENV_NATIVE_SYMBOL, DEFAULT_NATIVE_SYMBOL),
                decimals: native_decimals,
            },
            block_explorer: lookup_or(&lookup, ENV_BLOCK_EXPLORER, DEFAULT_BLOCK_EXPLORER),
        };

        let factory_address = parse_address(&lookup_or(&lookup, ENV_FACTORY_ADDRESS, DEFAULT_FACTORY_ADDRESS))?;

        let fee_variant = lookup_or(&lookup, ENV_FEE_VARIANT, FeeVariant::NativeOnly.as_str());
        let fee_variant = FeeVariant::parse(&fee_variant).ok_or_else(|| {
            WalletError::config(format!(
                "Invalid {}: '{}'. Expected native_only or native_and_wrapped",
                ENV_FEE_VARIANT, fee_variant
            ))
        })?;

        // The wrapped token mirrors the native currency's decimals
        let wrapped_token = match lookup_optional(&lookup, ENV_WRAPPED_TOKEN_ADDRESS) {
            Some(address) => Some(WrappedTokenConfig {
                address: parse_address(&address)?,
                symbol: lookup_or(&lookup, ENV_WRAPPED_SYMBOL, DEFAULT_WRAPPED_SYMBOL),
                decimals: native_decimals,
            }),
            None => None,
        };

        let config = Self {
            network,
            factory_address,
            fee_variant,
            wrapped_token,
            wallet_endpoint: lookup_optional(&lookup, ENV_WALLET_ENDPOINT),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.network.chain_id == 0 {
            return Err(WalletError::config("Chain id must be non-zero"));
        }
        if !is_http_url(&self.network.rpc_url) {
            return Err(WalletError::config(format!(
                "RPC URL must be http(s): '{}'",
                self.network.rpc_url
            )));
        }
        if !is_http_url(&self.network.block_explorer) {
            return Err(WalletError::config(format!(
                "Block explorer URL must be http(s): '{}'",
                self.network.block_explorer
            )));
        }
        if let Some(endpoint) = &self.wallet_endpoint {
            if !is_http_url(endpoint) {
                return Err(WalletError::config(format!("Wallet endpoint must be http(s): '{}'", endpoint)));
            }
        }
        if self.network.native_currency.decimals > MAX_CURRENCY_DECIMALS {
            return Err(WalletError::config(format!(
                "Native currency decimals must be at most {}",
                MAX_CURRENCY_DECIMALS
            )));
        }
        if self.network.native_currency.symbol.is_empty() {
            return Err(WalletError::config("Native currency symbol cannot be empty"));
        }
        if self.fee_variant == FeeVariant::NativeAndWrapped && self.wrapped_token.is_none() {
            return Err(WalletError::config(format!(
                "{} is required when {} is native_and_wrapped",
                ENV_WRAPPED_TOKEN_ADDRESS, ENV_FEE_VARIANT
            )));
        }
        Ok(())
    }

    pub fn native_symbol(&self) -> &str {
        &self.network.native_currency.symbol
    }

    pub fn native_decimals(&self) -> u8 {
        self.network.native_currency.decimals
    }

    /// Symbol of the wrapped token, or the default when none is configured.
    pub fn wrapped_symbol(&self) -> &str {
        self.wrapped_token
            .as_ref()
            .map(|w| w.symbol.as_str())
            .unwrap_or(DEFAULT_WRAPPED_SYMBOL)
    }
}
