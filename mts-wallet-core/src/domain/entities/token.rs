//! Token entity for the wallet core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_DECIMALS, DEFAULT_SUPPLY, MAX_TOKEN_DECIMALS};
use crate::shared::error::ValidationError;
use crate::shared::types::{Address, TransactionHash, U256};
use crate::shared::utils::{parse_integer, scale_supply};

/// Token creation input as the user typed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCreationRequest {
    pub name: String,
    pub ticker: String,
    pub decimals: String,
    pub raw_supply: String,
}

impl Default for TokenCreationRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            ticker: String::new(),
            decimals: DEFAULT_DECIMALS.to_string(),
            raw_supply: DEFAULT_SUPPLY.to_string(),
        }
    }
}

impl TokenCreationRequest {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        decimals: impl ToString,
        raw_supply: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            decimals: decimals.to_string(),
            raw_supply: raw_supply.into(),
        }
    }

    /// Purely local checks, in the order the user sees them.
    pub fn validate(&self) -> Result<ValidatedToken, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let ticker = self.ticker.trim();
        if ticker.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let decimals = self
            .decimals
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidDecimals)?;
        if !(0..=MAX_TOKEN_DECIMALS as i64).contains(&decimals) {
            return Err(ValidationError::InvalidDecimals);
        }
        let decimals = decimals as u8;

        let raw_supply = parse_integer(&self.raw_supply).ok_or(ValidationError::InvalidSupply)?;
        if raw_supply.is_zero() {
            return Err(ValidationError::InvalidSupply);
        }
        // The factory takes a uint256, so the scaled value has to fit.
        let scaled_supply =
            scale_supply(raw_supply, decimals as u32).ok_or(ValidationError::InvalidSupply)?;

        Ok(ValidatedToken {
            name: self.name.clone(),
            symbol: self.ticker.clone(),
            decimals,
            raw_supply,
            scaled_supply,
        })
    }
}

/// A request that passed validation, with the on-chain supply already computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub raw_supply: U256,
    /// `raw_supply * 10^decimals`
    pub scaled_supply: U256,
}

/// Where the deployed token address in a receipt came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AddressSource {
    /// Decoded from the factory's `TokenCreated` event.
    TokenCreatedEvent,
    /// Taken from the second log of the receipt. Depends on the factory's emission order.
    LogPosition,
    /// Neither lookup found anything.
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCreationResult {
    /// `None` when the receipt did not reveal the address, see `address_source`.
    pub address: Option<Address>,
    pub address_source: AddressSource,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Supply as entered, before scaling.
    pub supply: String,
    pub tx_hash: TransactionHash,
    pub created_at: DateTime<Utc>,
}

impl TokenCreationResult {
    /// Address for display, empty when unknown.
    pub fn address_string(&self) -> String {
        self.address.map(|a| format!("{:?}", a)).unwrap_or_default()
    }

    pub fn watch_asset_request(&self) -> Option<WatchAssetRequest> {
        self.address.map(|address| WatchAssetRequest::erc20(address, &self.symbol, self.decimals))
    }
}

/// EIP-747 `wallet_watchAsset` parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchAssetRequest {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub options: WatchAssetOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchAssetOptions {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl WatchAssetRequest {
    pub fn erc20(address: Address, symbol: &str, decimals: u8) -> Self {
        Self {
            asset_type: "ERC20".to_string(),
            options: WatchAssetOptions { address, symbol: symbol.to_string(), decimals },
        }
    }
}
