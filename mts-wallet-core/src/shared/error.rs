//! Error handling for the wallet core
//!
//! This module defines the error types used throughout the wallet core.

use thiserror::Error;

/// Local input problems, detected before any network access.
///
/// The display strings are the messages shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a token name!")]
    EmptyName,

    #[error("Please enter a ticker symbol!")]
    EmptyTicker,

    #[error("Decimals must be between 0 and 18!")]
    InvalidDecimals,

    #[error("Please enter a valid supply!")]
    InvalidSupply,

    #[error("Please enter a valid amount!")]
    InvalidAmount,
}

/// Wallet error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Please connect your wallet first!")]
    NotConnected,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Chain configuration error: {0}")]
    ChainConfig(String),

    #[error("Approval error: {0}")]
    Approval(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Receipt parsing error: {0}")]
    ReceiptParsing(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create a chain configuration error
    pub fn chain_config(message: impl Into<String>) -> Self {
        Self::ChainConfig(message.into())
    }

    /// Create an approval error
    pub fn approval(message: impl Into<String>) -> Self {
        Self::Approval(message.into())
    }

    /// Create a transaction error
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction(message.into())
    }

    /// Create a receipt parsing error
    pub fn receipt_parsing(message: impl Into<String>) -> Self {
        Self::ReceiptParsing(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The message without the category prefix, as surfaced in a flow's status.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotConnected => self.to_string(),
            Self::Provider(m)
            | Self::ChainConfig(m)
            | Self::Approval(m)
            | Self::Transaction(m)
            | Self::ReceiptParsing(m)
            | Self::Network(m)
            | Self::Config(m)
            | Self::Internal(m) => m.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotConnected)
    }
}

impl From<ethers::abi::Error> for WalletError {
    fn from(err: ethers::abi::Error) -> Self {
        Self::internal(format!("ABI error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}
