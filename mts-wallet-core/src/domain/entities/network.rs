//! Network entity for the wallet core

use serde::{Deserialize, Serialize};

use crate::shared::constants::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// The chain the wallet is switched to before anything else happens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub native_currency: NativeCurrency,
    pub block_explorer: String,
}

impl Network {
    pub fn injective_testnet() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            name: DEFAULT_CHAIN_NAME.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            native_currency: NativeCurrency {
                name: DEFAULT_NATIVE_NAME.to_string(),
                symbol: DEFAULT_NATIVE_SYMBOL.to_string(),
                decimals: DEFAULT_NATIVE_DECIMALS,
            },
            block_explorer: DEFAULT_BLOCK_EXPLORER.to_string(),
        }
    }

    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Payload for `wallet_addEthereumChain`.
    pub fn chain_parameters(&self) -> ChainParameters {
        ChainParameters {
            chain_id: self.chain_id_hex(),
            chain_name: self.name.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            native_currency: self.native_currency.clone(),
            block_explorer_urls: vec![self.block_explorer.clone()],
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::injective_testnet()
    }
}

/// EIP-3085 `wallet_addEthereumChain` parameters, serialized exactly as wallets expect them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainParameters {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}
