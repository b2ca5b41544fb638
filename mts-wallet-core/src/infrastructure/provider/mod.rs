//! Wallet provider seam
//!
//! [`WalletProvider`] is the injected-wallet JSON-RPC surface the flows depend on. Signing stays in
//! the wallet; this crate only ever asks it to send.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider, ProviderError, RpcError};
use log::debug;
use thiserror::Error;

use crate::domain::{ChainParameters, WatchAssetRequest};
use crate::shared::error::WalletError;
use crate::shared::types::{Address, Bytes, TransactionHash, TransactionReceipt, TransactionRequest, U256};

#[cfg(test)]
pub(crate) mod mock;

/// EIP-1193 code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Failure reported by the wallet, message kept verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderRpcError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn user_rejected() -> Self {
        Self::new(Some(USER_REJECTED_CODE), "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_CODE)
    }
}

impl From<ProviderError> for ProviderRpcError {
    fn from(err: ProviderError) -> Self {
        match err.as_error_response() {
            Some(response) => Self::new(Some(response.code), response.message.clone()),
            None => Self::new(None, err.to_string()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `wallet_addEthereumChain`. Wallets switch to the chain once it is added.
    async fn add_chain(&self, params: ChainParameters) -> Result<(), ProviderRpcError>;

    /// `eth_requestAccounts`
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderRpcError>;

    async fn get_balance(&self, address: Address) -> Result<U256, ProviderRpcError>;

    /// `eth_call` against the latest block.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ProviderRpcError>;

    /// `eth_sendTransaction`, signed by the wallet.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionHash, ProviderRpcError>;

    /// Resolves once the transaction is mined. `None` if it was dropped from the mempool.
    async fn wait_for_receipt(
        &self,
        hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>, ProviderRpcError>;

    /// `wallet_watchAsset`. Returns whether the user accepted.
    async fn watch_asset(&self, request: WatchAssetRequest) -> Result<bool, ProviderRpcError>;
}

/// [`WalletProvider`] over a wallet JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcWalletProvider {
    inner: Arc<Provider<Http>>,
}

impl RpcWalletProvider {
    pub fn new(endpoint: &str) -> Result<Self, WalletError> {
        let provider = Provider::<Http>::try_from(endpoint)
            .map_err(|e| WalletError::config(format!("Invalid wallet endpoint '{}': {}", endpoint, e)))?;
        Ok(Self { inner: Arc::new(provider) })
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn add_chain(&self, params: ChainParameters) -> Result<(), ProviderRpcError> {
        debug!("wallet_addEthereumChain {}", params.chain_id);
        // Wallets answer with null on success
        let _: serde_json::Value = self.inner.request("wallet_addEthereumChain", [params]).await?;
        Ok(())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderRpcError> {
        Ok(self.inner.request("eth_requestAccounts", ()).await?)
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ProviderRpcError> {
        Ok(self.inner.get_balance(address, None).await?)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ProviderRpcError> {
        Ok(self.inner.call(&tx.into(), None).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionHash, ProviderRpcError> {
        let pending = self.inner.send_transaction(tx, None).await?;
        Ok(*pending)
    }

    async fn wait_for_receipt(
        &self,
        hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>, ProviderRpcError> {
        Ok(PendingTransaction::new(hash, self.inner.as_ref()).await?)
    }

    async fn watch_asset(&self, request: WatchAssetRequest) -> Result<bool, ProviderRpcError> {
        Ok(self.inner.request("wallet_watchAsset", request).await?)
    }
}
