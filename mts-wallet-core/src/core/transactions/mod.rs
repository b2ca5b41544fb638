//! Transaction submission and confirmation
//!
//! The wallet signs and broadcasts; this module only hands it requests and waits for the receipt.

use std::sync::Arc;

use ethers::types::U64;

use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;
use crate::shared::types::{TransactionHash, TransactionReceipt, TransactionRequest};

/// Transaction manager for handling wallet transactions
pub struct TransactionManager {
    provider: Arc<dyn WalletProvider>,
}

impl TransactionManager {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self { provider }
    }

    /// Hand `tx` to the wallet. A rejection surfaces the wallet's message unchanged.
    pub async fn send(&self, tx: TransactionRequest) -> Result<TransactionHash, WalletError> {
        let hash = self.provider.send_transaction(tx).await.map_err(|e| {
            log::error!("Wallet rejected transaction: {}", e);
            WalletError::transaction(e.message)
        })?;
        log::info!("Transaction sent: {:?}", hash);
        Ok(hash)
    }

    /// Wait for `hash` to be mined. A reverted or dropped transaction is an error.
    pub async fn wait_for_confirmation(&self, hash: TransactionHash) -> Result<TransactionReceipt, WalletError> {
        let receipt = self
            .provider
            .wait_for_receipt(hash)
            .await
            .map_err(|e| WalletError::transaction(e.message))?
            .ok_or_else(|| WalletError::transaction(format!("Transaction {:?} was dropped", hash)))?;

        if receipt.status == Some(U64::zero()) {
            log::error!("Transaction reverted: {:?}", hash);
            return Err(WalletError::transaction("Transaction reverted"));
        }
        log::info!("Transaction confirmed: {:?}", hash);
        Ok(receipt)
    }

    pub async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<TransactionReceipt, WalletError> {
        let hash = self.send(tx).await?;
        self.wait_for_confirmation(hash).await
    }
}
