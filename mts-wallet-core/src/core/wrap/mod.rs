//! Wrapping native currency into its ERC20 form and back
//!
//! Wrap and unwrap share one status and one in-flight flag, separate from token creation.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::core::status::{OperationStatus, StatusStateMachine};
use crate::core::transactions::TransactionManager;
use crate::core::wallet::WalletSessionManager;
use crate::infrastructure::config::WrappedTokenConfig;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, Submission, TransactionHash, WrapDirection, WrapOperation, U256};
use crate::shared::utils::{format_amount, parse_positive_amount};

pub struct WrapUnwrapFlow {
    session: Arc<WalletSessionManager>,
    status: StatusStateMachine,
    amount: RwLock<String>,
}

impl WrapUnwrapFlow {
    pub fn new(session: Arc<WalletSessionManager>) -> Self {
        Self { session, status: StatusStateMachine::new(), amount: RwLock::new(String::new()) }
    }

    pub fn status(&self) -> OperationStatus {
        self.status.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationStatus> {
        self.status.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_busy()
    }

    pub async fn amount_input(&self) -> String {
        self.amount.read().await.clone()
    }

    pub async fn set_amount_input(&self, amount: impl Into<String>) {
        *self.amount.write().await = amount.into();
    }

    pub async fn wrap(&self, amount: &str) -> Result<Submission<TransactionHash>, WalletError> {
        self.execute(WrapOperation::wrap(amount)).await
    }

    pub async fn unwrap(&self, amount: &str) -> Result<Submission<TransactionHash>, WalletError> {
        self.execute(WrapOperation::unwrap(amount)).await
    }

    /// Deposit or withdraw, then refresh both balances and clear the amount input.
    pub async fn execute(&self, operation: WrapOperation) -> Result<Submission<TransactionHash>, WalletError> {
        if self.status.is_busy() {
            return Ok(Submission::AlreadyPending);
        }

        let Some(account) = self.session.account().await else {
            self.status.reject(WalletError::NotConnected.user_message());
            return Err(WalletError::NotConnected);
        };
        let wrapped = self
            .session
            .wrapped_config()
            .cloned()
            .ok_or_else(|| WalletError::config("No wrapped token configured"))?;
        let value = match parse_positive_amount(&operation.amount, wrapped.decimals) {
            Ok(value) => value,
            Err(e) => {
                self.status.reject(e.user_message());
                return Err(e);
            }
        };

        let native_symbol = &self.session.network().native_currency.symbol;
        let labels = Labels::new(operation.direction, native_symbol, &wrapped, value);
        let Some(_guard) = self.status.try_begin(labels.pending()) else {
            return Ok(Submission::AlreadyPending);
        };
        log::info!("{}", labels.pending());

        match self.submit(account, operation.direction, value).await {
            Ok(hash) => {
                self.status.succeed(labels.success());
                if let Err(e) = self.session.refresh_balances().await {
                    log::error!("Balance refresh after {:?} failed: {}", operation.direction, e);
                }
                self.amount.write().await.clear();
                Ok(Submission::Settled(hash))
            }
            Err(e) => {
                log::error!("{}", labels.failure(&e));
                self.status.fail(labels.failure(&e));
                Err(e)
            }
        }
    }

    async fn submit(
        &self,
        account: Address,
        direction: WrapDirection,
        value: U256,
    ) -> Result<TransactionHash, WalletError> {
        let wrapped = self
            .session
            .wrapped_token()
            .ok_or_else(|| WalletError::config("No wrapped token configured"))?;
        let tx = match direction {
            WrapDirection::Wrap => wrapped.deposit_tx(account, value)?,
            WrapDirection::Unwrap => wrapped.withdraw_tx(account, value)?,
        };
        let receipt = TransactionManager::new(self.session.provider()?).send_and_confirm(tx).await?;
        Ok(receipt.transaction_hash)
    }
}

/// `Wrapping 1.5 INJ...`, `Unwrapped 1.5 wINJ into INJ` and so on.
struct Labels {
    direction: WrapDirection,
    amount: String,
    native: String,
    wrapped: String,
}

impl Labels {
    fn new(direction: WrapDirection, native: &str, wrapped: &WrappedTokenConfig, value: U256) -> Self {
        Self {
            direction,
            amount: format_amount(value, wrapped.decimals),
            native: native.to_string(),
            wrapped: wrapped.symbol.clone(),
        }
    }

    fn pending(&self) -> String {
        match self.direction {
            WrapDirection::Wrap => format!("Wrapping {} {}...", self.amount, self.native),
            WrapDirection::Unwrap => format!("Unwrapping {} {}...", self.amount, self.wrapped),
        }
    }

    fn success(&self) -> String {
        match self.direction {
            WrapDirection::Wrap => format!("Wrapped {} {} into {}", self.amount, self.native, self.wrapped),
            WrapDirection::Unwrap => format!("Unwrapped {} {} into {}", self.amount, self.wrapped, self.native),
        }
    }

    fn failure(&self, error: &WalletError) -> String {
        match self.direction {
            WrapDirection::Wrap => format!("Wrap failed: {}", error.user_message()),
            WrapDirection::Unwrap => format!("Unwrap failed: {}", error.user_message()),
        }
    }
}
