//! Wallet session management
//!
//! Owns the connected account and cached balances. Both flows read the account from here and ask
//! for a balance refresh once their transaction confirms.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::contracts::WrappedToken;
use crate::core::fees::ensure_allowance;
use crate::core::status::InFlightGuard;
use crate::core::transactions::TransactionManager;
use crate::domain::{Network, WalletSession};
use crate::infrastructure::config::{WalletCoreConfig, WrappedTokenConfig};
use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, ApprovalOutcome, ConnectOutcome, FeeVariant, Submission, U256};

pub struct WalletSessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    network: Network,
    factory_address: Address,
    fee_variant: FeeVariant,
    wrapped_config: Option<WrappedTokenConfig>,
    wrapped: Option<WrappedToken>,
    session: RwLock<WalletSession>,
    connecting: AtomicBool,
}

impl WalletSessionManager {
    pub fn new(config: &WalletCoreConfig, provider: Option<Arc<dyn WalletProvider>>) -> Result<Self, WalletError> {
        let wrapped = config
            .wrapped_token
            .as_ref()
            .map(|w| WrappedToken::new(w.address))
            .transpose()?;
        Ok(Self {
            provider,
            network: config.network.clone(),
            factory_address: config.factory_address,
            fee_variant: config.fee_variant,
            wrapped_config: config.wrapped_token.clone(),
            wrapped,
            session: RwLock::new(WalletSession::default()),
            connecting: AtomicBool::new(false),
        })
    }

    /// The wallet provider, or a `Provider` error when none is installed.
    pub fn provider(&self) -> Result<Arc<dyn WalletProvider>, WalletError> {
        self.provider
            .clone()
            .ok_or_else(|| WalletError::provider("No wallet provider found. Please install a wallet."))
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn factory_address(&self) -> Address {
        self.factory_address
    }

    pub fn fee_variant(&self) -> FeeVariant {
        self.fee_variant
    }

    pub fn wrapped_token(&self) -> Option<&WrappedToken> {
        self.wrapped.as_ref()
    }

    pub fn wrapped_config(&self) -> Option<&WrappedTokenConfig> {
        self.wrapped_config.as_ref()
    }

    pub async fn snapshot(&self) -> WalletSession {
        self.session.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_connected()
    }

    /// Connected account, `None` otherwise.
    pub async fn account(&self) -> Option<Address> {
        self.session.read().await.account()
    }

    /// Connected account, or `NotConnected`.
    pub async fn require_account(&self) -> Result<Address, WalletError> {
        self.account().await.ok_or(WalletError::NotConnected)
    }

    /// Add/switch the chain, request the account, read balances and, when the factory pulls
    /// wrapped tokens, make sure it holds an allowance.
    ///
    /// A failed approval does not fail the connect; it is logged and reported in the outcome.
    pub async fn connect(&self) -> Result<Submission<ConnectOutcome>, WalletError> {
        let provider = self.provider()?;
        let Some(_guard) = InFlightGuard::acquire(&self.connecting) else {
            log::debug!("Connect already in progress");
            return Ok(Submission::AlreadyPending);
        };

        log::info!("Adding chain {} ({})", self.network.name, self.network.chain_id_hex());
        provider
            .add_chain(self.network.chain_parameters())
            .await
            .map_err(|e| {
                log::error!("Chain configuration rejected: {}", e);
                WalletError::chain_config(e.message)
            })?;

        let accounts = provider.request_accounts().await.map_err(|e| {
            log::error!("Account request rejected: {}", e);
            WalletError::provider(e.message)
        })?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| WalletError::provider("Wallet returned no accounts"))?;

        {
            // Same account keeps its cached balances until the refresh below replaces them
            let mut session = self.session.write().await;
            if session.account() != Some(address) {
                *session = WalletSession::connected(address);
            }
        }
        log::info!("Connected {:?}", address);

        match self.finish_connect(provider.as_ref(), address).await {
            Ok(approval) => Ok(Submission::Settled(ConnectOutcome { address, approval })),
            Err(e) => {
                log::error!("Connect failed after account access: {}", e);
                self.disconnect().await;
                Err(e)
            }
        }
    }

    async fn finish_connect(
        &self,
        provider: &dyn WalletProvider,
        address: Address,
    ) -> Result<ApprovalOutcome, WalletError> {
        self.refresh_native_balance().await?;

        let approval = match (self.fee_variant, &self.wrapped) {
            (FeeVariant::NativeAndWrapped, Some(wrapped)) => {
                let transactions = TransactionManager::new(self.provider()?);
                match ensure_allowance(provider, &transactions, wrapped, address, self.factory_address).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        log::warn!("Wrapped token approval failed, continuing: {}", e);
                        ApprovalOutcome::Failed { reason: e.user_message() }
                    }
                }
            }
            _ => ApprovalOutcome::NotRequired,
        };

        self.refresh_wrapped_balance().await?;
        Ok(approval)
    }

    /// Forget the session. Nothing happens on chain.
    pub async fn disconnect(&self) {
        *self.session.write().await = WalletSession::default();
        log::info!("Wallet session cleared");
    }

    pub async fn refresh_native_balance(&self) -> Result<U256, WalletError> {
        let address = self.require_account().await?;
        let balance = self
            .provider()?
            .get_balance(address)
            .await
            .map_err(|e| WalletError::network(e.message))?;
        self.session.write().await.native_balance = balance;
        Ok(balance)
    }

    /// `None` when no wrapped token is configured.
    pub async fn refresh_wrapped_balance(&self) -> Result<Option<U256>, WalletError> {
        let Some(wrapped) = &self.wrapped else {
            return Ok(None);
        };
        let address = self.require_account().await?;
        let provider = self.provider()?;
        let balance = wrapped.balance_of(provider.as_ref(), address).await?;
        self.session.write().await.wrapped_balance = Some(balance);
        Ok(Some(balance))
    }

    pub async fn refresh_balances(&self) -> Result<(), WalletError> {
        self.refresh_native_balance().await?;
        self.refresh_wrapped_balance().await?;
        Ok(())
    }
}
