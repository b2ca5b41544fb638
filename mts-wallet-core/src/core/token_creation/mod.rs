//! Token creation through the factory
//!
//! One flow serves both fee variants; the [`FeeSchedule`] read at the start of each attempt decides
//! what value is attached and whether the wrapped-token allowance has to be in place first.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use crate::core::contracts::TokenFactory;
use crate::core::fees::{ensure_allowance, FeeResolver, FeeSchedule};
use crate::core::status::{OperationStatus, StatusStateMachine};
use crate::core::transactions::TransactionManager;
use crate::core::wallet::WalletSessionManager;
use crate::domain::{TokenCreationRequest, TokenCreationResult, ValidatedToken};
use crate::shared::constants::{DEFAULT_WRAPPED_SYMBOL, MSG_PREPARING_CREATION, MSG_TX_SENT};
use crate::shared::error::{ValidationError, WalletError};
use crate::shared::types::{Address, Submission};

pub struct TokenCreationFlow {
    session: Arc<WalletSessionManager>,
    factory: TokenFactory,
    fees: FeeResolver,
    status: StatusStateMachine,
    form: RwLock<TokenCreationRequest>,
    result: RwLock<Option<TokenCreationResult>>,
}

impl TokenCreationFlow {
    pub fn new(session: Arc<WalletSessionManager>) -> Result<Self, WalletError> {
        let factory = TokenFactory::new(session.factory_address())?;
        let fees = FeeResolver::new(factory.clone(), session.fee_variant());
        Ok(Self {
            session,
            factory,
            fees,
            status: StatusStateMachine::new(),
            form: RwLock::new(TokenCreationRequest::default()),
            result: RwLock::new(None),
        })
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

    pub async fn form(&self) -> TokenCreationRequest {
        self.form.read().await.clone()
    }

    /// Edit the form in place. Allowed while a creation is pending.
    pub async fn edit_form(&self, edit: impl FnOnce(&mut TokenCreationRequest)) {
        edit(&mut *self.form.write().await);
    }

    pub async fn created_token(&self) -> Option<TokenCreationResult> {
        self.result.read().await.clone()
    }

    pub fn validate(&self, request: &TokenCreationRequest) -> Result<ValidatedToken, ValidationError> {
        request.validate()
    }

    /// Submit whatever the form currently holds.
    pub async fn submit_form(&self) -> Result<Submission<TokenCreationResult>, WalletError> {
        let request = self.form().await;
        self.submit(&request).await
    }

    /// Create the token described by `request`.
    ///
    /// Returns `AlreadyPending` without touching anything if a creation is in flight. Local
    /// problems are reported before any network access; everything after that ends in an error
    /// status carrying the wallet's message.
    pub async fn submit(&self, request: &TokenCreationRequest) -> Result<Submission<TokenCreationResult>, WalletError> {
        if self.status.is_busy() {
            return Ok(Submission::AlreadyPending);
        }

        let Some(account) = self.session.account().await else {
            self.status.reject(WalletError::NotConnected.user_message());
            return Err(WalletError::NotConnected);
        };

        let token = match request.validate() {
            Ok(token) => token,
            Err(e) => {
                self.status.reject(e.to_string());
                return Err(e.into());
            }
        };

        let Some(_guard) = self.status.try_begin(MSG_PREPARING_CREATION) else {
            return Ok(Submission::AlreadyPending);
        };
        log::info!("Creating token {} ({})", token.name, token.symbol);

        match self.create(account, &token, &request.raw_supply).await {
            Ok(result) => {
                *self.result.write().await = Some(result.clone());
                self.status.succeed(format!(
                    "Token \"{}\" ({}) created successfully!",
                    result.name, result.symbol
                ));
                *self.form.write().await = TokenCreationRequest::default();
                if let Err(e) = self.session.refresh_native_balance().await {
                    log::error!("Balance refresh after creation failed: {}", e);
                }
                Ok(Submission::Settled(result))
            }
            Err(e) => {
                log::error!("Token creation failed: {}", e);
                self.status.fail(format!("Token creation failed: {}", e.user_message()));
                Err(e)
            }
        }
    }

    async fn create(
        &self,
        account: Address,
        token: &ValidatedToken,
        raw_supply: &str,
    ) -> Result<TokenCreationResult, WalletError> {
        let provider = self.session.provider()?;
        let schedule = self.fees.fetch_fee_schedule(provider.as_ref()).await?;
        self.status.set_pending(format!("Creating token ({})...", self.describe_fees(&schedule)));

        let transactions = TransactionManager::new(provider.clone());
        if schedule.wrapped_fee().is_some() {
            let wrapped = self
                .session
                .wrapped_token()
                .ok_or_else(|| WalletError::config("Fee schedule requires a wrapped token but none is configured"))?;
            ensure_allowance(provider.as_ref(), &transactions, wrapped, account, self.factory.address()).await?;
        }

        let tx = self.factory.create_token_tx(account, token, schedule.native_value())?;
        let hash = transactions.send(tx).await?;
        self.status.set_pending(MSG_TX_SENT);
        let receipt = transactions.wait_for_confirmation(hash).await?;

        let (address, address_source) = self.factory.deployed_token_address(&receipt);
        log::info!("Token deployed at {:?} ({:?})", address, address_source);
        Ok(TokenCreationResult {
            address,
            address_source,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            supply: raw_supply.trim().to_string(),
            tx_hash: receipt.transaction_hash,
            created_at: Utc::now(),
        })
    }

    fn describe_fees(&self, schedule: &FeeSchedule) -> String {
        let native = &self.session.network().native_currency;
        let wrapped_symbol = self
            .session
            .wrapped_config()
            .map(|w| w.symbol.as_str())
            .unwrap_or(DEFAULT_WRAPPED_SYMBOL);
        schedule.describe(&native.symbol, wrapped_symbol, native.decimals)
    }

    /// Drop the held result and return the status to Idle.
    pub async fn dismiss_result(&self) {
        if self.status.is_busy() {
            return;
        }
        *self.result.write().await = None;
        self.status.reset();
    }

    /// Ask the wallet to track the created token. Does not touch the flow status.
    pub async fn add_created_token_to_wallet(&self) -> Result<bool, WalletError> {
        let result = self
            .created_token()
            .await
            .ok_or_else(|| WalletError::internal("No created token to add"))?;
        let request = result
            .watch_asset_request()
            .ok_or_else(|| WalletError::receipt_parsing("Created token address is unknown"))?;

        let provider = self.session.provider()?;
        match provider.watch_asset(request).await {
            Ok(accepted) => {
                log::info!("watchAsset for {} accepted: {}", result.symbol, accepted);
                Ok(accepted)
            }
            Err(e) => {
                log::error!("Adding token to wallet failed: {}", e);
                Err(WalletError::provider(e.message))
            }
        }
    }
}
