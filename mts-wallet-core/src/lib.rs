//! MTS Wallet Core
//!
//! Client-side transaction orchestration for the MTS token factory on Injective EVM.
//! Keys never live here: every transaction is handed to the user's wallet to sign.
//!
//! ## Architecture
//!
//! - **Core**: wallet session, fee resolution, token creation, wrap/unwrap, status tracking
//! - **Domain**: networks, token requests and results, the wallet session entity
//! - **Infrastructure**: the wallet provider seam and environment configuration
//! - **Shared**: common types, constants, errors and amount arithmetic
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mts_wallet_core::{init_wallet_core, TokenCreationRequest};
//!
//! # async fn run() -> Result<(), mts_wallet_core::WalletError> {
//! let core = init_wallet_core()?;
//! core.session.connect().await?;
//!
//! let request = TokenCreationRequest::new("Moon", "MOON", 18, "1000000");
//! core.token_creation.submit(&request).await?;
//! println!("{}", core.token_creation.status().message);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use crate::core::fees::{FeeResolver, FeeSchedule};
pub use crate::core::status::{OperationStatus, StatusKind, StatusStateMachine};
pub use crate::core::token_creation::TokenCreationFlow;
pub use crate::core::wallet::WalletSessionManager;
pub use crate::core::wrap::WrapUnwrapFlow;

pub use domain::{AddressSource, Network, TokenCreationRequest, TokenCreationResult, WalletSession};
pub use infrastructure::config::WalletCoreConfig;
pub use infrastructure::provider::{ProviderRpcError, RpcWalletProvider, WalletProvider};
pub use shared::error::{ValidationError, WalletError};
pub use shared::types::{FeeVariant, Submission, WrapDirection, WrapOperation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging
pub fn init() {
    // A host application may already have installed a logger
    let _ = env_logger::try_init();
}

/// The session and both flows, wired to one provider.
pub struct WalletCore {
    pub config: WalletCoreConfig,
    pub session: Arc<WalletSessionManager>,
    pub token_creation: TokenCreationFlow,
    pub wrap: WrapUnwrapFlow,
}

/// Everything a UI renders at once.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WalletCoreSnapshot {
    pub session: WalletSession,
    pub token_creation: OperationStatus,
    pub wrap: OperationStatus,
    pub created_token: Option<TokenCreationResult>,
}

impl WalletCore {
    /// `provider` is `None` when no wallet is available; connect then fails with a provider error.
    pub fn new(config: WalletCoreConfig, provider: Option<Arc<dyn WalletProvider>>) -> Result<Self, WalletError> {
        config.validate()?;
        let session = Arc::new(WalletSessionManager::new(&config, provider)?);
        let token_creation = TokenCreationFlow::new(session.clone())?;
        let wrap = WrapUnwrapFlow::new(session.clone());
        log::info!(
            "{} {} on {} (chain {}), fee variant {}",
            NAME,
            VERSION,
            config.network.name,
            config.network.chain_id,
            config.fee_variant.as_str()
        );
        Ok(Self { config, session, token_creation, wrap })
    }

    pub async fn snapshot(&self) -> WalletCoreSnapshot {
        WalletCoreSnapshot {
            session: self.session.snapshot().await,
            token_creation: self.token_creation.status(),
            wrap: self.wrap.status(),
            created_token: self.token_creation.created_token().await,
        }
    }
}

/// Initialize the wallet core from `.env` and the environment.
///
/// A provider is only installed when `MTS_WALLET_ENDPOINT` is set.
pub fn init_wallet_core() -> Result<WalletCore, WalletError> {
    let config = WalletCoreConfig::from_env()?;
    let provider: Option<Arc<dyn WalletProvider>> = match &config.wallet_endpoint {
        Some(endpoint) => Some(Arc::new(RpcWalletProvider::new(endpoint)?)),
        None => {
            log::warn!("No wallet endpoint configured");
            None
        }
    };
    WalletCore::new(config, provider)
}
