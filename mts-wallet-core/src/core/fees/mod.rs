//! Factory fee discovery and the wrapped-token allowance it depends on

use serde::{Deserialize, Serialize};

use crate::core::contracts::{TokenFactory, WrappedToken};
use crate::core::transactions::TransactionManager;
use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, ApprovalOutcome, FeeVariant, U256};
use crate::shared::utils::{approval_threshold, format_amount, unlimited_allowance};

/// Fees charged by one `createToken` call, in smallest units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeeSchedule {
    NativeOnly { total_fee: U256 },
    NativeAndWrapped { creation_fee_wrapped: U256, bank_module_fee_native: U256 },
}

impl FeeSchedule {
    /// Value attached to the creation transaction. The wrapped portion is pulled via allowance.
    pub fn native_value(&self) -> U256 {
        match self {
            FeeSchedule::NativeOnly { total_fee } => *total_fee,
            FeeSchedule::NativeAndWrapped { bank_module_fee_native, .. } => *bank_module_fee_native,
        }
    }

    pub fn wrapped_fee(&self) -> Option<U256> {
        match self {
            FeeSchedule::NativeOnly { .. } => None,
            FeeSchedule::NativeAndWrapped { creation_fee_wrapped, .. } => Some(*creation_fee_wrapped),
        }
    }

    /// `2 INJ` or `1 wINJ + 1 INJ`
    pub fn describe(&self, native_symbol: &str, wrapped_symbol: &str, decimals: u8) -> String {
        match self {
            FeeSchedule::NativeOnly { total_fee } => {
                format!("{} {}", format_amount(*total_fee, decimals), native_symbol)
            }
            FeeSchedule::NativeAndWrapped { creation_fee_wrapped, bank_module_fee_native } => format!(
                "{} {} + {} {}",
                format_amount(*creation_fee_wrapped, decimals),
                wrapped_symbol,
                format_amount(*bank_module_fee_native, decimals),
                native_symbol
            ),
        }
    }
}

/// Reads the factory's fee constants. Nothing is cached; every creation attempt reads afresh.
pub struct FeeResolver {
    factory: TokenFactory,
    variant: FeeVariant,
}

impl FeeResolver {
    pub fn new(factory: TokenFactory, variant: FeeVariant) -> Self {
        Self { factory, variant }
    }

    pub async fn fetch_fee_schedule(&self, provider: &dyn WalletProvider) -> Result<FeeSchedule, WalletError> {
        let schedule = match self.variant {
            FeeVariant::NativeOnly => FeeSchedule::NativeOnly {
                total_fee: self.factory.total_fee(provider).await?,
            },
            FeeVariant::NativeAndWrapped => FeeSchedule::NativeAndWrapped {
                creation_fee_wrapped: self.factory.creation_fee(provider).await?,
                bank_module_fee_native: self.factory.bank_module_fee(provider).await?,
            },
        };
        log::info!("Fee schedule: {:?}", schedule);
        Ok(schedule)
    }
}

/// Approve `spender` for an unlimited amount unless the current allowance is already above the
/// threshold. Waits for the approval to confirm.
pub async fn ensure_allowance(
    provider: &dyn WalletProvider,
    transactions: &TransactionManager,
    wrapped: &WrappedToken,
    owner: Address,
    spender: Address,
) -> Result<ApprovalOutcome, WalletError> {
    let allowance = wrapped
        .allowance(provider, owner, spender)
        .await
        .map_err(|e| WalletError::approval(e.user_message()))?;
    if allowance >= approval_threshold() {
        log::info!("Allowance for {:?} already sufficient", spender);
        return Ok(ApprovalOutcome::Sufficient { allowance });
    }

    log::info!("Approving {:?} to spend wrapped tokens", spender);
    let tx = wrapped.approve_tx(owner, spender, unlimited_allowance())?;
    let receipt = transactions
        .send_and_confirm(tx)
        .await
        .map_err(|e| WalletError::approval(e.user_message()))?;
    Ok(ApprovalOutcome::Approved { tx_hash: receipt.transaction_hash })
}
