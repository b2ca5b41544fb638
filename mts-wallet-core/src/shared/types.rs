use serde::{Deserialize, Serialize};

// Chain primitives come straight from ethers
pub use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256};

pub type TransactionHash = H256;

/// Which fee shape a factory deployment charges.
///
/// Fixed per deployment, so it is configuration rather than something discovered per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeeVariant {
    /// Entire fee sent as native value.
    NativeOnly,
    /// Creation fee pulled in the wrapped token via allowance, bank-module fee sent natively.
    NativeAndWrapped,
}

impl FeeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeVariant::NativeOnly => "native_only",
            FeeVariant::NativeAndWrapped => "native_and_wrapped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "native_only" | "native" => Some(FeeVariant::NativeOnly),
            "native_and_wrapped" | "wrapped" => Some(FeeVariant::NativeAndWrapped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WrapDirection {
    Wrap,
    Unwrap,
}

/// A requested conversion between native currency and its wrapped form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrapOperation {
    pub direction: WrapDirection,
    /// Positive decimal string in whole units, e.g. `"1.5"`.
    pub amount: String,
}

impl WrapOperation {
    pub fn wrap(amount: impl Into<String>) -> Self {
        Self { direction: WrapDirection::Wrap, amount: amount.into() }
    }

    pub fn unwrap(amount: impl Into<String>) -> Self {
        Self { direction: WrapDirection::Unwrap, amount: amount.into() }
    }
}

/// Outcome of triggering a guarded flow.
///
/// `AlreadyPending` means the flow had an operation in flight and the call did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    Settled(T),
    AlreadyPending,
}

impl<T> Submission<T> {
    pub fn settled(self) -> Option<T> {
        match self {
            Submission::Settled(value) => Some(value),
            Submission::AlreadyPending => None,
        }
    }

    pub fn is_already_pending(&self) -> bool {
        matches!(self, Submission::AlreadyPending)
    }
}

/// What the connect-time allowance step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalOutcome {
    /// Fee variant does not pull wrapped tokens.
    NotRequired,
    /// Existing allowance already above the threshold.
    Sufficient { allowance: U256 },
    /// Approval transaction confirmed.
    Approved { tx_hash: TransactionHash },
    /// Approval failed; connect continued regardless.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOutcome {
    pub address: Address,
    pub approval: ApprovalOutcome,
}
