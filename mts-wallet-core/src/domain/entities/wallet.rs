//! Wallet session entity for the wallet core

use serde::{Deserialize, Serialize};

use crate::shared::constants::BALANCE_DISPLAY_DECIMALS;
use crate::shared::types::{Address, U256};
use crate::shared::utils::{format_fixed, shorten_address};

/// Connected account and its cached balances.
///
/// `connected` implies `address` is set. Balances are whatever was last read from the chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<Address>,
    pub native_balance: U256,
    /// `None` when no wrapped token is configured.
    pub wrapped_balance: Option<U256>,
    pub connected: bool,
}

impl WalletSession {
    pub fn connected(address: Address) -> Self {
        Self { address: Some(address), connected: true, ..Default::default() }
    }

    pub fn is_connected(&self) -> bool {
        self.connected && self.address.is_some()
    }

    /// The account address, only while connected.
    pub fn account(&self) -> Option<Address> {
        if self.connected {
            self.address
        } else {
            None
        }
    }

    pub fn short_address(&self) -> Option<String> {
        self.address.as_ref().map(shorten_address)
    }

    pub fn native_balance_display(&self, decimals: u8) -> String {
        format_fixed(self.native_balance, decimals, BALANCE_DISPLAY_DECIMALS)
    }

    pub fn wrapped_balance_display(&self, decimals: u8) -> Option<String> {
        self.wrapped_balance
            .map(|balance| format_fixed(balance, decimals, BALANCE_DISPLAY_DECIMALS))
    }
}
