//! Scripted in-memory wallet for flow tests
//!
//! Answers fee and ERC20 reads by selector and applies approve/deposit/withdraw/createToken to its
//! own state when the transaction is mined.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::abi::{decode, encode, ParamType, Token};
use ethers::types::{Log, NameOrAddress, U64};
use ethers::utils::id;
use tokio::sync::Notify;

use super::{ProviderRpcError, WalletProvider};
use crate::core::contracts::TokenFactory;
use crate::domain::{ChainParameters, WatchAssetRequest};
use crate::shared::types::{Address, Bytes, TransactionHash, TransactionReceipt, TransactionRequest, H256, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptLogs {
    /// Token log first, then the factory's `TokenCreated` event.
    WithEvent,
    /// Two anonymous logs, the token's own second.
    Positional,
    /// A single unrelated log.
    Empty,
}

#[derive(Debug)]
pub struct FakeState {
    pub account: Address,
    pub native_balance: U256,
    pub wrapped_balance: U256,
    pub allowance: U256,
    pub total_fee: U256,
    pub creation_fee: U256,
    pub bank_module_fee: U256,
    pub deployed_token: Address,
    pub receipt_logs: ReceiptLogs,
    pub reject_add_chain: Option<ProviderRpcError>,
    pub reject_accounts: Option<ProviderRpcError>,
    pub reject_send: Option<ProviderRpcError>,
    pub fail_balance: Option<ProviderRpcError>,
    pub revert_selector: Option<[u8; 4]>,
    /// Every provider call, in order: `add_chain`, `approve`, `balanceOf`...
    pub journal: Vec<String>,
    pub sent: Vec<TransactionRequest>,
    pub watched: Vec<WatchAssetRequest>,
    receipts: HashMap<TransactionHash, TransactionReceipt>,
    nonce: u64,
}

pub struct FakeWallet {
    pub factory: Address,
    pub wrapped_token: Address,
    state: Mutex<FakeState>,
    /// When set, `wait_for_receipt` blocks until notified.
    pub gate: Option<Arc<Notify>>,
    /// When set, `send_transaction` blocks until notified.
    pub send_gate: Option<Arc<Notify>>,
    /// When set, only `createToken` sends block until notified.
    pub create_gate: Option<Arc<Notify>>,
}

pub fn one(units: u64) -> U256 {
    U256::from(units) * U256::exp10(18)
}

fn selector(signature: &str) -> [u8; 4] {
    id(signature)
}

impl FakeWallet {
    pub fn new(factory: Address, wrapped_token: Address) -> Self {
        Self {
            factory,
            wrapped_token,
            gate: None,
            send_gate: None,
            create_gate: None,
            state: Mutex::new(FakeState {
                account: Address::repeat_byte(0xaa),
                native_balance: one(10),
                wrapped_balance: one(5),
                allowance: U256::zero(),
                total_fee: one(2),
                creation_fee: one(1),
                bank_module_fee: one(1),
                deployed_token: Address::repeat_byte(0x70),
                receipt_logs: ReceiptLogs::WithEvent,
                reject_add_chain: None,
                reject_accounts: None,
                reject_send: None,
                fail_balance: None,
                revert_selector: None,
                journal: Vec::new(),
                sent: Vec::new(),
                watched: Vec::new(),
                receipts: HashMap::new(),
                nonce: 0,
            }),
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn gated_send(mut self, gate: Arc<Notify>) -> Self {
        self.send_gate = Some(gate);
        self
    }

    pub fn gated_create(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn journal(&self) -> Vec<String> {
        self.with(|s| s.journal.clone())
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.with(|s| s.sent.clone())
    }

    /// Sent transactions whose calldata starts with `signature`'s selector.
    pub fn sent_matching(&self, signature: &str) -> Vec<TransactionRequest> {
        let wanted = selector(signature);
        self.sent().into_iter().filter(|tx| tx_selector(tx) == Some(wanted)).collect()
    }

    fn mine(&self, state: &mut FakeState, tx: &TransactionRequest, hash: TransactionHash) -> TransactionReceipt {
        let data = tx.data.clone().unwrap_or_default();
        let value = tx.value.unwrap_or_default();
        let sel = tx_selector(tx);
        let args = data.get(4..).unwrap_or_default();
        let mut logs = Vec::new();

        let reverted = sel.is_some() && sel == state.revert_selector;
        // ERC20 calls only land when addressed to the wrapped token
        let to_wrapped = tx.to.as_ref().and_then(NameOrAddress::as_address) == Some(&self.wrapped_token);
        if !reverted {
            state.native_balance = state.native_balance.saturating_sub(value);
            if to_wrapped && sel == Some(selector("approve(address,uint256)")) {
                if let Ok(tokens) = decode(&[ParamType::Address, ParamType::Uint(256)], args) {
                    state.allowance = tokens[1].clone().into_uint().unwrap_or_default();
                }
            } else if to_wrapped && sel == Some(selector("deposit()")) {
                state.wrapped_balance += value;
            } else if to_wrapped && sel == Some(selector("withdraw(uint256)")) {
                if let Ok(tokens) = decode(&[ParamType::Uint(256)], args) {
                    let amount = tokens[0].clone().into_uint().unwrap_or_default();
                    state.wrapped_balance = state.wrapped_balance.saturating_sub(amount);
                    state.native_balance += amount;
                }
            } else if sel == Some(selector("createToken(string,string,uint8,uint256)")) {
                if state.allowance >= state.creation_fee && value < state.total_fee {
                    state.wrapped_balance = state.wrapped_balance.saturating_sub(state.creation_fee);
                }
                logs = self.creation_logs(state);
            }
        }

        TransactionReceipt {
            transaction_hash: hash,
            status: Some(U64::from(if reverted { 0 } else { 1 })),
            logs,
            ..Default::default()
        }
    }

    fn creation_logs(&self, state: &FakeState) -> Vec<Log> {
        let token = state.deployed_token;
        let plain = |address: Address| Log { address, ..Default::default() };
        match state.receipt_logs {
            ReceiptLogs::WithEvent => {
                let topic = TokenFactory::new(self.factory)
                    .and_then(|f| f.token_created_topic())
                    .unwrap_or_default();
                vec![
                    plain(token),
                    Log {
                        address: self.factory,
                        topics: vec![topic, H256::from(token), H256::from(state.account)],
                        ..Default::default()
                    },
                ]
            }
            ReceiptLogs::Positional => vec![plain(self.factory), plain(token)],
            ReceiptLogs::Empty => vec![plain(self.factory)],
        }
    }
}

fn tx_selector(tx: &TransactionRequest) -> Option<[u8; 4]> {
    let data = tx.data.as_ref()?;
    let bytes = data.get(..4)?;
    let mut sel = [0u8; 4];
    sel.copy_from_slice(bytes);
    Some(sel)
}

fn uint(value: U256) -> Bytes {
    Bytes::from(encode(&[Token::Uint(value)]))
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn add_chain(&self, _params: ChainParameters) -> Result<(), ProviderRpcError> {
        self.with(|s| {
            s.journal.push("add_chain".into());
            s.reject_add_chain.clone().map_or(Ok(()), Err)
        })
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderRpcError> {
        self.with(|s| {
            s.journal.push("request_accounts".into());
            s.reject_accounts.clone().map_or(Ok(vec![s.account]), Err)
        })
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, ProviderRpcError> {
        self.with(|s| {
            s.journal.push("get_balance".into());
            s.fail_balance.clone().map_or(Ok(s.native_balance), Err)
        })
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ProviderRpcError> {
        let sel = tx_selector(&tx);
        self.with(|s| {
            let (name, value) = if sel == Some(selector("TOTAL_FEE()")) {
                ("TOTAL_FEE", s.total_fee)
            } else if sel == Some(selector("CREATION_FEE()")) {
                ("CREATION_FEE", s.creation_fee)
            } else if sel == Some(selector("BANK_MODULE_FEE()")) {
                ("BANK_MODULE_FEE", s.bank_module_fee)
            } else if sel == Some(selector("allowance(address,address)")) {
                ("allowance", s.allowance)
            } else if sel == Some(selector("balanceOf(address)")) {
                if let Some(err) = s.fail_balance.clone() {
                    return Err(err);
                }
                ("balanceOf", s.wrapped_balance)
            } else {
                return Err(ProviderRpcError::new(Some(-32000), "execution reverted"));
            };
            s.journal.push(name.into());
            Ok(uint(value))
        })
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionHash, ProviderRpcError> {
        let sel = tx_selector(&tx);
        if let Some(gate) = &self.send_gate {
            gate.notified().await;
        }
        if let Some(gate) = &self.create_gate {
            if sel == Some(selector("createToken(string,string,uint8,uint256)")) {
                gate.notified().await;
            }
        }
        self.with(|s| {
            let name = match sel {
                Some(x) if x == selector("approve(address,uint256)") => "approve",
                Some(x) if x == selector("deposit()") => "deposit",
                Some(x) if x == selector("withdraw(uint256)") => "withdraw",
                Some(x) if x == selector("createToken(string,string,uint8,uint256)") => "createToken",
                _ => "send",
            };
            s.journal.push(name.into());
            if let Some(err) = s.reject_send.clone() {
                return Err(err);
            }
            s.nonce += 1;
            let hash = H256::from_low_u64_be(s.nonce);
            s.sent.push(tx.clone());
            let receipt = self.mine(s, &tx, hash);
            s.receipts.insert(hash, receipt);
            Ok(hash)
        })
    }

    async fn wait_for_receipt(
        &self,
        hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>, ProviderRpcError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.with(|s| s.receipts.get(&hash).cloned()))
    }

    async fn watch_asset(&self, request: WatchAssetRequest) -> Result<bool, ProviderRpcError> {
        self.with(|s| {
            s.journal.push("watch_asset".into());
            s.watched.push(request);
            Ok(true)
        })
    }
}

mod tests {
    use super::*;
    use crate::core::contracts::WrappedToken;

    #[tokio::test]
    async fn test_deposit_to_other_contract_does_not_mint() {
        let wallet = FakeWallet::new(Address::repeat_byte(0x71), Address::repeat_byte(0xee));
        let account = Address::repeat_byte(0xaa);

        let elsewhere = WrappedToken::new(Address::repeat_byte(0x01)).unwrap();
        wallet.send_transaction(elsewhere.deposit_tx(account, one(1)).unwrap()).await.unwrap();
        assert_eq!(wallet.with(|s| s.wrapped_balance), one(5));

        let wrapped = WrappedToken::new(wallet.wrapped_token).unwrap();
        wallet.send_transaction(wrapped.deposit_tx(account, one(1)).unwrap()).await.unwrap();
        assert_eq!(wallet.with(|s| s.wrapped_balance), one(6));
        assert_eq!(wallet.with(|s| s.native_balance), one(8));
    }
}
