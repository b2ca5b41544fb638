//! Contract bindings for the token factory and the wrapped native token
//!
//! Both are consumed only through their ABI. Calldata is built with `ethers::abi` from
//! human-readable signatures; reads go through the wallet's `eth_call`.

use ethers::abi::{parse_abi, Abi, Function, Token};
use log::warn;

use crate::domain::{AddressSource, ValidatedToken};
use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256};

pub const FACTORY_ABI: &[&str] = &[
    "function TOTAL_FEE() external view returns (uint256)",
    "function CREATION_FEE() external view returns (uint256)",
    "function BANK_MODULE_FEE() external view returns (uint256)",
    concat!(
        "function createToken(string name, string symbol, uint8 decimals, uint256 initialSupply)",
        " external payable returns (address)",
    ),
    concat!(
        "event TokenCreated(address indexed token, address indexed creator,",
        " string name, string symbol, uint8 decimals, uint256 initialSupply)",
    ),
];

pub const WRAPPED_TOKEN_ABI: &[&str] = &[
    "function deposit() external payable",
    "function withdraw(uint256 wad) external",
    "function approve(address spender, uint256 amount) external returns (bool)",
    "function allowance(address owner, address spender) external view returns (uint256)",
    "function balanceOf(address account) external view returns (uint256)",
];

fn load_abi(signatures: &[&str]) -> Result<Abi, WalletError> {
    parse_abi(signatures).map_err(|e| WalletError::internal(format!("ABI parse error: {}", e)))
}

fn function<'a>(abi: &'a Abi, name: &str) -> Result<&'a Function, WalletError> {
    abi.function(name).map_err(WalletError::from)
}

/// `eth_call` a function taking `inputs` and returning a single `uint256`.
async fn read_uint(
    provider: &dyn WalletProvider,
    contract: Address,
    function: &Function,
    inputs: &[Token],
) -> Result<U256, WalletError> {
    let data = function.encode_input(inputs)?;
    let tx = TransactionRequest::new().to(contract).data(data);
    let output = provider
        .call(tx)
        .await
        .map_err(|e| WalletError::network(e.message))?;

    function
        .decode_output(&output)?
        .into_iter()
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| WalletError::internal(format!("{} returned no uint256", function.name)))
}

/// The token factory.
#[derive(Debug, Clone)]
pub struct TokenFactory {
    address: Address,
    abi: Abi,
}

impl TokenFactory {
    pub fn new(address: Address) -> Result<Self, WalletError> {
        Ok(Self { address, abi: load_abi(FACTORY_ABI)? })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn total_fee(&self, provider: &dyn WalletProvider) -> Result<U256, WalletError> {
        self.read_fee(provider, "TOTAL_FEE").await
    }

    pub async fn creation_fee(&self, provider: &dyn WalletProvider) -> Result<U256, WalletError> {
        self.read_fee(provider, "CREATION_FEE").await
    }

    pub async fn bank_module_fee(&self, provider: &dyn WalletProvider) -> Result<U256, WalletError> {
        self.read_fee(provider, "BANK_MODULE_FEE").await
    }

    async fn read_fee(&self, provider: &dyn WalletProvider, name: &str) -> Result<U256, WalletError> {
        read_uint(provider, self.address, function(&self.abi, name)?, &[]).await
    }

    /// `createToken` from `from`, carrying `value` as native payment.
    pub fn create_token_tx(
        &self,
        from: Address,
        token: &ValidatedToken,
        value: U256,
    ) -> Result<TransactionRequest, WalletError> {
        let data = function(&self.abi, "createToken")?.encode_input(&[
            Token::String(token.name.clone()),
            Token::String(token.symbol.clone()),
            Token::Uint(U256::from(token.decimals)),
            Token::Uint(token.scaled_supply),
        ])?;
        Ok(TransactionRequest::new()
            .from(from)
            .to(self.address)
            .value(value)
            .data(data))
    }

    pub fn token_created_topic(&self) -> Result<H256, WalletError> {
        Ok(self.abi.event("TokenCreated")?.signature())
    }

    /// Locate the deployed token in a `createToken` receipt.
    ///
    /// Prefers the factory's `TokenCreated` event. Falls back to the address of the second log,
    /// which holds only while the factory emits the token's own log first.
    pub fn deployed_token_address(&self, receipt: &TransactionReceipt) -> (Option<Address>, AddressSource) {
        if let Ok(topic) = self.token_created_topic() {
            let from_event = receipt.logs.iter().find_map(|log| {
                let matches = log.address == self.address && log.topics.first() == Some(&topic);
                match log.topics.get(1) {
                    Some(token) if matches => Some(Address::from(*token)),
                    _ => None,
                }
            });
            if let Some(address) = from_event {
                return (Some(address), AddressSource::TokenCreatedEvent);
            }
        }

        match receipt.logs.get(1) {
            Some(log) => (Some(log.address), AddressSource::LogPosition),
            None => {
                warn!(
                    "Deployed token address not found in receipt {:?} ({} logs)",
                    receipt.transaction_hash,
                    receipt.logs.len()
                );
                (None, AddressSource::Missing)
            }
        }
    }
}

/// The wrapped native token (WETH-style deposit/withdraw plus ERC20).
#[derive(Debug, Clone)]
pub struct WrappedToken {
    address: Address,
    abi: Abi,
}

impl WrappedToken {
    pub fn new(address: Address) -> Result<Self, WalletError> {
        Ok(Self { address, abi: load_abi(WRAPPED_TOKEN_ABI)? })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn balance_of(&self, provider: &dyn WalletProvider, owner: Address) -> Result<U256, WalletError> {
        let balance_of = function(&self.abi, "balanceOf")?;
        read_uint(provider, self.address, balance_of, &[Token::Address(owner)]).await
    }

    pub async fn allowance(
        &self,
        provider: &dyn WalletProvider,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError> {
        let allowance = function(&self.abi, "allowance")?;
        read_uint(
            provider,
            self.address,
            allowance,
            &[Token::Address(owner), Token::Address(spender)],
        )
        .await
    }

    pub fn approve_tx(&self, from: Address, spender: Address, amount: U256) -> Result<TransactionRequest, WalletError> {
        let data = function(&self.abi, "approve")?
            .encode_input(&[Token::Address(spender), Token::Uint(amount)])?;
        Ok(self.tx(from, data))
    }

    pub fn deposit_tx(&self, from: Address, amount: U256) -> Result<TransactionRequest, WalletError> {
        let data = function(&self.abi, "deposit")?.encode_input(&[])?;
        Ok(self.tx(from, data).value(amount))
    }

    pub fn withdraw_tx(&self, from: Address, amount: U256) -> Result<TransactionRequest, WalletError> {
        let data = function(&self.abi, "withdraw")?.encode_input(&[Token::Uint(amount)])?;
        Ok(self.tx(from, data))
    }

    fn tx(&self, from: Address, data: Vec<u8>) -> TransactionRequest {
        TransactionRequest::new().from(from).to(self.address).data(Bytes::from(data))
    }
}
