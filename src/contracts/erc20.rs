use super::{TokenApi, sender_for};
use crate::{
    error::ContractError,
    types::IERC20::{self, IERC20Errors, IERC20Instance},
};
use alloy::{
    primitives::{Address, B256, U256},
    providers::DynProvider,
};
use async_trait::async_trait;
use tracing::instrument;

/// Client for an ERC-20 token.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    inner: IERC20Instance<DynProvider>,
    sender: Option<Address>,
}

impl Erc20Token {
    /// Create a new [`Erc20Token`]. Approvals are only possible with a `sender`.
    pub fn new(address: Address, provider: DynProvider, sender: Option<Address>) -> Self {
        Self { inner: IERC20::new(address, provider), sender }
    }

    /// The token address.
    pub fn address(&self) -> Address {
        *self.inner.address()
    }

    pub async fn decimals(&self) -> Result<u8, ContractError> {
        self.inner
            .decimals()
            .call()
            .await
            .map_err(|err| ContractError::read("decimals", "uint8", err))
    }

    pub async fn symbol(&self) -> Result<String, ContractError> {
        self.inner.symbol().call().await.map_err(|err| ContractError::read("symbol", "string", err))
    }
}

#[async_trait]
impl TokenApi for Erc20Token {
    #[instrument(skip(self), fields(token = %self.address()))]
    async fn balance_of(&self, owner: Address) -> Result<U256, ContractError> {
        self.inner
            .balanceOf(owner)
            .call()
            .await
            .map_err(|err| ContractError::read("balanceOf", "uint256", err))
    }

    #[instrument(skip(self), fields(token = %self.address()))]
    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError> {
        self.inner
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|err| ContractError::read("allowance", "uint256", err))
    }

    #[instrument(skip(self), fields(token = %self.address()))]
    async fn approve(&self, spender: Address, amount: U256) -> Result<B256, ContractError> {
        const CALL: &str = "approve";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .approve(spender, amount)
            .from(sender)
            .send()
            .await
            .map_err(|err| ContractError::write(CALL, err).with_revert_reason::<IERC20Errors>())?;

        Ok(*pending.tx_hash())
    }
}
