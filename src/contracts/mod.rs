//! Typed adapters over the allocation, payments and ERC-20 contracts.
//!
//! The traits cover what the cost calculator and the payment setup need, so both can run against
//! in-memory implementations. Everything else is an inherent method on the alloy-backed clients.
use crate::{
    error::ContractError,
    types::{Account, OperatorApproval},
};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use core::fmt::Debug;

mod ddo;
pub use ddo::DdoContract;

mod erc20;
pub use erc20::Erc20Token;

mod payments;
pub use payments::PaymentsContract;

/// Storage pricing of the allocation contract.
#[async_trait]
pub trait StoragePricing: Debug + Send + Sync {
    /// Quotes the total cost of storing `size` bytes with `provider` for `term` epochs.
    async fn calculate_storage_cost(
        &self,
        provider: u64,
        token: Address,
        size: u64,
        term: i64,
    ) -> Result<U256, ContractError>;

    /// Returns the provider's price per byte per epoch for `token`, failing if unsupported.
    async fn sp_price(&self, provider: u64, token: Address) -> Result<U256, ContractError>;
}

/// Account and operator management of the payments contract.
#[async_trait]
pub trait PaymentsApi: Debug + Send + Sync {
    /// The payments contract address.
    fn address(&self) -> Address;

    /// Reads the `(token, owner)` account.
    async fn account(&self, token: Address, owner: Address) -> Result<Account, ContractError>;

    /// Reads the `(token, client, operator)` approval.
    async fn operator_approval(
        &self,
        token: Address,
        client: Address,
        operator: Address,
    ) -> Result<OperatorApproval, ContractError>;

    /// Deposits `amount` of `token` into `to`'s account.
    async fn deposit(&self, token: Address, to: Address, amount: U256)
    -> Result<B256, ContractError>;

    /// Sets the sender's approval for `operator`.
    async fn set_operator_approval(
        &self,
        token: Address,
        operator: Address,
        approved: bool,
        rate_allowance: U256,
        lockup_allowance: U256,
        max_lockup_period: U256,
    ) -> Result<B256, ContractError>;
}

/// An ERC-20 token.
#[async_trait]
pub trait TokenApi: Debug + Send + Sync {
    /// Balance of `owner`.
    async fn balance_of(&self, owner: Address) -> Result<U256, ContractError>;

    /// Allowance granted by `owner` to `spender`.
    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError>;

    /// Approves `spender` for `amount`.
    async fn approve(&self, spender: Address, amount: U256) -> Result<B256, ContractError>;
}

/// Hands out [`TokenApi`] handles by address.
pub trait TokenFactory: Debug + Send + Sync {
    /// Returns the token at `address`.
    fn token(&self, address: Address) -> Box<dyn TokenApi>;
}

/// Returns the signing address, or fails the write call `call`.
fn sender_for(sender: Option<Address>, call: &'static str) -> Result<Address, ContractError> {
    sender.ok_or(ContractError::UnauthorizedForWrite { call })
}
