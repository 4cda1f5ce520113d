use super::{PaymentsApi, sender_for};
use crate::{
    error::ContractError,
    types::{
        Account, AccumulatedFees, IPayments::{self, IPaymentsErrors, IPaymentsInstance},
        OperatorApproval, RailInfo, RailView, SettledAccountInfo,
    },
};
use alloy::{
    primitives::{Address, B256, U256},
    providers::DynProvider,
};
use async_trait::async_trait;
use tracing::instrument;

/// Client for the payments contract.
#[derive(Debug, Clone)]
pub struct PaymentsContract {
    inner: IPaymentsInstance<DynProvider>,
    sender: Option<Address>,
}

fn read_error(
    call: &'static str,
    expected: &'static str,
) -> impl FnOnce(alloy::contract::Error) -> ContractError {
    move |err| ContractError::read(call, expected, err).with_revert_reason::<IPaymentsErrors>()
}

fn write_error(call: &'static str) -> impl FnOnce(alloy::contract::Error) -> ContractError {
    move |err| ContractError::write(call, err).with_revert_reason::<IPaymentsErrors>()
}

impl PaymentsContract {
    /// Create a new [`PaymentsContract`]. Write calls are only possible with a `sender`.
    pub fn new(address: Address, provider: DynProvider, sender: Option<Address>) -> Self {
        Self { inner: IPayments::new(address, provider), sender }
    }

    pub async fn rail(&self, rail_id: U256) -> Result<RailView, ContractError> {
        self.inner.getRail(rail_id).call().await.map_err(read_error(
            "getRail",
            "(address,address,address,address,address,uint256,uint256,uint256,uint256,uint256,uint256,address)",
        ))
    }

    /// Rails paid by `payer` in `token`.
    pub async fn rails_for_payer(
        &self,
        payer: Address,
        token: Address,
    ) -> Result<Vec<RailInfo>, ContractError> {
        self.inner
            .getRailsForPayerAndToken(payer, token)
            .call()
            .await
            .map_err(read_error("getRailsForPayerAndToken", "(uint256,bool,uint256)[]"))
    }

    /// Rails paying `payee` in `token`.
    pub async fn rails_for_payee(
        &self,
        payee: Address,
        token: Address,
    ) -> Result<Vec<RailInfo>, ContractError> {
        self.inner
            .getRailsForPayeeAndToken(payee, token)
            .call()
            .await
            .map_err(read_error("getRailsForPayeeAndToken", "(uint256,bool,uint256)[]"))
    }

    pub async fn accumulated_fees(&self, token: Address) -> Result<U256, ContractError> {
        self.inner.accumulatedFees(token).call().await.map_err(read_error("accumulatedFees", "uint256"))
    }

    pub async fn has_collected_fees(&self, token: Address) -> Result<bool, ContractError> {
        self.inner.hasCollectedFees(token).call().await.map_err(read_error("hasCollectedFees", "bool"))
    }

    /// Fees accumulated across all tokens.
    pub async fn all_accumulated_fees(&self) -> Result<AccumulatedFees, ContractError> {
        self.inner
            .getAllAccumulatedFees()
            .call()
            .await
            .map(Into::into)
            .map_err(read_error("getAllAccumulatedFees", "(address[],uint256[],uint256)"))
    }

    /// Account state as if all of the owner's rails were settled now.
    pub async fn account_info_if_settled(
        &self,
        token: Address,
        owner: Address,
    ) -> Result<SettledAccountInfo, ContractError> {
        self.inner
            .getAccountInfoIfSettled(token, owner)
            .call()
            .await
            .map(Into::into)
            .map_err(read_error("getAccountInfoIfSettled", "(uint256,uint256,uint256,uint256)"))
    }

    pub async fn commission_max_bps(&self) -> Result<U256, ContractError> {
        self.inner.COMMISSION_MAX_BPS().call().await.map_err(read_error("COMMISSION_MAX_BPS", "uint256"))
    }

    pub async fn payment_fee_bps(&self) -> Result<U256, ContractError> {
        self.inner.PAYMENT_FEE_BPS().call().await.map_err(read_error("PAYMENT_FEE_BPS", "uint256"))
    }

    /// Withdraws `amount` of `token` to the sender.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, token: Address, amount: U256) -> Result<B256, ContractError> {
        const CALL: &str = "withdraw";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .withdraw(token, amount)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    /// Withdraws `amount` of `token` to `to`.
    #[instrument(skip(self))]
    pub async fn withdraw_to(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "withdrawTo";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .withdrawTo(token, to, amount)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self))]
    pub async fn settle_rail(&self, rail_id: U256, until_epoch: U256) -> Result<B256, ContractError> {
        const CALL: &str = "settleRail";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .settleRail(rail_id, until_epoch)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }
}

#[async_trait]
impl PaymentsApi for PaymentsContract {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    #[instrument(skip(self))]
    async fn account(&self, token: Address, owner: Address) -> Result<Account, ContractError> {
        self.inner
            .accounts(token, owner)
            .call()
            .await
            .map(Into::into)
            .map_err(read_error("accounts", "(uint256,uint256,uint256,uint256)"))
    }

    #[instrument(skip(self))]
    async fn operator_approval(
        &self,
        token: Address,
        client: Address,
        operator: Address,
    ) -> Result<OperatorApproval, ContractError> {
        self.inner
            .operatorApprovals(token, client, operator)
            .call()
            .await
            .map(Into::into)
            .map_err(read_error(
                "operatorApprovals",
                "(bool,uint256,uint256,uint256,uint256,uint256)",
            ))
    }

    #[instrument(skip(self))]
    async fn deposit(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "deposit";
        let sender = sender_for(self.sender, CALL)?;

        // the native token is deposited as call value
        let value = if token.is_zero() { amount } else { U256::ZERO };
        let pending = self
            .inner
            .deposit(token, to, amount)
            .from(sender)
            .value(value)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self))]
    async fn set_operator_approval(
        &self,
        token: Address,
        operator: Address,
        approved: bool,
        rate_allowance: U256,
        lockup_allowance: U256,
        max_lockup_period: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "setOperatorApproval";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .setOperatorApproval(
                token,
                operator,
                approved,
                rate_allowance,
                lockup_allowance,
                max_lockup_period,
            )
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::{Provider, ProviderBuilder};

    fn read_only() -> PaymentsContract {
        let provider =
            ProviderBuilder::new().connect_http("http://127.0.0.1:1".parse().unwrap()).erased();
        PaymentsContract::new(Address::with_last_byte(2), provider, None)
    }

    #[tokio::test]
    async fn writes_require_a_signer() {
        let payments = read_only();
        let token = Address::with_last_byte(9);

        let err = payments.settle_rail(U256::from(1), U256::from(100)).await.unwrap_err();
        assert!(matches!(err, ContractError::UnauthorizedForWrite { call: "settleRail" }));

        let err = payments.withdraw_to(token, Address::ZERO, U256::from(1)).await.unwrap_err();
        assert!(matches!(err, ContractError::UnauthorizedForWrite { call: "withdrawTo" }));

        let err = payments.deposit(token, Address::ZERO, U256::from(1)).await.unwrap_err();
        assert!(matches!(err, ContractError::UnauthorizedForWrite { call: "deposit" }));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_call_error() {
        let payments = read_only();

        let err = payments.rails_for_payer(Address::ZERO, Address::ZERO).await.unwrap_err();
        assert!(matches!(err, ContractError::Call { call: "getRailsForPayerAndToken", .. }));
    }
}
