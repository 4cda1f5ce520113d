use super::{StoragePricing, sender_for};
use crate::{
    error::ContractError,
    types::{
        AllocationRail, Claim,
        IDDO::{self, IDDOErrors, IDDOInstance},
        PieceInfo, PieceRequest, SpBasicInfo, SpConfig, SpRegistration, TokenConfig,
    },
};
use alloy::{
    primitives::{Address, B256, U256},
    providers::DynProvider,
};
use async_trait::async_trait;
use tracing::instrument;

/// Client for the allocation (DDO) contract.
#[derive(Debug, Clone)]
pub struct DdoContract {
    inner: IDDOInstance<DynProvider>,
    sender: Option<Address>,
}

fn read_error(
    call: &'static str,
    expected: &'static str,
) -> impl FnOnce(alloy::contract::Error) -> ContractError {
    move |err| ContractError::read(call, expected, err).with_revert_reason::<IDDOErrors>()
}

fn write_error(call: &'static str) -> impl FnOnce(alloy::contract::Error) -> ContractError {
    move |err| ContractError::write(call, err).with_revert_reason::<IDDOErrors>()
}

impl DdoContract {
    /// Create a new [`DdoContract`]. Write calls are only possible with a `sender`.
    pub fn new(address: Address, provider: DynProvider, sender: Option<Address>) -> Self {
        Self { inner: IDDO::new(address, provider), sender }
    }

    /// The contract address.
    pub fn address(&self) -> Address {
        *self.inner.address()
    }

    /// Active price of `token` for `provider`, without the support checks of
    /// [`StoragePricing::sp_price`].
    pub async fn sp_active_price(&self, provider: u64, token: Address) -> Result<U256, ContractError> {
        self.inner
            .getSPActivePricePerBytePerEpoch(provider, token)
            .call()
            .await
            .map_err(read_error("getSPActivePricePerBytePerEpoch", "uint256"))
    }

    /// Provider configuration. Unregistered providers read back with a zero payment address.
    #[instrument(skip(self))]
    pub async fn sp_config(&self, provider: u64) -> Result<SpConfig, ContractError> {
        self.inner
            .spConfigs(provider)
            .call()
            .await
            .map(Into::into)
            .map_err(read_error("spConfigs", "(address,uint64,uint64,int64,int64,bool)"))
    }

    pub async fn sp_basic_info(&self, provider: u64) -> Result<SpBasicInfo, ContractError> {
        self.inner
            .getSPBasicInfo(provider)
            .call()
            .await
            .map(Into::into)
            .map_err(read_error("getSPBasicInfo", "(address,bool,uint256,uint64,uint64)"))
    }

    /// Tokens accepted by `provider`, active or not.
    pub async fn sp_supported_tokens(&self, provider: u64) -> Result<Vec<TokenConfig>, ContractError> {
        self.inner
            .getSPSupportedTokens(provider)
            .call()
            .await
            .map_err(read_error("getSPSupportedTokens", "(address,uint256,bool)[]"))
    }

    pub async fn is_sp_active(&self, provider: u64) -> Result<bool, ContractError> {
        self.inner.isSPActive(provider).call().await.map_err(read_error("isSPActive", "bool"))
    }

    pub async fn allocation_ids_for_client(&self, client: Address) -> Result<Vec<u64>, ContractError> {
        self.inner
            .getAllocationIdsForClient(client)
            .call()
            .await
            .map_err(read_error("getAllocationIdsForClient", "uint64[]"))
    }

    pub async fn allocation_ids_for_provider(&self, provider: u64) -> Result<Vec<u64>, ContractError> {
        self.inner
            .getAllocationIdsForProvider(provider)
            .call()
            .await
            .map_err(read_error("getAllocationIdsForProvider", "uint64[]"))
    }

    pub async fn allocation_provider(&self, allocation_id: u64) -> Result<u64, ContractError> {
        self.inner
            .allocationIdToProvider(allocation_id)
            .call()
            .await
            .map_err(read_error("allocationIdToProvider", "uint64"))
    }

    pub async fn allocation_rail_id(&self, allocation_id: u64) -> Result<U256, ContractError> {
        self.inner
            .allocationIdToRailId(allocation_id)
            .call()
            .await
            .map_err(read_error("allocationIdToRailId", "uint256"))
    }

    /// The rail paying for `allocation_id`, along with its provider.
    pub async fn allocation_rail_info(
        &self,
        allocation_id: u64,
    ) -> Result<AllocationRail, ContractError> {
        self.inner.getAllocationRailInfo(allocation_id).call().await.map(Into::into).map_err(
            read_error(
                "getAllocationRailInfo",
                "(uint256,uint64,(address,address,address,address,address,uint256,uint256,uint256,uint256,uint256,uint256,address))",
            ),
        )
    }

    /// Claims recorded for `client` under `claim_id`.
    pub async fn claim_info_for_client(
        &self,
        client: Address,
        claim_id: u64,
    ) -> Result<Vec<Claim>, ContractError> {
        self.inner
            .getClaimInfoForClient(client, claim_id)
            .call()
            .await
            .map_err(read_error(
                "getClaimInfoForClient",
                "(uint64,uint64,bytes,uint64,int64,int64,int64,uint64)[]",
            ))
    }

    /// The payments contract this allocation contract settles through.
    pub async fn payments_contract(&self) -> Result<Address, ContractError> {
        self.inner.paymentsContract().call().await.map_err(read_error("paymentsContract", "address"))
    }

    pub async fn epochs_per_month(&self) -> Result<U256, ContractError> {
        self.inner.EPOCHS_PER_MONTH().call().await.map_err(read_error("EPOCHS_PER_MONTH", "uint256"))
    }

    /// Submits `createAllocationRequests` for `pieces`.
    #[instrument(skip_all, fields(pieces = pieces.len()))]
    pub async fn create_allocation_requests(
        &self,
        pieces: &[PieceRequest],
    ) -> Result<B256, ContractError> {
        const CALL: &str = "createAllocationRequests";
        let sender = sender_for(self.sender, CALL)?;

        let pieces = pieces.iter().map(PieceInfo::from).collect::<Vec<_>>();
        let pending = self
            .inner
            .createAllocationRequests(pieces)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip_all, fields(actor_id = registration.actor_id))]
    pub async fn register_sp(&self, registration: &SpRegistration) -> Result<B256, ContractError> {
        const CALL: &str = "registerSP";
        let sender = sender_for(self.sender, CALL)?;

        let config = &registration.config;
        let pending = self
            .inner
            .registerSP(
                registration.actor_id,
                config.payment_address,
                config.min_piece_size,
                config.max_piece_size,
                config.min_term_length,
                config.max_term_length,
                registration.tokens.clone(),
            )
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    /// Replaces the provider's payment address and piece/term ranges. The active flag is ignored.
    #[instrument(skip(self, config))]
    pub async fn update_sp_config(
        &self,
        actor_id: u64,
        config: &SpConfig,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "updateSPConfig";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .updateSPConfig(
                actor_id,
                config.payment_address,
                config.min_piece_size,
                config.max_piece_size,
                config.min_term_length,
                config.max_term_length,
            )
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self))]
    pub async fn add_sp_token(
        &self,
        actor_id: u64,
        token: Address,
        price_per_byte_per_epoch: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "addSPToken";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .addSPToken(actor_id, token, price_per_byte_per_epoch)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self))]
    pub async fn update_sp_token(
        &self,
        actor_id: u64,
        token: Address,
        price_per_byte_per_epoch: U256,
        is_active: bool,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "updateSPToken";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .updateSPToken(actor_id, token, price_per_byte_per_epoch, is_active)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    /// Settles the rail of a single allocation up to `until_epoch`.
    #[instrument(skip(self))]
    pub async fn settle_sp_payment(
        &self,
        allocation_id: u64,
        until_epoch: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "settleSpPayment";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .settleSpPayment(allocation_id, until_epoch)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }

    /// Settles every rail of `provider` up to `until_epoch`.
    #[instrument(skip(self))]
    pub async fn settle_sp_total_payment(
        &self,
        provider: u64,
        until_epoch: U256,
    ) -> Result<B256, ContractError> {
        const CALL: &str = "settleSpTotalPayment";
        let sender = sender_for(self.sender, CALL)?;

        let pending = self
            .inner
            .settleSpTotalPayment(provider, until_epoch)
            .from(sender)
            .send()
            .await
            .map_err(write_error(CALL))?;

        Ok(*pending.tx_hash())
    }
}

#[async_trait]
impl StoragePricing for DdoContract {
    #[instrument(skip(self))]
    async fn calculate_storage_cost(
        &self,
        provider: u64,
        token: Address,
        size: u64,
        term: i64,
    ) -> Result<U256, ContractError> {
        self.inner
            .calculateStorageCost(provider, token, size, term)
            .call()
            .await
            .map_err(read_error("calculateStorageCost", "uint256"))
    }

    #[instrument(skip(self))]
    async fn sp_price(&self, provider: u64, token: Address) -> Result<U256, ContractError> {
        self.inner
            .getAndValidateSPPrice(provider, token)
            .call()
            .await
            .map_err(read_error("getAndValidateSPPrice", "uint256"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::{Provider, ProviderBuilder};

    fn read_only() -> DdoContract {
        let provider =
            ProviderBuilder::new().connect_http("http://127.0.0.1:1".parse().unwrap()).erased();
        DdoContract::new(Address::with_last_byte(1), provider, None)
    }

    #[tokio::test]
    async fn writes_require_a_signer() {
        let ddo = read_only();

        let err = ddo.create_allocation_requests(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            ContractError::UnauthorizedForWrite { call: "createAllocationRequests" }
        ));

        let err = ddo.settle_sp_total_payment(1, U256::from(100)).await.unwrap_err();
        assert!(matches!(err, ContractError::UnauthorizedForWrite { call: "settleSpTotalPayment" }));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_call_error() {
        let ddo = read_only();

        let err = ddo.allocation_provider(7).await.unwrap_err();
        assert!(matches!(err, ContractError::Call { call: "allocationIdToProvider", .. }));
    }
}
