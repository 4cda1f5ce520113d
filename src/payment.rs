//! Payment setup ahead of allocation creation.
//!
//! Before allocations can be created, the client's payments account must hold twice the storage
//! cost, and the allocation contract must be an approved operator with enough rate and lockup
//! allowance. [`PaymentSetup`] checks each of these against live chain state and submits only the
//! transactions that are missing, one after the other.
use crate::{
    confirm::ConfirmationWaiter,
    constants::EPOCHS_PER_MONTH,
    contracts::{PaymentsApi, StoragePricing, TokenFactory},
    cost::calculate_storage_costs,
    error::{CostError, PaymentSetupError},
    types::{OperatorApproval, PieceRequest},
};
use alloy::primitives::{Address, B256, U256};
use serde::Serialize;
use tracing::{info, instrument};

/// What the payment setup computed and which transactions it sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSetupResult {
    /// Sum of the per-piece cost quotes.
    pub total_storage_cost: U256,
    /// One month of payments at the batch's rate.
    pub one_month_allowance: U256,
    /// Funds that must be available in the payments account.
    pub required_deposit: U256,
    /// Token the batch pays with.
    pub token: Address,
    /// ERC-20 approval of the payments contract, if one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_allowance_tx: Option<B256>,
    /// Deposit into the payments account, if one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_tx: Option<B256>,
    /// Operator approval update, if one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_approval_tx: Option<B256>,
}

/// How the operator approval has to change to cover a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorUpdate {
    /// Approve the operator and raise both allowances.
    Full,
    /// Raise the rate allowance only.
    RateOnly,
    /// Raise the lockup allowance only.
    LockupOnly,
    /// The current approval already covers the batch.
    Sufficient,
}

impl OperatorUpdate {
    /// Decides the update for `current` given the `rate` and `lockup` a batch needs.
    ///
    /// A full update is issued when the operator is not approved, or when *both* headrooms fall
    /// short. A single shortfall only raises the allowance that falls short.
    pub fn plan(current: &OperatorApproval, rate: U256, lockup: U256) -> Self {
        let rate_short = current.rate_headroom() < rate;
        let lockup_short = current.lockup_headroom() < lockup;

        if !current.is_approved || (rate_short && lockup_short) {
            Self::Full
        } else if rate_short {
            Self::RateOnly
        } else if lockup_short {
            Self::LockupOnly
        } else {
            Self::Sufficient
        }
    }

    /// The `(rate, lockup)` allowances to submit, or `None` if nothing changes.
    pub fn allowances(
        self,
        current: &OperatorApproval,
        rate: U256,
        lockup: U256,
    ) -> Option<(U256, U256)> {
        let raised_rate = current.rate_allowance.saturating_add(rate);
        let raised_lockup = current.lockup_allowance.saturating_add(lockup);

        match self {
            Self::Full => Some((raised_rate, raised_lockup)),
            Self::RateOnly => Some((raised_rate, current.lockup_allowance)),
            Self::LockupOnly => Some((current.rate_allowance, raised_lockup)),
            Self::Sufficient => None,
        }
    }
}

/// Amount to approve for a deposit `deficit`: twice the deficit, capped at `U256::MAX`.
pub fn approval_amount(deficit: U256) -> U256 {
    deficit.saturating_mul(U256::from(2))
}

/// Orchestrates deposits and approvals for a batch of pieces.
#[derive(Debug, Clone, Copy)]
pub struct PaymentSetup<'a> {
    pricing: &'a dyn StoragePricing,
    payments: &'a dyn PaymentsApi,
    tokens: &'a dyn TokenFactory,
    waiter: &'a dyn ConfirmationWaiter,
}

impl<'a> PaymentSetup<'a> {
    /// Create a new [`PaymentSetup`].
    pub fn new(
        pricing: &'a dyn StoragePricing,
        payments: &'a dyn PaymentsApi,
        tokens: &'a dyn TokenFactory,
        waiter: &'a dyn ConfirmationWaiter,
    ) -> Self {
        Self { pricing, payments, tokens, waiter }
    }

    /// Makes sure `owner` can pay for `pieces` with `operator` as the paying operator.
    ///
    /// All pieces are assumed to use the first piece's token. Any failed call aborts the setup;
    /// transactions already sent are not undone, and a rerun picks up from the chain state.
    #[instrument(skip_all, fields(%owner, %operator, pieces = pieces.len()))]
    pub async fn run(
        &self,
        pieces: &[PieceRequest],
        owner: Address,
        operator: Address,
    ) -> Result<PaymentSetupResult, PaymentSetupError> {
        let costs = calculate_storage_costs(self.pricing, pieces).await?;
        let token = pieces.first().ok_or(CostError::NoPiecesProvided)?.payment_token;

        let rate = U256::from(costs.total_bytes).saturating_mul(costs.price_per_byte_per_epoch);
        let one_month = rate.saturating_mul(U256::from(EPOCHS_PER_MONTH));
        let required_deposit = costs.total_cost.saturating_mul(U256::from(2));

        info!(
            %token,
            total_storage_cost = %costs.total_cost,
            one_month_allowance = %one_month,
            %required_deposit,
            "Payment requirements"
        );

        let mut result = PaymentSetupResult {
            total_storage_cost: costs.total_cost,
            one_month_allowance: one_month,
            required_deposit,
            token,
            token_allowance_tx: None,
            deposit_tx: None,
            operator_approval_tx: None,
        };

        let account = self
            .payments
            .account(token, owner)
            .await
            .map_err(PaymentSetupError::step("get account info"))?;
        let available = account.available();

        info!(funds = %account.funds, lockup = %account.lockup_current, %available, "Account status");

        if available < required_deposit {
            let deficit = required_deposit - available;
            info!(%deficit, "Insufficient funds, deposit required");

            if !token.is_zero() {
                result.token_allowance_tx = self.ensure_token_allowance(token, owner, deficit).await?;
            }

            let tx_hash = self
                .payments
                .deposit(token, owner, deficit)
                .await
                .map_err(PaymentSetupError::step("deposit tokens"))?;
            info!(%tx_hash, amount = %deficit, "Deposit sent");
            result.deposit_tx = Some(tx_hash);
        }

        result.operator_approval_tx =
            self.ensure_operator_approval(token, owner, operator, rate, one_month).await?;

        Ok(result)
    }

    /// Approves the payments contract to pull `deficit` from `owner`, unless it already can.
    async fn ensure_token_allowance(
        &self,
        token: Address,
        owner: Address,
        deficit: U256,
    ) -> Result<Option<B256>, PaymentSetupError> {
        let erc20 = self.tokens.token(token);
        let spender = self.payments.address();

        let allowance = erc20
            .allowance(owner, spender)
            .await
            .map_err(PaymentSetupError::step("get token allowance"))?;
        if allowance >= deficit {
            info!(%allowance, "Token allowance already sufficient");
            return Ok(None);
        }

        let balance =
            erc20.balance_of(owner).await.map_err(PaymentSetupError::step("get token balance"))?;
        if balance < deficit {
            return Err(PaymentSetupError::InsufficientTokenBalance { have: balance, need: deficit });
        }

        let amount = approval_amount(deficit);
        let tx_hash = erc20
            .approve(spender, amount)
            .await
            .map_err(PaymentSetupError::step("approve token allowance"))?;
        info!(%tx_hash, %amount, "Token allowance approval sent");

        // the deposit spends this allowance
        self.waiter.wait(Some(tx_hash)).await.report("allowance");

        Ok(Some(tx_hash))
    }

    /// Raises the operator's allowances to cover `rate` and twice `one_month` of lockup.
    async fn ensure_operator_approval(
        &self,
        token: Address,
        owner: Address,
        operator: Address,
        rate: U256,
        one_month: U256,
    ) -> Result<Option<B256>, PaymentSetupError> {
        let current = self
            .payments
            .operator_approval(token, owner, operator)
            .await
            .map_err(PaymentSetupError::step("get operator approval"))?;

        info!(
            approved = current.is_approved,
            rate_allowance = %current.rate_allowance,
            lockup_allowance = %current.lockup_allowance,
            rate_usage = %current.rate_usage,
            lockup_usage = %current.lockup_usage,
            "Operator approval status"
        );

        let lockup = one_month.saturating_mul(U256::from(2));
        let update = OperatorUpdate::plan(&current, rate, lockup);
        let Some((rate_allowance, lockup_allowance)) = update.allowances(&current, rate, lockup)
        else {
            info!("Operator approval already sufficient");
            return Ok(None);
        };

        let tx_hash = self
            .payments
            .set_operator_approval(
                token,
                operator,
                true,
                rate_allowance,
                lockup_allowance,
                U256::from(EPOCHS_PER_MONTH),
            )
            .await
            .map_err(PaymentSetupError::step("set operator approval"))?;
        info!(%tx_hash, ?update, %rate_allowance, %lockup_allowance, "Operator approval sent");

        Ok(Some(tx_hash))
    }
}
