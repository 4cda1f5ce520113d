use super::{ContractError, CostError};
use alloy::primitives::U256;
use thiserror::Error;

/// Errors related to payment setup.
#[derive(Debug, Error)]
pub enum PaymentSetupError {
    /// Storage costs could not be computed.
    #[error("failed to calculate storage costs")]
    Cost(#[from] CostError),
    /// The wallet does not hold enough tokens to cover the deposit.
    #[error("insufficient token balance: have {have}, need {need}")]
    InsufficientTokenBalance {
        /// Wallet balance.
        have: U256,
        /// Deposit deficit.
        need: U256,
    },
    /// A read or write call of the given step failed.
    #[error("failed to {step}")]
    Step {
        /// What the orchestrator was doing.
        step: &'static str,
        /// The contract error.
        #[source]
        source: ContractError,
    },
}

impl PaymentSetupError {
    /// Returns a closure wrapping a [`ContractError`] for the given step.
    pub fn step(step: &'static str) -> impl FnOnce(ContractError) -> Self {
        move |source| Self::Step { step, source }
    }
}
