//! Client error types.
use alloy::transports::TransportErrorKind;
use thiserror::Error;

mod config;
pub use config::ConfigError;

mod contract;
pub use contract::ContractError;

mod cost;
pub use cost::CostError;

mod input;
pub use input::InputError;

mod payment;
pub use payment::PaymentSetupError;

/// The overarching error type of the client library.
#[derive(Debug, Error)]
pub enum DdoError {
    /// Errors related to configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Errors related to local input validation.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Errors related to contract calls.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// Errors related to storage cost calculation.
    #[error(transparent)]
    Cost(#[from] CostError),
    /// Errors related to payment setup.
    #[error(transparent)]
    PaymentSetup(#[from] PaymentSetupError),
    /// An error occurred talking to RPC.
    #[error(transparent)]
    RpcError(#[from] alloy::transports::RpcError<TransportErrorKind>),
    /// An internal error occurred.
    #[error(transparent)]
    InternalError(#[from] eyre::Error),
}
