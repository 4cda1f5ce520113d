use super::ContractError;
use thiserror::Error;

/// Errors related to storage cost calculation.
#[derive(Debug, Error)]
pub enum CostError {
    /// The piece list is empty.
    #[error("no pieces provided")]
    NoPiecesProvided,
    /// A piece has a non-positive minimum term.
    #[error("invalid term length for piece provider {provider}: {term}")]
    InvalidTermLength {
        /// Provider of the offending piece.
        provider: u64,
        /// The rejected term.
        term: i64,
    },
    /// A piece has a size of zero bytes.
    #[error("invalid piece size for piece provider {provider}: size must be greater than 0")]
    InvalidPieceSize {
        /// Provider of the offending piece.
        provider: u64,
    },
    /// The per-piece cost quote failed.
    #[error("failed to calculate storage cost for provider {provider}")]
    Quote {
        /// Provider being quoted.
        provider: u64,
        /// The contract error.
        #[source]
        source: ContractError,
    },
    /// The provider price lookup failed.
    #[error("failed to get SP price for provider {provider}")]
    Price {
        /// Provider being priced.
        provider: u64,
        /// The contract error.
        #[source]
        source: ContractError,
    },
}
