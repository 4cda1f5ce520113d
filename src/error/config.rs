use alloy::signers::local::LocalSignerError;
use thiserror::Error;

/// Errors related to client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required settings are missing.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// The configured private key could not be parsed.
    #[error("failed to parse private key")]
    InvalidPrivateKey(#[source] LocalSignerError),
}
