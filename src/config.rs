//! Client configuration.
//!
//! A [`ClientConfig`] is built once per command, from flags that fall back to environment
//! variables, and handed to [`Session::connect`](crate::session::Session::connect).
use crate::{constants::DEFAULT_CONFIRMATION_TIMEOUT, error::ConfigError};
use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use std::{str::FromStr, time::Duration};
use url::Url;

/// Connection settings for a single command.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Address of the allocation (DDO) contract.
    pub ddo_contract: Option<Address>,
    /// Address of the payments contract.
    pub payments_contract: Option<Address>,
    /// Hex-encoded signing key, with or without `0x`.
    pub private_key: Option<String>,
    /// How long to wait for a transaction to be mined.
    pub confirmation_timeout: Duration,
}

/// A setting a command cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The allocation contract address.
    DdoContract,
    /// The payments contract address.
    PaymentsContract,
    /// A signing key.
    PrivateKey,
}

impl Requirement {
    /// How to provide the setting.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::DdoContract => "DDO_CONTRACT_ADDRESS or --contract flag",
            Self::PaymentsContract => "PAYMENTS_CONTRACT_ADDRESS or --payments-contract flag",
            Self::PrivateKey => "PRIVATE_KEY or --private-key flag",
        }
    }
}

impl ClientConfig {
    /// Creates a config for `rpc_url` with no contracts and no signer.
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            ddo_contract: None,
            payments_contract: None,
            private_key: None,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    /// Sets the allocation contract address.
    pub fn with_ddo_contract(mut self, address: Option<Address>) -> Self {
        self.ddo_contract = address.or(self.ddo_contract);
        self
    }

    /// Sets the payments contract address.
    pub fn with_payments_contract(mut self, address: Option<Address>) -> Self {
        self.payments_contract = address.or(self.payments_contract);
        self
    }

    /// Sets the signing key. Empty keys are ignored.
    pub fn with_private_key(mut self, key: Option<String>) -> Self {
        self.private_key = key.filter(|key| !key.trim().is_empty()).or(self.private_key);
        self
    }

    /// Sets the confirmation timeout.
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Lists the requirements that are not satisfied, in the order given.
    pub fn missing(&self, requirements: &[Requirement]) -> Vec<&'static str> {
        requirements
            .iter()
            .filter(|requirement| match requirement {
                Requirement::DdoContract => self.ddo_contract.is_none(),
                Requirement::PaymentsContract => self.payments_contract.is_none(),
                Requirement::PrivateKey => self.private_key.is_none(),
            })
            .map(Requirement::describe)
            .collect()
    }

    /// Fails with every missing requirement at once.
    pub fn require(&self, requirements: &[Requirement]) -> Result<(), ConfigError> {
        let missing = self.missing(requirements);
        if missing.is_empty() { Ok(()) } else { Err(ConfigError::Missing(missing)) }
    }

    /// Parses the signing key, if one is configured.
    pub fn signer(&self) -> Result<Option<PrivateKeySigner>, ConfigError> {
        self.private_key
            .as_deref()
            .map(|key| {
                let key = key.trim();
                PrivateKeySigner::from_str(key.strip_prefix("0x").unwrap_or(key))
                    .map_err(ConfigError::InvalidPrivateKey)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // anvil's first dev account
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:8545".parse().unwrap())
    }

    #[test]
    fn reports_all_missing_settings() {
        let config = config();
        let err = config
            .require(&[Requirement::DdoContract, Requirement::PrivateKey])
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "missing required configuration: DDO_CONTRACT_ADDRESS or --contract flag, \
             PRIVATE_KEY or --private-key flag"
        );

        let config = config
            .with_ddo_contract(Some(Address::with_last_byte(1)))
            .with_private_key(Some(KEY.to_string()));
        assert!(config.require(&[Requirement::DdoContract, Requirement::PrivateKey]).is_ok());
        assert_eq!(
            config.missing(&[Requirement::PaymentsContract]),
            vec!["PAYMENTS_CONTRACT_ADDRESS or --payments-contract flag"]
        );
    }

    #[test]
    fn empty_key_is_not_a_key() {
        let config = config().with_private_key(Some(String::new()));
        assert!(config.private_key.is_none());
        assert!(config.signer().unwrap().is_none());
    }

    #[test]
    fn signer_accepts_both_key_forms() {
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();

        let prefixed = config().with_private_key(Some(KEY.to_string()));
        assert_eq!(prefixed.signer().unwrap().unwrap().address(), expected);

        let bare = config().with_private_key(Some(KEY.trim_start_matches("0x").to_string()));
        assert_eq!(bare.signer().unwrap().unwrap().address(), expected);

        let bad = config().with_private_key(Some("0x1234".to_string()));
        assert!(matches!(bad.signer(), Err(ConfigError::InvalidPrivateKey(_))));
    }
}
