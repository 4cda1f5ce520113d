//! A connected client: one provider, an optional signer, and the configured contracts.
use crate::{
    config::{ClientConfig, Requirement},
    confirm::ReceiptWaiter,
    contracts::{DdoContract, Erc20Token, PaymentsContract, TokenApi, TokenFactory},
    error::{ConfigError, DdoError},
};
use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use tracing::debug;

/// Everything a command needs to talk to the chain.
#[derive(Debug, Clone)]
pub struct Session {
    config: ClientConfig,
    provider: DynProvider,
    sender: Option<Address>,
}

impl Session {
    /// Validates `requirements` and connects to the configured endpoint.
    ///
    /// Nothing is sent over the network here; configuration errors surface before any call.
    pub fn connect(config: ClientConfig, requirements: &[Requirement]) -> Result<Self, ConfigError> {
        config.require(requirements)?;

        let signer = config.signer()?;
        let sender = signer.as_ref().map(|signer| signer.address());

        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(config.rpc_url.clone())
                .erased(),
            None => ProviderBuilder::new().connect_http(config.rpc_url.clone()).erased(),
        };

        debug!(rpc = %config.rpc_url, sender = ?sender, "Connected");

        Ok(Self { config, provider, sender })
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Address of the signing key, if any.
    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    /// Address of the signing key, or a configuration error.
    pub fn require_sender(&self) -> Result<Address, ConfigError> {
        self.sender.ok_or_else(|| ConfigError::Missing(vec![Requirement::PrivateKey.describe()]))
    }

    /// The configured allocation contract.
    pub fn ddo(&self) -> Result<DdoContract, ConfigError> {
        let address = self
            .config
            .ddo_contract
            .ok_or_else(|| ConfigError::Missing(vec![Requirement::DdoContract.describe()]))?;
        Ok(DdoContract::new(address, self.provider.clone(), self.sender))
    }

    /// The configured payments contract.
    pub fn payments(&self) -> Result<PaymentsContract, ConfigError> {
        let address = self
            .config
            .payments_contract
            .ok_or_else(|| ConfigError::Missing(vec![Requirement::PaymentsContract.describe()]))?;
        Ok(self.payments_at(address))
    }

    /// A payments contract at an explicit address.
    pub fn payments_at(&self, address: Address) -> PaymentsContract {
        PaymentsContract::new(address, self.provider.clone(), self.sender)
    }

    /// An ERC-20 token.
    pub fn erc20(&self, address: Address) -> Erc20Token {
        Erc20Token::new(address, self.provider.clone(), self.sender)
    }

    /// A confirmation waiter using the configured timeout.
    pub fn waiter(&self) -> ReceiptWaiter {
        ReceiptWaiter::new(self.provider.clone(), self.config.confirmation_timeout)
    }

    /// The latest block number.
    pub async fn block_number(&self) -> Result<u64, DdoError> {
        Ok(self.provider.get_block_number().await?)
    }
}

impl TokenFactory for Session {
    fn token(&self, address: Address) -> Box<dyn TokenApi> {
        Box::new(self.erc20(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://127.0.0.1:1".parse().unwrap())
    }

    #[test]
    fn connect_checks_requirements_first() {
        let err = Session::connect(config(), &[Requirement::DdoContract, Requirement::PaymentsContract])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(missing) if missing.len() == 2));
    }

    #[test]
    fn read_only_session() {
        let session = Session::connect(
            config().with_ddo_contract(Some(Address::with_last_byte(7))),
            &[Requirement::DdoContract],
        )
        .unwrap();

        assert!(session.sender().is_none());
        assert!(session.require_sender().is_err());
        assert_eq!(session.ddo().unwrap().address(), Address::with_last_byte(7));
        assert!(matches!(session.payments(), Err(ConfigError::Missing(_))));
    }
}
