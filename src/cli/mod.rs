//! # DDO client CLI
//!
//! Command line interface to the allocation (DDO) and payments contracts.
use crate::{
    config::{ClientConfig, Requirement},
    constants::DEFAULT_RPC_URL,
    error::ConfigError,
    session::Session,
};
use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

mod allocations;
pub use allocations::AllocationsCommand;

mod approve;
pub use approve::ApproveTokenArgs;

mod payments;
pub use payments::PaymentsCommand;

mod sp;
pub use sp::SpCommand;

/// Client for DDO allocations, payments and storage provider management.
#[derive(Debug, Parser)]
#[command(name = "ddo", author, version, long_about = None)]
pub struct Cli {
    /// Connection settings shared by all commands.
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create and query allocations
    #[command(subcommand, visible_alias = "alloc")]
    Allocations(AllocationsCommand),
    /// Inspect and manage payments accounts
    #[command(subcommand, visible_alias = "pay")]
    Payments(PaymentsCommand),
    /// Approve the payments contract to spend an ERC-20 token
    #[command(visible_alias = "at")]
    ApproveToken(ApproveTokenArgs),
    /// Register and manage storage providers
    #[command(subcommand)]
    Sp(SpCommand),
}

/// Connection flags. Each falls back to its environment variable.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// JSON-RPC endpoint.
    #[arg(long = "rpc", global = true, value_name = "URL", env = "RPC_ENDPOINT", default_value = DEFAULT_RPC_URL)]
    pub rpc: Url,
    /// Allocation (DDO) contract address.
    #[arg(long = "contract", global = true, value_name = "ADDRESS", env = "DDO_CONTRACT_ADDRESS")]
    pub contract: Option<Address>,
    /// Payments contract address.
    #[arg(
        long = "payments-contract",
        global = true,
        value_name = "ADDRESS",
        env = "PAYMENTS_CONTRACT_ADDRESS"
    )]
    pub payments_contract: Option<Address>,
    /// Hex private key used to sign transactions.
    #[arg(
        long = "private-key",
        global = true,
        value_name = "KEY",
        env = "PRIVATE_KEY",
        hide_env_values = true
    )]
    pub private_key: Option<String>,
    /// How long to wait for a transaction to be mined.
    #[arg(
        long = "confirmation-timeout",
        global = true,
        value_name = "SECONDS",
        value_parser = parse_duration_secs,
        default_value = "120"
    )]
    pub confirmation_timeout: Duration,
}

impl ConnectionArgs {
    /// Turns the flags into a [`ClientConfig`].
    pub fn into_config(self) -> ClientConfig {
        ClientConfig::new(self.rpc)
            .with_ddo_contract(self.contract)
            .with_payments_contract(self.payments_contract)
            .with_private_key(self.private_key)
            .with_confirmation_timeout(self.confirmation_timeout)
    }

    /// Opens a [`Session`], failing if any of `requirements` is unset.
    pub fn connect(self, requirements: &[Requirement]) -> Result<Session, ConfigError> {
        Session::connect(self.into_config(), requirements)
    }
}

impl Cli {
    /// Run the selected command.
    pub async fn run(self) -> eyre::Result<()> {
        init_logging();

        let connection = self.connection;
        match self.command {
            Commands::Allocations(cmd) => cmd.execute(connection).await,
            Commands::Payments(cmd) => cmd.execute(connection).await,
            Commands::ApproveToken(args) => args.execute(connection).await,
            Commands::Sp(cmd) => cmd.execute(connection).await,
        }
    }
}

/// Installs the global tracing subscriber, writing to stderr so stdout stays parseable.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy())
        .try_init();
}

/// Parses a string representing seconds to a [`Duration`].
fn parse_duration_secs(arg: &str) -> Result<Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(Duration::from_secs(seconds))
}

/// Prints `value` as pretty JSON to stdout.
fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Human label for a token address.
fn token_label(token: Address) -> String {
    if token.is_zero() { "native token".to_string() } else { token.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn connection_flags_build_config() {
        let cli = Cli::try_parse_from([
            "ddo",
            "--rpc",
            "http://node:8545",
            "payments",
            "contract-info",
            "--payments-contract",
            "0x0000000000000000000000000000000000000011",
            "--confirmation-timeout",
            "5",
        ])
        .unwrap();

        let config = cli.connection.into_config();
        assert_eq!(config.rpc_url.as_str(), "http://node:8545/");
        assert_eq!(config.payments_contract, Some(Address::with_last_byte(0x11)));
        assert_eq!(config.confirmation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration_secs("30").unwrap(), Duration::from_secs(30));
        assert!(parse_duration_secs("-1").is_err());
    }
}
