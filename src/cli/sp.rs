//! `sp` commands for storage providers.
use super::{ConnectionArgs, print_json, token_label};
use crate::{
    confirm::ConfirmationWaiter,
    config::Requirement,
    constants::{EPOCHS_PER_DAY, USD_DECIMALS},
    contracts::{DdoContract, PaymentsApi, PaymentsContract},
    error::InputError,
    price::{
        bytes_per_epoch_to_usd_per_tb_per_month, format_bytes, format_price,
        usd_per_tb_per_month_to_bytes_per_epoch,
    },
    session::Session,
    types::{SpConfig, SpRegistration, TokenConfig},
};
use alloy::primitives::{Address, B256, U256, utils::format_units};
use clap::{ArgGroup, Args, Subcommand};
use futures_util::future::join_all;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};
use tokio::try_join;
use tracing::warn;

/// Storage provider commands.
#[derive(Debug, Subcommand)]
pub enum SpCommand {
    /// Register a storage provider
    Register(RegisterArgs),
    /// Show a storage provider's configuration and prices
    #[command(visible_alias = "q")]
    Query(QueryArgs),
    /// Update a registered storage provider
    #[command(subcommand)]
    Update(UpdateCommand),
    /// Settle a provider's payment rails
    Settle(SettleArgs),
}

impl SpCommand {
    pub async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        match self {
            Self::Register(args) => args.execute(connection).await,
            Self::Query(args) => args.execute(connection).await,
            Self::Update(cmd) => cmd.execute(connection).await,
            Self::Settle(args) => args.execute(connection).await,
        }
    }
}

/// Fails unless `0 < min <= max`.
fn check_range(what: &'static str, min: i128, max: i128) -> Result<(), InputError> {
    if min <= 0 || max < min {
        return Err(InputError::InvalidRange { what, min, max });
    }
    Ok(())
}

fn check_config(config: &SpConfig) -> Result<(), InputError> {
    check_range("piece size", config.min_piece_size.into(), config.max_piece_size.into())?;
    check_range("term", config.min_term_length.into(), config.max_term_length.into())
}

/// Parses an `address:usdPerTbPerMonth` token entry. Parsed tokens are active.
fn parse_token_spec(spec: &str) -> Result<TokenConfig, InputError> {
    let (token, price) =
        spec.split_once(':').ok_or_else(|| InputError::InvalidTokenSpec(spec.to_string()))?;
    token_config(token, price, true)
}

fn token_config(token: &str, price: &str, is_active: bool) -> Result<TokenConfig, InputError> {
    Ok(TokenConfig {
        token: Address::from_str(token.trim())
            .map_err(|_| InputError::InvalidAddress(token.to_string()))?,
        pricePerBytePerEpoch: usd_per_tb_per_month_to_bytes_per_epoch(price)?,
        isActive: is_active,
    })
}

/// A `--tokens-file` document.
#[derive(Debug, Deserialize)]
struct TokensFile {
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenEntry {
    token: String,
    #[serde(rename = "priceUSDPerTBPerMonth")]
    price_usd_per_tb_per_month: String,
    #[serde(default)]
    is_active: bool,
}

fn tokens_from_json(json: &str) -> Result<Vec<TokenConfig>, InputError> {
    let file: TokensFile = serde_json::from_str(json)?;
    file.tokens
        .iter()
        .map(|entry| token_config(&entry.token, &entry.price_usd_per_tb_per_month, entry.is_active))
        .collect()
}

fn print_config(config: &SpConfig) {
    println!("  Payment Address: {}", config.payment_address);
    println!("  Active: {}", config.is_active);
    println!(
        "  Piece Size: {} to {}",
        format_bytes(U256::from(config.min_piece_size)),
        format_bytes(U256::from(config.max_piece_size))
    );
    println!(
        "  Term: {} to {} epochs (~{:.1} to {:.1} days)",
        config.min_term_length,
        config.max_term_length,
        days(config.min_term_length),
        days(config.max_term_length)
    );
}

fn days(epochs: i64) -> f64 {
    epochs as f64 / EPOCHS_PER_DAY as f64
}

fn print_tokens(tokens: &[TokenConfig]) {
    for (idx, token) in tokens.iter().enumerate() {
        let status = if token.isActive { "active" } else { "inactive" };
        println!(
            "  {}. {} ({status}): {}",
            idx + 1,
            token_label(token.token),
            format_price(token.pricePerBytePerEpoch)
        );
    }
}

/// Waits for `tx_hash` and logs the outcome.
async fn confirm(session: &Session, tx_hash: B256, what: &str) {
    session.waiter().wait(Some(tx_hash)).await.report(what);
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("token_source").required(true).args(["tokens", "tokens_file"])))]
pub struct RegisterArgs {
    /// Storage provider actor id.
    #[arg(long, value_name = "ID")]
    actor_id: u64,
    /// Address that receives payments.
    #[arg(long, value_name = "ADDRESS")]
    payment_address: Address,
    /// Smallest accepted piece, in bytes.
    #[arg(long, default_value_t = 128)]
    min_piece_size: u64,
    /// Largest accepted piece, in bytes.
    #[arg(long, default_value_t = 34_359_738_368)]
    max_piece_size: u64,
    /// Shortest accepted term, in epochs.
    #[arg(long, default_value_t = 86_400, allow_negative_numbers = true)]
    min_term: i64,
    /// Longest accepted term, in epochs.
    #[arg(long, default_value_t = 5_256_000, allow_negative_numbers = true)]
    max_term: i64,
    /// Accepted token as `address:usdPerTbPerMonth`. Repeatable.
    #[arg(long, value_name = "ADDRESS:PRICE")]
    tokens: Vec<String>,
    /// JSON file with the accepted tokens.
    #[arg(long, value_name = "FILE")]
    tokens_file: Option<PathBuf>,
    /// Validate and show the registration without sending it.
    #[arg(long)]
    dry_run: bool,
}

impl RegisterArgs {
    fn registration(&self) -> Result<SpRegistration, InputError> {
        let config = SpConfig {
            payment_address: self.payment_address,
            min_piece_size: self.min_piece_size,
            max_piece_size: self.max_piece_size,
            min_term_length: self.min_term,
            max_term_length: self.max_term,
            is_active: true,
        };
        check_config(&config)?;

        let tokens = match &self.tokens_file {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| InputError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                tokens_from_json(&json)?
            }
            None => {
                self.tokens.iter().map(|spec| parse_token_spec(spec)).collect::<Result<Vec<_>, _>>()?
            }
        };
        if tokens.is_empty() {
            return Err(InputError::NoTokens);
        }

        Ok(SpRegistration { actor_id: self.actor_id, config, tokens })
    }

    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let registration = self.registration()?;

        println!("Storage provider {}", registration.actor_id);
        print_config(&registration.config);
        println!("Tokens ({})", registration.tokens.len());
        print_tokens(&registration.tokens);

        let mut requirements = vec![Requirement::DdoContract];
        if !self.dry_run {
            requirements.push(Requirement::PrivateKey);
        }
        let session = connection.connect(&requirements)?;
        let ddo = session.ddo()?;

        if self.dry_run {
            match ddo.sp_config(registration.actor_id).await {
                Ok(existing) if existing.is_registered() => {
                    println!("Already registered with");
                    print_config(&existing);
                }
                Ok(_) => println!("Not registered yet"),
                Err(err) => warn!(%err, "Could not check the registration status"),
            }
            println!("Dry run, nothing sent");
            return Ok(());
        }

        let tx_hash = ddo.register_sp(&registration).await?;
        println!("Registration sent: {tx_hash}");
        confirm(&session, tx_hash, "registration").await;
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Storage provider actor id.
    #[arg(long, value_name = "ID")]
    actor_id: u64,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Piece sizes priced in `sp query`: 1 GiB and 1 TiB.
const EXAMPLE_SIZES: [u64; 2] = [1 << 30, 1 << 40];

/// Cost of storing `size` bytes for one month at `price` per byte per epoch.
fn monthly_cost(price: U256, size: u64, epochs_per_month: U256) -> U256 {
    price.saturating_mul(U256::from(size)).saturating_mul(epochs_per_month)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpSummary<'a> {
    actor_id: u64,
    #[serde(flatten)]
    config: &'a SpConfig,
    accepting_allocations: bool,
    supported_tokens: Vec<TokenSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenSummary {
    token: Address,
    price_per_byte_per_epoch: String,
    #[serde(rename = "pricePerTBPerMonth")]
    price_per_tb_per_month: String,
    is_active: bool,
}

impl QueryArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::DdoContract])?;
        let ddo = session.ddo()?;

        let config = ddo.sp_config(self.actor_id).await?;
        if !config.is_registered() {
            println!("Storage provider {} is not registered", self.actor_id);
            return Ok(());
        }
        let (tokens, accepting_allocations) =
            try_join!(ddo.sp_supported_tokens(self.actor_id), ddo.is_sp_active(self.actor_id))?;

        if self.json {
            return print_json(&SpSummary {
                actor_id: self.actor_id,
                config: &config,
                accepting_allocations,
                supported_tokens: tokens
                    .iter()
                    .map(|token| TokenSummary {
                        token: token.token,
                        price_per_byte_per_epoch: token.pricePerBytePerEpoch.to_string(),
                        price_per_tb_per_month: bytes_per_epoch_to_usd_per_tb_per_month(
                            token.pricePerBytePerEpoch,
                        ),
                        is_active: token.isActive,
                    })
                    .collect(),
            });
        }

        let (basic, epochs_per_month) =
            try_join!(ddo.sp_basic_info(self.actor_id), ddo.epochs_per_month())?;

        println!("Storage provider {}", self.actor_id);
        print_config(&config);
        println!("  Accepting Allocations: {accepting_allocations}");
        println!("Tokens ({} registered)", basic.supported_token_count);
        print_tokens(&tokens);

        let active = tokens.iter().filter(|token| token.isActive).map(|token| token.token);
        let prices = join_all(active.map(async |token| {
            (token, ddo.sp_active_price(self.actor_id, token).await)
        }))
        .await;

        println!("Example costs for one month");
        for (token, price) in prices {
            let price = match price {
                Ok(price) => price,
                Err(err) => {
                    warn!(%token, %err, "Could not read active price");
                    continue;
                }
            };
            for size in EXAMPLE_SIZES {
                println!(
                    "  {} with {}: {} USD",
                    format_bytes(U256::from(size)),
                    token_label(token),
                    format_units(monthly_cost(price, size, epochs_per_month), USD_DECIMALS)?
                );
            }
        }

        Ok(())
    }
}

/// `sp update` commands.
#[derive(Debug, Subcommand)]
pub enum UpdateCommand {
    /// Update the payment address and piece/term ranges
    Config(UpdateConfigArgs),
    /// Update the price or status of an accepted token
    Token(UpdateTokenArgs),
    /// Accept a new token
    AddToken(AddTokenArgs),
}

impl UpdateCommand {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        match self {
            Self::Config(args) => args.execute(connection).await,
            Self::Token(args) => args.execute(connection).await,
            Self::AddToken(args) => args.execute(connection).await,
        }
    }
}

/// Connects for an `sp update` write. Dry runs need no key.
fn connect_for_write(
    connection: ConnectionArgs,
    dry_run: bool,
) -> eyre::Result<(Session, DdoContract)> {
    let requirements: &[Requirement] = if dry_run {
        &[Requirement::DdoContract]
    } else {
        &[Requirement::DdoContract, Requirement::PrivateKey]
    };
    let session = connection.connect(requirements)?;
    let ddo = session.ddo()?;
    Ok((session, ddo))
}

#[derive(Debug, Args)]
pub struct UpdateConfigArgs {
    /// Storage provider actor id.
    #[arg(long, value_name = "ID")]
    actor_id: u64,
    /// New payment address.
    #[arg(long, value_name = "ADDRESS")]
    payment_address: Option<Address>,
    /// New smallest accepted piece, in bytes.
    #[arg(long)]
    min_piece_size: Option<u64>,
    /// New largest accepted piece, in bytes.
    #[arg(long)]
    max_piece_size: Option<u64>,
    /// New shortest accepted term, in epochs.
    #[arg(long, allow_negative_numbers = true)]
    min_term: Option<i64>,
    /// New longest accepted term, in epochs.
    #[arg(long, allow_negative_numbers = true)]
    max_term: Option<i64>,
    /// Show the new configuration without sending it.
    #[arg(long)]
    dry_run: bool,
}

impl UpdateConfigArgs {
    /// Applies the given flags on top of `current`.
    fn apply(&self, current: &SpConfig) -> SpConfig {
        SpConfig {
            payment_address: self.payment_address.unwrap_or(current.payment_address),
            min_piece_size: self.min_piece_size.unwrap_or(current.min_piece_size),
            max_piece_size: self.max_piece_size.unwrap_or(current.max_piece_size),
            min_term_length: self.min_term.unwrap_or(current.min_term_length),
            max_term_length: self.max_term.unwrap_or(current.max_term_length),
            is_active: current.is_active,
        }
    }

    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let (session, ddo) = connect_for_write(connection, self.dry_run)?;

        let current = ddo.sp_config(self.actor_id).await?;
        eyre::ensure!(current.is_registered(), "storage provider {} is not registered", self.actor_id);

        let updated = self.apply(&current);
        check_config(&updated)?;

        println!("Current configuration");
        print_config(&current);
        println!("New configuration");
        print_config(&updated);

        if self.dry_run {
            println!("Dry run, nothing sent");
            return Ok(());
        }

        let tx_hash = ddo.update_sp_config(self.actor_id, &updated).await?;
        println!("Config update sent: {tx_hash}");
        confirm(&session, tx_hash, "config update").await;
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct UpdateTokenArgs {
    /// Storage provider actor id.
    #[arg(long, value_name = "ID")]
    actor_id: u64,
    /// Token to update.
    #[arg(long, value_name = "ADDRESS")]
    token: Address,
    /// New price in USD per TB per month.
    #[arg(long, value_name = "USD")]
    price: String,
    /// Mark the token active. This is the default.
    #[arg(long, conflicts_with = "inactive")]
    active: bool,
    /// Mark the token inactive.
    #[arg(long)]
    inactive: bool,
    /// Show the update without sending it.
    #[arg(long)]
    dry_run: bool,
}

impl UpdateTokenArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let price = usd_per_tb_per_month_to_bytes_per_epoch(&self.price)?;
        let is_active = !self.inactive;

        println!("Token {} of storage provider {}", token_label(self.token), self.actor_id);
        println!("  Price: {}", format_price(price));
        println!("  Active: {is_active}");

        let (session, ddo) = connect_for_write(connection, self.dry_run)?;
        if self.dry_run {
            println!("Dry run, nothing sent");
            return Ok(());
        }

        let tx_hash = ddo.update_sp_token(self.actor_id, self.token, price, is_active).await?;
        println!("Token update sent: {tx_hash}");
        confirm(&session, tx_hash, "token update").await;
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct AddTokenArgs {
    /// Storage provider actor id.
    #[arg(long, value_name = "ID")]
    actor_id: u64,
    /// Token to accept.
    #[arg(long, value_name = "ADDRESS")]
    token: Address,
    /// Price in USD per TB per month.
    #[arg(long, value_name = "USD")]
    price: String,
    /// Show the token without sending it.
    #[arg(long)]
    dry_run: bool,
}

impl AddTokenArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let price = usd_per_tb_per_month_to_bytes_per_epoch(&self.price)?;

        println!("New token {} for storage provider {}", token_label(self.token), self.actor_id);
        println!("  Price: {}", format_price(price));

        let (session, ddo) = connect_for_write(connection, self.dry_run)?;
        if self.dry_run {
            println!("Dry run, nothing sent");
            return Ok(());
        }

        let tx_hash = ddo.add_sp_token(self.actor_id, self.token, price).await?;
        println!("Token addition sent: {tx_hash}");
        confirm(&session, tx_hash, "token addition").await;
        Ok(())
    }
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["provider", "allocation_id"])))]
pub struct SettleArgs {
    /// Settle every rail of this provider.
    #[arg(long, value_name = "ID")]
    provider: Option<u64>,
    /// Settle the rail of this allocation only.
    #[arg(long, value_name = "ID")]
    allocation_id: Option<u64>,
    /// Epoch to settle up to. Defaults to the current block.
    #[arg(long, value_name = "EPOCH")]
    until_epoch: Option<u64>,
    /// Show what would be settled without sending anything.
    #[arg(long)]
    dry_run: bool,
}

/// Prints the payee accounts of `payee` for every active token.
async fn print_payee_accounts(payments: &PaymentsContract, payee: Address, tokens: &[TokenConfig]) {
    let accounts = join_all(
        tokens
            .iter()
            .filter(|token| token.isActive)
            .map(async |token| (token.token, payments.account(token.token, payee).await)),
    )
    .await;

    for (token, account) in accounts {
        match account {
            Ok(account) => println!(
                "  {}: funds {}, lockup {}, lockup rate {}",
                token_label(token),
                account.funds,
                account.lockup_current,
                account.lockup_rate
            ),
            Err(err) => warn!(%token, %err, "Could not read provider account"),
        }
    }
}

impl SettleArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let (session, ddo) = connect_for_write(connection, self.dry_run)?;

        let (provider, rail) = match (self.allocation_id, self.provider) {
            (Some(allocation_id), _) => {
                let rail = ddo.allocation_rail_info(allocation_id).await?;
                (rail.provider_id, Some(rail))
            }
            (None, Some(provider)) => (provider, None),
            (None, None) => eyre::bail!("either --provider or --allocation-id must be specified"),
        };

        let config = ddo.sp_config(provider).await?;
        eyre::ensure!(config.is_registered(), "storage provider {provider} is not registered");
        let tokens = ddo.sp_supported_tokens(provider).await?;

        let payments = match session.config().payments_contract {
            Some(address) => session.payments_at(address),
            None => session.payments_at(ddo.payments_contract().await?),
        };
        let until_epoch = match self.until_epoch {
            Some(epoch) => epoch,
            None => session.block_number().await?,
        };

        println!("Settlement of storage provider {provider}");
        println!("  Payment Address: {}", config.payment_address);
        println!("  Payments Contract: {}", payments.address());
        println!("  Until Epoch: {until_epoch}");
        print_tokens(&tokens);

        if self.dry_run {
            match (&rail, self.allocation_id) {
                (Some(rail), Some(allocation_id)) => {
                    println!("Allocation {allocation_id} on rail {}", rail.rail_id);
                    println!("  Payment Rate: {}", rail.rail.paymentRate);
                    println!("  Settled Up To: {}", rail.rail.settledUpTo);
                    println!("  Token: {}", token_label(rail.rail.token));
                }
                _ => {
                    let ids = ddo.allocation_ids_for_provider(provider).await?;
                    println!("{} allocation(s): {}", ids.len(), ids.iter().join(", "));
                }
            }
            println!("Dry run, nothing sent");
            return Ok(());
        }

        println!("Provider accounts before settlement");
        print_payee_accounts(&payments, config.payment_address, &tokens).await;

        let until = U256::from(until_epoch);
        let tx_hash = match self.allocation_id {
            Some(allocation_id) => ddo.settle_sp_payment(allocation_id, until).await?,
            None => ddo.settle_sp_total_payment(provider, until).await?,
        };
        println!("Settlement sent: {tx_hash}");

        let status = session.waiter().wait(Some(tx_hash)).await;
        status.report("settlement");
        if status.is_confirmed() {
            println!("Provider accounts after settlement");
            print_payee_accounts(&payments, config.payment_address, &tokens).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::{Cli, Commands},
        constants::EPOCHS_PER_MONTH,
    };
    use clap::Parser;

    const TOKEN: &str = "0x00000000000000000000000000000000000000aa";

    fn register(extra: &[&str]) -> RegisterArgs {
        let base = [
            "ddo",
            "sp",
            "register",
            "--actor-id",
            "1000",
            "--payment-address",
            "0x0000000000000000000000000000000000000001",
        ];
        match Cli::try_parse_from(base.iter().chain(extra)).unwrap().command {
            Commands::Sp(SpCommand::Register(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn token_specs() {
        let config = parse_token_spec(&format!("{TOKEN}:10.50")).unwrap();
        assert_eq!(config.token, Address::with_last_byte(0xaa));
        assert_eq!(config.pricePerBytePerEpoch, U256::from(110));
        assert!(config.isActive);

        assert!(matches!(parse_token_spec(TOKEN), Err(InputError::InvalidTokenSpec(_))));
        assert!(matches!(parse_token_spec("0x12:1"), Err(InputError::InvalidAddress(_))));
        assert!(matches!(
            parse_token_spec(&format!("{TOKEN}:abc")),
            Err(InputError::InvalidPriceFormat(_))
        ));
    }

    #[test]
    fn tokens_file() {
        let json = format!(
            r#"{{"tokens": [
                {{"token": "{TOKEN}", "priceUSDPerTBPerMonth": "10.50", "isActive": true}},
                {{"token": "0x0000000000000000000000000000000000000000", "priceUSDPerTBPerMonth": "0"}}
            ]}}"#
        );
        let tokens = tokens_from_json(&json).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].isActive);
        assert!(!tokens[1].isActive);
        assert_eq!(tokens[1].pricePerBytePerEpoch, U256::ZERO);
    }

    #[test]
    fn registration_defaults() {
        let registration = register(&["--tokens", &format!("{TOKEN}:10.50")]).registration().unwrap();

        assert_eq!(registration.actor_id, 1000);
        assert_eq!(registration.config.min_piece_size, 128);
        assert_eq!(registration.config.max_piece_size, 34_359_738_368);
        assert_eq!(registration.config.min_term_length, 86_400);
        assert_eq!(registration.config.max_term_length, 5_256_000);
        assert_eq!(registration.tokens.len(), 1);
    }

    #[test]
    fn registration_rejects_bad_ranges() {
        let token = format!("{TOKEN}:1");
        for extra in [
            ["--min-piece-size", "0"],
            ["--max-piece-size", "64"],
            ["--min-term", "-1"],
            ["--max-term", "100"],
        ] {
            let args = register(&["--tokens", &token, extra[0], extra[1]]);
            assert!(
                matches!(args.registration(), Err(InputError::InvalidRange { .. })),
                "{extra:?}"
            );
        }
    }

    #[test]
    fn registration_needs_tokens() {
        let base = [
            "ddo",
            "sp",
            "register",
            "--actor-id",
            "1",
            "--payment-address",
            "0x0000000000000000000000000000000000000001",
        ];
        assert!(Cli::try_parse_from(base).is_err());
    }

    #[test]
    fn update_keeps_unset_fields() {
        let cli = Cli::try_parse_from([
            "ddo",
            "sp",
            "update",
            "config",
            "--actor-id",
            "7",
            "--max-term",
            "600000",
        ])
        .unwrap();
        let Commands::Sp(SpCommand::Update(UpdateCommand::Config(args))) = cli.command else {
            panic!("unexpected command");
        };

        let current = SpConfig {
            payment_address: Address::with_last_byte(1),
            min_piece_size: 128,
            max_piece_size: 1024,
            min_term_length: 100,
            max_term_length: 200,
            is_active: true,
        };
        let updated = args.apply(&current);
        assert_eq!(updated, SpConfig { max_term_length: 600_000, ..current });
    }

    #[test]
    fn example_costs() {
        let epochs = U256::from(EPOCHS_PER_MONTH);
        // $10.50/TB/month floors to 110 units, i.e. $10.45 for a full TiB-month
        let tib = monthly_cost(U256::from(110), EXAMPLE_SIZES[1], epochs);
        assert_eq!(tib, U256::from(10_449_758_510_383_104_000u128));

        let gib = monthly_cost(U256::from(110), EXAMPLE_SIZES[0], epochs);
        assert_eq!(gib * U256::from(1024), tib);

        assert_eq!(monthly_cost(U256::MAX, EXAMPLE_SIZES[1], epochs), U256::MAX);
    }
}
