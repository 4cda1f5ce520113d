//! `allocations` commands.
use super::{ConnectionArgs, print_json, token_label};
use crate::{
    confirm::ConfirmationWaiter,
    config::Requirement,
    constants::{DEFAULT_EXPIRATION_OFFSET, EPOCHS_PER_MONTH},
    contracts::PaymentsApi,
    cost::calculate_storage_costs,
    error::InputError,
    payment::PaymentSetup,
    price::{format_bytes, format_price},
    types::{PieceRequest, RailView, load_pieces_file, parse_piece_cid},
};
use alloy::primitives::{Address, U256};
use clap::{ArgGroup, Args, Subcommand};
use itertools::Itertools;
use std::path::PathBuf;
use tokio::try_join;
use tracing::warn;

/// Allocation commands.
#[derive(Debug, Subcommand)]
pub enum AllocationsCommand {
    /// List allocations of a client or provider, or show one allocation's rail
    #[command(visible_alias = "q")]
    Query(QueryArgs),
    /// Create allocation requests, setting up payments first
    #[command(visible_alias = "c")]
    Create(CreateArgs),
    /// Show the claims recorded for a client
    QueryClaimInfo(QueryClaimInfoArgs),
}

impl AllocationsCommand {
    pub async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        match self {
            Self::Query(args) => args.execute(connection).await,
            Self::Create(args) => args.execute(connection).await,
            Self::QueryClaimInfo(args) => args.execute(connection).await,
        }
    }
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target").required(true).args(["client_address", "provider_id", "allocation_id"])
))]
pub struct QueryArgs {
    /// Client address to list allocations for.
    #[arg(long, value_name = "ADDRESS")]
    client_address: Option<Address>,
    /// Provider actor id to list allocations for.
    #[arg(long, value_name = "ID")]
    provider_id: Option<u64>,
    /// Allocation id to show the rail of.
    #[arg(long, value_name = "ID")]
    allocation_id: Option<u64>,
    /// Only print the number of allocations.
    #[arg(long)]
    count_only: bool,
}

impl QueryArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::DdoContract])?;
        let ddo = session.ddo()?;

        if let Some(allocation_id) = self.allocation_id {
            let (provider, rail_id) = try_join!(
                ddo.allocation_provider(allocation_id),
                ddo.allocation_rail_id(allocation_id)
            )?;
            println!("Allocation {allocation_id}");
            // unknown allocations map to provider 0
            if provider == 0 {
                println!("  Not found");
                return Ok(());
            }
            println!("  Provider: {provider}");
            if rail_id.is_zero() {
                println!("  No payment rail yet");
                return Ok(());
            }

            let info = ddo.allocation_rail_info(allocation_id).await?;
            println!("  Rail ID: {}", info.rail_id);
            print_rail(&info.rail);
            return Ok(());
        }

        let (owner, ids) = if let Some(client) = self.client_address {
            (format!("client {client}"), ddo.allocation_ids_for_client(client).await?)
        } else if let Some(provider) = self.provider_id {
            (format!("provider {provider}"), ddo.allocation_ids_for_provider(provider).await?)
        } else {
            eyre::bail!("one of --client-address, --provider-id or --allocation-id is required");
        };

        println!("{} allocation(s) for {owner}", ids.len());
        if !self.count_only && !ids.is_empty() {
            println!("  IDs: {}", ids.iter().join(", "));
        }

        Ok(())
    }
}

/// Prints a rail's fields, indented under a header.
pub(super) fn print_rail(rail: &RailView) {
    println!("  Token: {}", token_label(rail.token));
    println!("  From: {}", rail.from);
    println!("  To: {}", rail.to);
    println!("  Operator: {}", rail.operator);
    println!("  Validator: {}", rail.validator);
    println!("  Payment Rate: {}", rail.paymentRate);
    println!("  Lockup Period: {}", rail.lockupPeriod);
    println!("  Lockup Fixed: {}", rail.lockupFixed);
    println!("  Settled Up To: {}", rail.settledUpTo);
    println!("  End Epoch: {}", rail.endEpoch);
    println!("  Commission Rate (bps): {}", rail.commissionRateBps);
    println!("  Service Fee Recipient: {}", rail.serviceFeeRecipient);
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// JSON file holding an array of pieces.
    #[arg(long, short = 'f', value_name = "FILE", conflicts_with = "piece_cid")]
    input_file: Option<PathBuf>,
    /// Piece CID of a single piece.
    #[arg(long, value_name = "CID")]
    piece_cid: Option<String>,
    /// Piece size in bytes.
    #[arg(long, default_value_t = 0)]
    size: u64,
    /// Storage provider actor id.
    #[arg(long, default_value_t = 0)]
    provider: u64,
    /// Minimum term in epochs.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    term_min: i64,
    /// Maximum term in epochs.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    term_max: i64,
    /// Epochs after which an unclaimed allocation expires.
    #[arg(long, default_value_t = DEFAULT_EXPIRATION_OFFSET)]
    expiration_offset: i64,
    /// Where the provider can download the piece.
    #[arg(long, default_value = "")]
    download_url: String,
    /// Payment token. Also the default for file pieces without one.
    #[arg(long, value_name = "ADDRESS")]
    payment_token: Option<Address>,
    /// Compute costs and requirements without sending anything.
    #[arg(long)]
    dry_run: bool,
    /// Skip deposits and operator approval.
    #[arg(long)]
    skip_payment_setup: bool,
}

impl CreateArgs {
    /// Builds the piece list from the input file or the single-piece flags.
    fn pieces(&self) -> Result<Vec<PieceRequest>, InputError> {
        if let Some(path) = &self.input_file {
            return load_pieces_file(path, self.payment_token);
        }

        let cid = self.piece_cid.as_deref().ok_or(InputError::MissingPieceSource)?;
        let payment_token = self.payment_token.ok_or(InputError::MissingPaymentToken(1))?;

        Ok(vec![PieceRequest {
            piece_cid: parse_piece_cid(cid)?,
            size: self.size,
            provider: self.provider,
            term_min: self.term_min,
            term_max: self.term_max,
            expiration_offset: self.expiration_offset,
            download_url: self.download_url.clone(),
            payment_token,
        }])
    }

    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let pieces = self.pieces()?;
        let session = connection.connect(&[
            Requirement::DdoContract,
            Requirement::PaymentsContract,
            Requirement::PrivateKey,
        ])?;
        let owner = session.require_sender()?;
        let ddo = session.ddo()?;
        let payments = session.payments()?;

        println!("Allocation request");
        println!("  Client: {owner}");
        println!("  DDO Contract: {}", ddo.address());
        println!("  Payments Contract: {}", payments.address());
        println!("  Pieces: {}", pieces.len());
        for (idx, piece) in pieces.iter().enumerate() {
            println!(
                "  #{}: provider {}, {} bytes, term {}..{}, token {}",
                idx + 1,
                piece.provider,
                piece.size,
                piece.term_min,
                piece.term_max,
                token_label(piece.payment_token)
            );
        }

        let costs = calculate_storage_costs(&ddo, &pieces).await?;
        let total_bytes = U256::from(costs.total_bytes);
        println!("Cost analysis");
        println!("  Total Storage Cost: {}", costs.total_cost);
        println!("  Price: {}", format_price(costs.price_per_byte_per_epoch));
        println!("  Total Bytes: {} ({})", costs.total_bytes, format_bytes(total_bytes));
        println!("  Total Epochs: {}", costs.total_epochs);

        if self.dry_run {
            let one_month = total_bytes
                .saturating_mul(costs.price_per_byte_per_epoch)
                .saturating_mul(U256::from(EPOCHS_PER_MONTH));
            println!("Dry run, nothing sent");
            println!("  Required Deposit: {}", costs.total_cost.saturating_mul(U256::from(2)));
            println!("  Required Operator Allowance (one month): {one_month}");
            return Ok(());
        }

        let waiter = session.waiter();
        if self.skip_payment_setup {
            warn!("Skipping payment setup, deposits and approvals must already be in place");
        } else {
            let setup = PaymentSetup::new(&ddo, &payments, &session, &waiter)
                .run(&pieces, owner, ddo.address())
                .await?;
            println!("Payment setup");
            println!("  Required Deposit: {}", setup.required_deposit);
            for (what, tx) in [
                ("Token Approval", setup.token_allowance_tx),
                ("Deposit", setup.deposit_tx),
                ("Operator Approval", setup.operator_approval_tx),
            ] {
                match tx {
                    Some(tx) => println!("  {what}: {tx}"),
                    None => println!("  {what}: not needed"),
                }
            }
        }

        let tx_hash = ddo.create_allocation_requests(&pieces).await?;
        println!("Allocation requests sent: {tx_hash}");
        waiter.wait(Some(tx_hash)).await.report("allocation creation");

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct QueryClaimInfoArgs {
    /// Client address that owns the claim.
    #[arg(long, value_name = "ADDRESS")]
    client_address: Address,
    /// Claim id.
    #[arg(long, value_name = "ID")]
    claim_id: u64,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl QueryClaimInfoArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::DdoContract])?;
        let claims = session.ddo()?.claim_info_for_client(self.client_address, self.claim_id).await?;

        if self.json {
            return print_json(&claims);
        }

        if claims.is_empty() {
            println!("No claim {} for client {}", self.claim_id, self.client_address);
            return Ok(());
        }

        for claim in &claims {
            println!("Claim {} of client {}", self.claim_id, self.client_address);
            println!("  Provider: {}", claim.provider);
            println!("  Client: {}", claim.client);
            println!("  Data: {}", claim.data);
            println!("  Size: {} ({})", claim.size, format_bytes(U256::from(claim.size)));
            println!("  Term: {}..{} epochs", claim.term_min, claim.term_max);
            println!("  Term Start: {}", claim.term_start);
            println!("  Sector: {}", claim.sector);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn create_args(args: &[&str]) -> CreateArgs {
        let cli = Cli::try_parse_from(["ddo", "allocations", "create"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Allocations(AllocationsCommand::Create(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn single_piece_from_flags() {
        let args = create_args(&[
            "--piece-cid",
            CID_V0,
            "--size",
            "2048",
            "--provider",
            "1000",
            "--term-min",
            "518400",
            "--term-max",
            "1036800",
            "--payment-token",
            "0x00000000000000000000000000000000000000aa",
        ]);

        let pieces = args.pieces().unwrap();
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.size, 2048);
        assert_eq!(piece.provider, 1000);
        assert_eq!(piece.expiration_offset, DEFAULT_EXPIRATION_OFFSET);
        assert_eq!(piece.payment_token, Address::with_last_byte(0xaa));
    }

    #[test]
    fn flags_need_cid_and_token() {
        let err = create_args(&["--size", "1"]).pieces().unwrap_err();
        assert!(matches!(err, InputError::MissingPieceSource));

        let err = create_args(&["--piece-cid", CID_V0]).pieces().unwrap_err();
        assert!(matches!(err, InputError::MissingPaymentToken(1)));
    }

    #[test]
    fn query_needs_one_target() {
        assert!(Cli::try_parse_from(["ddo", "allocations", "query"]).is_err());
        let both = ["ddo", "allocations", "query", "--provider-id", "1", "--allocation-id", "2"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["ddo", "allocations", "query", "--provider-id", "1"]).is_ok());
    }
}
