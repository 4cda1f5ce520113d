//! `payments` commands.
use super::{ConnectionArgs, allocations::print_rail, token_label};
use crate::{
    confirm::ConfirmationWaiter,
    config::Requirement,
    constants::UNLIMITED_MAX_LOCKUP_PERIOD,
    contracts::PaymentsApi,
    types::{Account, OperatorApproval, RailInfo},
};
use alloy::primitives::{Address, U256};
use clap::{ArgGroup, Args, Subcommand};
use tokio::try_join;

/// Payments commands.
#[derive(Debug, Subcommand)]
pub enum PaymentsCommand {
    /// Show the payments contract constants
    ContractInfo,
    /// Show a payments account
    Account(AccountArgs),
    /// Show an operator approval
    OperatorApproval(OperatorApprovalArgs),
    /// Show a rail
    Rail(RailArgs),
    /// List the rails of a payer or payee
    Rails(RailsArgs),
    /// Settle a single rail
    SettleRail(SettleRailArgs),
    /// Show the fees accumulated for a token
    AccumulatedFees(AccumulatedFeesArgs),
    /// List the fees accumulated for every token
    AllAccounts,
    /// Set the allowances of an operator
    #[command(visible_aliases = ["soa", "set-allowance"])]
    SetOperatorAllowance(SetOperatorAllowanceArgs),
    /// Withdraw available funds from the payments account
    #[command(visible_alias = "wd")]
    Withdraw(WithdrawArgs),
}

impl PaymentsCommand {
    pub async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        match self {
            Self::ContractInfo => contract_info(connection).await,
            Self::Account(args) => args.execute(connection).await,
            Self::OperatorApproval(args) => args.execute(connection).await,
            Self::Rail(args) => args.execute(connection).await,
            Self::Rails(args) => args.execute(connection).await,
            Self::SettleRail(args) => args.execute(connection).await,
            Self::AccumulatedFees(args) => args.execute(connection).await,
            Self::AllAccounts => all_accounts(connection).await,
            Self::SetOperatorAllowance(args) => args.execute(connection).await,
            Self::Withdraw(args) => args.execute(connection).await,
        }
    }
}

async fn contract_info(connection: ConnectionArgs) -> eyre::Result<()> {
    let session = connection.connect(&[Requirement::PaymentsContract])?;
    let payments = session.payments()?;

    let (commission_max_bps, payment_fee_bps) =
        try_join!(payments.commission_max_bps(), payments.payment_fee_bps())?;

    println!("Payments contract {}", payments.address());
    println!("  Max Commission (bps): {commission_max_bps}");
    println!("  Payment Fee (bps): {payment_fee_bps}");
    Ok(())
}

async fn all_accounts(connection: ConnectionArgs) -> eyre::Result<()> {
    let session = connection.connect(&[Requirement::PaymentsContract])?;
    let fees = session.payments()?.all_accumulated_fees().await?;

    println!("Accumulated fees for {} token(s)", fees.count);
    for (token, amount) in &fees.fees {
        println!("  {}: {amount}", token_label(*token));
    }
    Ok(())
}

fn print_account(account: &Account) {
    println!("  Funds: {}", account.funds);
    println!("  Lockup: {}", account.lockup_current);
    println!("  Available: {}", account.available());
    println!("  Lockup Rate: {}", account.lockup_rate);
    println!("  Lockup Last Settled At: {}", account.lockup_last_settled_at);
}

fn print_approval(approval: &OperatorApproval) {
    println!("  Approved: {}", approval.is_approved);
    println!(
        "  Rate Allowance: {} (used {}, available {})",
        approval.rate_allowance,
        approval.rate_usage,
        approval.rate_headroom()
    );
    println!(
        "  Lockup Allowance: {} (used {}, available {})",
        approval.lockup_allowance,
        approval.lockup_usage,
        approval.lockup_headroom()
    );
    println!("  Max Lockup Period: {}", approval.max_lockup_period);
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Token of the account. Zero for the native token.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// Account owner. Defaults to the signer.
    #[arg(long, value_name = "ADDRESS")]
    address: Option<Address>,
}

impl AccountArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::PaymentsContract])?;
        let owner = match self.address {
            Some(owner) => owner,
            None => session.require_sender()?,
        };
        let payments = session.payments()?;

        let (account, settled) = try_join!(
            payments.account(self.token, owner),
            payments.account_info_if_settled(self.token, owner)
        )?;

        println!("Account {owner} ({})", token_label(self.token));
        print_account(&account);
        println!("If settled now:");
        println!("  Funded Until Epoch: {}", settled.funded_until_epoch);
        println!("  Funds: {}", settled.current_funds);
        println!("  Available: {}", settled.available_funds);
        println!("  Lockup Rate: {}", settled.current_lockup_rate);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct OperatorApprovalArgs {
    /// Token of the approval.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// Client that granted the approval. Defaults to the signer.
    #[arg(long, value_name = "ADDRESS")]
    account: Option<Address>,
    /// Approved operator. Defaults to the allocation contract.
    #[arg(long, value_name = "ADDRESS")]
    operator: Option<Address>,
}

impl OperatorApprovalArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::PaymentsContract])?;
        let client = match self.account {
            Some(client) => client,
            None => session.require_sender()?,
        };
        let operator = match self.operator {
            Some(operator) => operator,
            None => session.ddo()?.address(),
        };

        let approval = session.payments()?.operator_approval(self.token, client, operator).await?;

        println!("Operator {operator} for client {client} ({})", token_label(self.token));
        print_approval(&approval);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct RailArgs {
    /// Rail id.
    #[arg(long, value_name = "ID")]
    rail_id: U256,
}

impl RailArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::PaymentsContract])?;
        let rail = session.payments()?.rail(self.rail_id).await?;

        println!("Rail {}", self.rail_id);
        print_rail(&rail);
        Ok(())
    }
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("party").required(true).args(["payer", "payee"])))]
pub struct RailsArgs {
    /// Token of the rails.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// List the rails paid by this address.
    #[arg(long, value_name = "ADDRESS")]
    payer: Option<Address>,
    /// List the rails paying this address.
    #[arg(long, value_name = "ADDRESS")]
    payee: Option<Address>,
    /// Hide terminated rails.
    #[arg(long)]
    active_only: bool,
}

impl RailsArgs {
    /// Keeps the rails to print, in contract order.
    fn select(&self, rails: Vec<RailInfo>) -> Vec<RailInfo> {
        rails.into_iter().filter(|rail| !self.active_only || !rail.isTerminated).collect()
    }

    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::PaymentsContract])?;
        let payments = session.payments()?;

        let (party, rails) = match (self.payer, self.payee) {
            (Some(payer), _) => {
                (format!("payer {payer}"), payments.rails_for_payer(payer, self.token).await?)
            }
            (None, Some(payee)) => {
                (format!("payee {payee}"), payments.rails_for_payee(payee, self.token).await?)
            }
            (None, None) => eyre::bail!("either --payer or --payee must be specified"),
        };
        let rails = self.select(rails);

        println!("{} rail(s) for {party} ({})", rails.len(), token_label(self.token));
        for rail in &rails {
            let status = if rail.isTerminated {
                format!("terminated, ends at epoch {}", rail.endEpoch)
            } else {
                "active".to_string()
            };
            println!("  Rail {}: {status}", rail.railId);
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct SettleRailArgs {
    /// Rail id.
    #[arg(long, value_name = "ID")]
    rail_id: U256,
    /// Epoch to settle up to. Defaults to the current block.
    #[arg(long, value_name = "EPOCH")]
    until_epoch: Option<u64>,
    /// Show the rail without sending anything.
    #[arg(long)]
    dry_run: bool,
}

impl SettleRailArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let requirements: &[Requirement] = if self.dry_run {
            &[Requirement::PaymentsContract]
        } else {
            &[Requirement::PaymentsContract, Requirement::PrivateKey]
        };
        let session = connection.connect(requirements)?;
        let payments = session.payments()?;

        let rail = payments.rail(self.rail_id).await?;
        let until_epoch = match self.until_epoch {
            Some(epoch) => epoch,
            None => session.block_number().await?,
        };

        println!("Settlement of rail {} until epoch {until_epoch}", self.rail_id);
        print_rail(&rail);

        if self.dry_run {
            println!("Dry run, nothing sent");
            return Ok(());
        }

        let tx_hash = payments.settle_rail(self.rail_id, U256::from(until_epoch)).await?;
        println!("Rail settlement sent: {tx_hash}");

        let status = session.waiter().wait(Some(tx_hash)).await;
        status.report("rail settlement");
        if status.is_confirmed() {
            let rail = payments.rail(self.rail_id).await?;
            println!("  Settled Up To: {}", rail.settledUpTo);
        }

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct AccumulatedFeesArgs {
    /// Token to show fees for.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
}

impl AccumulatedFeesArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session = connection.connect(&[Requirement::PaymentsContract])?;
        let payments = session.payments()?;

        let (fees, collected) =
            try_join!(payments.accumulated_fees(self.token), payments.has_collected_fees(self.token))?;

        println!("Fees for {}", token_label(self.token));
        println!("  Accumulated: {fees}");
        println!("  Ever Collected: {collected}");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct SetOperatorAllowanceArgs {
    /// Token of the approval.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// Operator to approve.
    #[arg(long, short, value_name = "ADDRESS")]
    operator: Address,
    /// Whether the operator is approved.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    approved: bool,
    /// Rate allowance. Defaults to the current value.
    #[arg(long, value_name = "AMOUNT")]
    rate_allowance: Option<U256>,
    /// Lockup allowance. Defaults to the current value.
    #[arg(long, value_name = "AMOUNT")]
    lockup_allowance: Option<U256>,
    /// Max lockup period in epochs. Defaults to the current value.
    #[arg(long, value_name = "EPOCHS")]
    max_lockup_period: Option<U256>,
    /// Set both allowances to the maximum and the lockup period to one year.
    #[arg(long, conflicts_with_all = ["rate_allowance", "lockup_allowance", "max_lockup_period"])]
    unlimited: bool,
    /// Only show the current approval.
    #[arg(long)]
    check_only: bool,
}

impl SetOperatorAllowanceArgs {
    /// The `(rate, lockup, max lockup period)` to submit given the `current` approval.
    fn allowances(&self, current: &OperatorApproval) -> (U256, U256, U256) {
        if self.unlimited {
            return (U256::MAX, U256::MAX, U256::from(UNLIMITED_MAX_LOCKUP_PERIOD));
        }

        (
            self.rate_allowance.unwrap_or(current.rate_allowance),
            self.lockup_allowance.unwrap_or(current.lockup_allowance),
            self.max_lockup_period.unwrap_or(current.max_lockup_period),
        )
    }

    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session =
            connection.connect(&[Requirement::PaymentsContract, Requirement::PrivateKey])?;
        let client = session.require_sender()?;
        let payments = session.payments()?;

        let current = payments.operator_approval(self.token, client, self.operator).await?;
        println!("Current approval of {} ({})", self.operator, token_label(self.token));
        print_approval(&current);

        if self.check_only {
            return Ok(());
        }

        let (rate, lockup, period) = self.allowances(&current);
        let tx_hash = payments
            .set_operator_approval(self.token, self.operator, self.approved, rate, lockup, period)
            .await?;
        println!("Operator approval sent: {tx_hash}");

        let status = session.waiter().wait(Some(tx_hash)).await;
        status.report("operator approval");
        if status.is_confirmed() {
            let updated = payments.operator_approval(self.token, client, self.operator).await?;
            println!("Updated approval");
            print_approval(&updated);
        }

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct WithdrawArgs {
    /// Token to withdraw.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// Amount in the token's smallest unit.
    #[arg(long, short, value_name = "AMOUNT")]
    amount: U256,
    /// Recipient. Defaults to the signer.
    #[arg(long, visible_alias = "to-address", value_name = "ADDRESS")]
    to: Option<Address>,
    /// Print the account before withdrawing.
    #[arg(long)]
    check_balance: bool,
}

impl WithdrawArgs {
    async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session =
            connection.connect(&[Requirement::PaymentsContract, Requirement::PrivateKey])?;
        let owner = session.require_sender()?;
        let payments = session.payments()?;

        let account = payments.account(self.token, owner).await?;
        if self.check_balance {
            println!("Account {owner} ({})", token_label(self.token));
            print_account(&account);
        }

        let available = account.available();
        eyre::ensure!(
            self.amount <= available,
            "insufficient funds: available {available}, requested {}",
            self.amount
        );

        let tx_hash = match self.to {
            Some(to) => payments.withdraw_to(self.token, to, self.amount).await?,
            None => payments.withdraw(self.token, self.amount).await?,
        };
        println!(
            "Withdrawal of {} to {} sent: {tx_hash}",
            self.amount,
            self.to.unwrap_or(owner)
        );
        session.waiter().wait(Some(tx_hash)).await.report("withdrawal");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn set_allowance(args: &[&str]) -> SetOperatorAllowanceArgs {
        let base = [
            "ddo",
            "payments",
            "set-operator-allowance",
            "--token",
            "0x0000000000000000000000000000000000000001",
            "--operator",
            "0x0000000000000000000000000000000000000002",
        ];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        match cli.command {
            Commands::Payments(PaymentsCommand::SetOperatorAllowance(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn current() -> OperatorApproval {
        OperatorApproval {
            is_approved: true,
            rate_allowance: U256::from(10),
            lockup_allowance: U256::from(20),
            max_lockup_period: U256::from(30),
            ..Default::default()
        }
    }

    #[test]
    fn missing_allowances_keep_current_values() {
        let args = set_allowance(&["--lockup-allowance", "99"]);
        assert!(args.approved);
        assert_eq!(args.allowances(&current()), (U256::from(10), U256::from(99), U256::from(30)));
    }

    #[test]
    fn unlimited_allowances() {
        let args = set_allowance(&["--unlimited"]);
        assert_eq!(
            args.allowances(&current()),
            (U256::MAX, U256::MAX, U256::from(UNLIMITED_MAX_LOCKUP_PERIOD))
        );

        let cli = Cli::try_parse_from([
            "ddo",
            "payments",
            "set-operator-allowance",
            "--token",
            "0x0000000000000000000000000000000000000001",
            "--operator",
            "0x0000000000000000000000000000000000000002",
            "--unlimited",
            "--rate-allowance",
            "1",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn revoke_approval() {
        let args = set_allowance(&["--approved", "false"]);
        assert!(!args.approved);
    }

    fn rails(args: &[&str]) -> eyre::Result<RailsArgs> {
        let base =
            ["ddo", "payments", "rails", "--token", "0x0000000000000000000000000000000000000001"];
        match Cli::try_parse_from(base.iter().chain(args))?.command {
            Commands::Payments(PaymentsCommand::Rails(args)) => Ok(args),
            other => eyre::bail!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rails_need_one_party() {
        let payer = "0x0000000000000000000000000000000000000003";
        assert!(rails(&[]).is_err());
        assert!(rails(&["--payer", payer, "--payee", payer]).is_err());

        let args = rails(&["--payee", payer]).unwrap();
        assert_eq!(args.payee, Some(Address::with_last_byte(3)));
        assert_eq!(args.payer, None);
    }

    #[test]
    fn active_only_hides_terminated_rails() {
        let rail = |id: u64, terminated: bool| RailInfo {
            railId: U256::from(id),
            isTerminated: terminated,
            endEpoch: U256::from(if terminated { 500 } else { 0 }),
        };
        let listed = || vec![rail(1, false), rail(2, true), rail(3, false)];
        let payer = "0x0000000000000000000000000000000000000003";

        let all = rails(&["--payer", payer]).unwrap().select(listed());
        assert_eq!(all.len(), 3);

        let active = rails(&["--payer", payer, "--active-only"]).unwrap().select(listed());
        assert_eq!(
            active.iter().map(|rail| rail.railId).collect::<Vec<_>>(),
            vec![U256::from(1), U256::from(3)]
        );
    }

    #[test]
    fn settle_rail_flags() {
        let cli = Cli::try_parse_from([
            "ddo",
            "payments",
            "settle-rail",
            "--rail-id",
            "7",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Payments(PaymentsCommand::SettleRail(args)) => {
                assert_eq!(args.rail_id, U256::from(7));
                assert_eq!(args.until_epoch, None);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["ddo", "payments", "settle-rail"]).is_err());
    }
}
