//! `approve-token` command.
use super::ConnectionArgs;
use crate::{
    confirm::ConfirmationWaiter,
    config::Requirement,
    contracts::{PaymentsApi, TokenApi},
};
use alloy::primitives::{Address, U256};
use clap::Args;
use tokio::try_join;

#[derive(Debug, Args)]
pub struct ApproveTokenArgs {
    /// ERC-20 token to approve.
    #[arg(long, short, value_name = "ADDRESS")]
    token: Address,
    /// Amount to approve. Defaults to twice the wallet balance.
    #[arg(long, short, value_name = "AMOUNT", conflicts_with = "unlimited")]
    amount: Option<U256>,
    /// Approve the maximum amount.
    #[arg(long)]
    unlimited: bool,
    /// Only show the balance and the current allowance.
    #[arg(long)]
    check_only: bool,
}

impl ApproveTokenArgs {
    /// The amount to approve for a wallet holding `balance`.
    fn approval_amount(&self, balance: U256) -> U256 {
        if self.unlimited {
            U256::MAX
        } else {
            self.amount.unwrap_or_else(|| balance.saturating_mul(U256::from(2)))
        }
    }

    pub async fn execute(self, connection: ConnectionArgs) -> eyre::Result<()> {
        let session =
            connection.connect(&[Requirement::PaymentsContract, Requirement::PrivateKey])?;
        let owner = session.require_sender()?;
        let spender = session.payments()?.address();
        let token = session.erc20(self.token);

        let (symbol, decimals, balance, allowance) = try_join!(
            token.symbol(),
            token.decimals(),
            token.balance_of(owner),
            token.allowance(owner, spender)
        )?;

        println!("Token {symbol} ({}, {decimals} decimals)", self.token);
        println!("  Owner: {owner}");
        println!("  Spender: {spender}");
        println!("  Balance: {balance}");
        println!("  Allowance: {allowance}");

        if self.check_only {
            return Ok(());
        }

        let amount = self.approval_amount(balance);
        if allowance >= amount {
            println!("Allowance already covers {amount}, nothing to do");
            return Ok(());
        }

        let tx_hash = token.approve(spender, amount).await?;
        println!("Approval of {amount} sent: {tx_hash}");

        let status = session.waiter().wait(Some(tx_hash)).await;
        status.report("approval");
        if status.is_confirmed() {
            println!("  New Allowance: {}", token.allowance(owner, spender).await?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> ApproveTokenArgs {
        let base = ["ddo", "approve-token", "--token", "0x0000000000000000000000000000000000000001"];
        match Cli::try_parse_from(base.iter().chain(extra)).unwrap().command {
            Commands::ApproveToken(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn amount_selection() {
        let balance = U256::from(50);
        assert_eq!(args(&[]).approval_amount(balance), U256::from(100));
        assert_eq!(args(&["--amount", "7"]).approval_amount(balance), U256::from(7));
        assert_eq!(args(&["--unlimited"]).approval_amount(balance), U256::MAX);
        assert_eq!(args(&[]).approval_amount(U256::MAX), U256::MAX);
    }
}
