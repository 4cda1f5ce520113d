//! Best-effort waiting for transactions to be mined.
//!
//! A transaction that cannot be confirmed was still submitted and may land later, so waiting
//! reports a [`ConfirmationStatus`] instead of failing.
use alloy::{
    network::ReceiptResponse,
    primitives::B256,
    providers::{DynProvider, PendingTransactionConfig, Provider},
};
use async_trait::async_trait;
use core::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of waiting for a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// The transaction was mined, or there was nothing to wait for.
    Confirmed,
    /// The transaction could not be confirmed.
    Unconfirmed(String),
}

impl ConfirmationStatus {
    /// Whether the transaction was confirmed.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Logs the outcome for the transaction described by `what`.
    pub fn report(&self, what: &str) {
        match self {
            Self::Confirmed => info!("{what} transaction mined"),
            Self::Unconfirmed(reason) => {
                warn!(%reason, "{what} transaction may not have been mined")
            }
        }
    }
}

/// Waits for transactions to be mined.
#[async_trait]
pub trait ConfirmationWaiter: Debug + Send + Sync {
    /// Waits for `tx_hash`. A missing or zero hash is confirmed immediately.
    async fn wait(&self, tx_hash: Option<B256>) -> ConfirmationStatus;
}

/// [`ConfirmationWaiter`] backed by a node, with a single bounded wait per transaction.
#[derive(Debug, Clone)]
pub struct ReceiptWaiter {
    provider: DynProvider,
    timeout: Duration,
}

impl ReceiptWaiter {
    /// Create a new [`ReceiptWaiter`].
    pub fn new(provider: DynProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl ConfirmationWaiter for ReceiptWaiter {
    async fn wait(&self, tx_hash: Option<B256>) -> ConfirmationStatus {
        let Some(tx_hash) = tx_hash.filter(|hash| !hash.is_zero()) else {
            return ConfirmationStatus::Confirmed;
        };

        info!(%tx_hash, "Waiting for transaction to be mined");

        match self.provider.get_transaction_by_hash(tx_hash).await {
            Ok(Some(_)) => {}
            Ok(None) => return ConfirmationStatus::Unconfirmed("transaction not found".into()),
            Err(err) => {
                return ConfirmationStatus::Unconfirmed(format!("failed to get transaction: {err}"));
            }
        }

        let config = PendingTransactionConfig::new(tx_hash).with_timeout(Some(self.timeout));
        let pending = match self.provider.watch_pending_transaction(config).await {
            Ok(pending) => pending,
            Err(err) => {
                return ConfirmationStatus::Unconfirmed(format!("failed to watch transaction: {err}"));
            }
        };
        if let Err(err) = pending.await {
            return ConfirmationStatus::Unconfirmed(format!(
                "transaction failed or timed out: {err}"
            ));
        }

        match self.provider.get_transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) if !receipt.status() => {
                ConfirmationStatus::Unconfirmed("transaction reverted".into())
            }
            Ok(receipt) => {
                debug!(%tx_hash, block = ?receipt.and_then(|r| r.block_number()), "Transaction mined");
                ConfirmationStatus::Confirmed
            }
            Err(err) => ConfirmationStatus::Unconfirmed(format!("failed to get receipt: {err}")),
        }
    }
}
