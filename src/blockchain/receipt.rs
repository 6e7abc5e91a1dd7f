//! Receipt polling with an accumulated-wait budget.
//!
//! # State Transitions
//! ```text
//! Polling → Confirmed: receipt with success status
//! Polling → Reverted:  receipt with failure status
//! Polling → TimedOut:  no receipt and another interval would exceed the timeout
//! Polling → Polling:   no receipt; sleep one interval, add it to the counter
//! ```
//!
//! Elapsed time is the sum of poll intervals slept, not wall-clock time.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainResult, ReceiptPoll, TransactionOutcome};
use crate::observability::metrics;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Suspension used between polls and pipeline steps.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls for a transaction's receipt until a terminal outcome.
#[derive(Clone)]
pub struct ReceiptWaiter {
    rpc: Arc<dyn ChainRpc>,
    sleeper: Arc<dyn Sleeper>,
    explorer_url: Option<String>,
}

impl ReceiptWaiter {
    pub fn new(rpc: Arc<dyn ChainRpc>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            rpc,
            sleeper,
            explorer_url: None,
        }
    }

    /// Log explorer links for terminal outcomes.
    pub fn with_explorer(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = Some(explorer_url.into());
        self
    }

    /// Poll until the transaction is mined or the wait budget is spent.
    ///
    /// RPC failures are returned as errors; only "not yet mined" is retried.
    /// The interval is at least one second.
    pub async fn wait(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
        poll_interval_secs: u64,
    ) -> BlockchainResult<TransactionOutcome> {
        let poll_interval_secs = poll_interval_secs.max(MIN_POLL_INTERVAL_SECS);
        let poll_interval = Duration::from_secs(poll_interval_secs);
        let mut elapsed_secs: u64 = 0;

        let outcome = loop {
            match ReceiptPoll::from(self.rpc.get_receipt_status(tx_hash).await?) {
                ReceiptPoll::Mined(true) => break TransactionOutcome::Confirmed,
                ReceiptPoll::Mined(false) => break TransactionOutcome::Reverted,
                ReceiptPoll::NotFound => {
                    if elapsed_secs.saturating_add(poll_interval_secs) > timeout_secs {
                        break TransactionOutcome::TimedOut;
                    }
                    tracing::debug!(tx_hash = %tx_hash, elapsed_secs, "Transaction pending");
                    self.sleeper.sleep(poll_interval).await;
                    elapsed_secs = elapsed_secs.saturating_add(poll_interval_secs);
                }
            }
        };

        let link = self.link(tx_hash);
        match outcome {
            TransactionOutcome::Confirmed => {
                tracing::info!(tx = %link, "Transaction confirmed")
            }
            TransactionOutcome::Reverted => tracing::error!(tx = %link, "Transaction reverted"),
            TransactionOutcome::TimedOut => tracing::warn!(
                tx = %link,
                waited_secs = elapsed_secs,
                "Transaction not mined within the wait budget"
            ),
        }
        metrics::record_receipt_outcome(outcome);
        Ok(outcome)
    }

    /// Explorer link for a transaction, or the bare hash.
    pub fn link(&self, tx_hash: TxHash) -> String {
        match &self.explorer_url {
            Some(base) => format!("{}tx/{}", base, tx_hash),
            None => tx_hash.to_string(),
        }
    }
}
