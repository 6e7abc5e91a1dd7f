//! Sequential execution of the swap steps.
//!
//! # State Transitions
//! ```text
//! Approve → Wrap → Quote → Assemble → Swap → Confirm → Done
//!     any step error  → Failed (remaining steps never run)
//!     shutdown signal → Cancelled (current step abandoned)
//! ```
//!
//! A pacing delay follows Approve, Quote, Assemble and Swap.

use alloy::network::TransactionBuilder;
use alloy::primitives::{TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::contracts::{IERC20, IWETH};
use crate::blockchain::{
    Account, ChainRpc, FeeEstimator, FeeQuote, ReceiptWaiter, Sleeper, TransactionBroadcaster,
    TransactionOutcome,
};
use crate::lifecycle::cancelled;
use crate::observability::metrics;
use crate::pipeline::context::{PipelineSettings, SwapContext};
use crate::pipeline::error::{SwapError, SwapResult};
use crate::pipeline::steps::SwapStep;
use crate::quoting::{AssembleRequest, AssembledTransaction, QuoteRequest, QuoteResponse, SwapRouter};

/// What a run produced, filled in as steps complete.
#[derive(Debug, Clone, Default)]
pub struct SwapReport {
    pub run_id: Uuid,
    /// Set only when an approval was needed.
    pub approve_tx: Option<TxHash>,
    pub wrap_tx: Option<TxHash>,
    pub quote: Option<QuoteResponse>,
    pub assembled: Option<AssembledTransaction>,
    pub swap_tx: Option<TxHash>,
    pub outcome: Option<TransactionOutcome>,
}

/// One configured swap, ready to execute.
pub struct SwapPipeline {
    ctx: SwapContext,
    settings: PipelineSettings,
    rpc: Arc<dyn ChainRpc>,
    router: Arc<dyn SwapRouter>,
    fees: FeeEstimator,
    broadcaster: TransactionBroadcaster,
    waiter: ReceiptWaiter,
    sleeper: Arc<dyn Sleeper>,
}

impl SwapPipeline {
    pub fn new(
        ctx: SwapContext,
        settings: PipelineSettings,
        account: Arc<Account>,
        rpc: Arc<dyn ChainRpc>,
        router: Arc<dyn SwapRouter>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let waiter = ReceiptWaiter::new(rpc.clone(), sleeper.clone())
            .with_explorer(ctx.explorer_url.clone());
        Self {
            fees: FeeEstimator::new(rpc.clone()),
            broadcaster: TransactionBroadcaster::new(rpc.clone(), account),
            waiter,
            ctx,
            settings,
            rpc,
            router,
            sleeper,
        }
    }

    /// Run every step in order, stopping at the first failure or at shutdown.
    pub async fn execute(&self, mut shutdown: broadcast::Receiver<()>) -> SwapResult<SwapReport> {
        let mut report = SwapReport {
            run_id: Uuid::new_v4(),
            ..Default::default()
        };
        let span = tracing::info_span!("swap", run_id = %report.run_id);

        async {
            tracing::info!(
                account = %self.ctx.account,
                amount = self.ctx.amount,
                chain_id = self.ctx.chain_id,
                "Starting swap"
            );

            for step in SwapStep::ORDERED {
                let started = Instant::now();
                let step_span = tracing::info_span!("step", name = step.as_str());

                tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown) => {
                        tracing::warn!(step = %step, "Shutdown requested, abandoning step");
                        return Err(SwapError::Cancelled { step });
                    }
                    result = self.run_step(step, &mut report).instrument(step_span) => {
                        if let Err(e) = result {
                            tracing::error!(step = %step, error = %e, "Step failed");
                            return Err(e);
                        }
                    }
                }
                metrics::record_step_duration(step.as_str(), started.elapsed().as_secs_f64());

                if step.paced_after() && !self.settings.step_delay.is_zero() {
                    tokio::select! {
                        biased;
                        _ = cancelled(&mut shutdown) => return Err(SwapError::Cancelled { step }),
                        _ = self.sleeper.sleep(self.settings.step_delay) => {}
                    }
                }
            }

            tracing::info!("Swap complete");
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn run_step(&self, step: SwapStep, report: &mut SwapReport) -> SwapResult<()> {
        match step {
            SwapStep::Approve => report.approve_tx = self.approve().await?,
            SwapStep::Wrap => report.wrap_tx = Some(self.wrap().await?),
            SwapStep::Quote => report.quote = Some(self.quote().await?),
            SwapStep::Assemble => {
                let quote = report.quote.as_ref().ok_or(SwapError::OutOfOrder { step })?;
                report.assembled = Some(self.assemble(quote).await?);
            }
            SwapStep::Swap => {
                let assembled = report
                    .assembled
                    .as_ref()
                    .ok_or(SwapError::OutOfOrder { step })?;
                report.swap_tx = Some(self.swap(assembled).await?);
            }
            SwapStep::Confirm => {
                let tx_hash = report.swap_tx.ok_or(SwapError::OutOfOrder { step })?;
                report.outcome = Some(self.confirm(step, tx_hash).await?);
            }
        }
        Ok(())
    }

    async fn approve(&self) -> SwapResult<Option<TxHash>> {
        let ctx = &self.ctx;
        let allowance = self
            .rpc
            .erc20_allowance(ctx.input_token, ctx.account, ctx.router)
            .await?;
        if !allowance.is_zero() {
            tracing::info!(allowance = %allowance, "Router already approved");
            return Ok(None);
        }

        tracing::warn!(router = %ctx.router, "No allowance, approving router");
        let calldata = IERC20::approveCall {
            spender: ctx.router,
            value: U256::MAX,
        }
        .abi_encode();
        let mut request = TransactionRequest::default()
            .with_to(ctx.input_token)
            .with_input(calldata)
            .with_gas_limit(self.settings.approve_gas_limit);
        self.price(&mut request).await?;

        let tx_hash = self.submit(SwapStep::Approve, request).await?;
        self.confirm(SwapStep::Approve, tx_hash).await?;
        Ok(Some(tx_hash))
    }

    async fn wrap(&self) -> SwapResult<TxHash> {
        let ctx = &self.ctx;
        let balance = self.rpc.get_balance(ctx.account).await?;
        let budget = self.fees.estimated_total_fee().await?;
        ensure_funds(SwapStep::Wrap, balance, ctx.amount_wei.saturating_add(budget))?;

        let mut request = TransactionRequest::default()
            .with_to(ctx.input_token)
            .with_value(ctx.amount_wei)
            .with_input(IWETH::depositCall {}.abi_encode())
            .with_gas_limit(self.settings.wrap_gas_limit);
        self.price(&mut request).await?;

        let tx_hash = self.submit(SwapStep::Wrap, request).await?;
        self.confirm(SwapStep::Wrap, tx_hash).await?;
        Ok(tx_hash)
    }

    async fn quote(&self) -> SwapResult<QuoteResponse> {
        let ctx = &self.ctx;
        let request = QuoteRequest::single(
            ctx.chain_id,
            ctx.input_token,
            ctx.amount_wei,
            ctx.output_token,
            ctx.account,
        );
        let quote = self.router.quote(&request).await?;
        tracing::info!(
            path_id = %quote.path_id,
            out_amounts = ?quote.out_amounts,
            price_impact = ?quote.price_impact,
            "Quote received"
        );
        Ok(quote)
    }

    async fn assemble(&self, quote: &QuoteResponse) -> SwapResult<AssembledTransaction> {
        let request = AssembleRequest {
            path_id: quote.path_id.clone(),
            user_addr: self.ctx.account,
        };
        let assembled = self.router.assemble(&request).await?.transaction;

        if assembled.chain_id != self.ctx.chain_id {
            return Err(SwapError::InvalidAssembly(format!(
                "built for chain {}, running on {}",
                assembled.chain_id, self.ctx.chain_id
            )));
        }
        if assembled.from != self.ctx.account {
            tracing::warn!(from = %assembled.from, "Assembled sender differs from account");
        }
        tracing::info!(to = %assembled.to, gas = assembled.gas, "Swap transaction assembled");
        Ok(assembled)
    }

    async fn swap(&self, assembled: &AssembledTransaction) -> SwapResult<TxHash> {
        let ctx = &self.ctx;
        let balance = self.rpc.erc20_balance(ctx.input_token, ctx.account).await?;
        let budget = self.fees.estimated_total_fee().await?;
        // Compares a token balance against a native-denominated fee budget.
        ensure_funds(SwapStep::Swap, balance, ctx.amount_wei.saturating_add(budget))?;

        let mut request = TransactionRequest::default()
            .with_to(assembled.to)
            .with_input(assembled.data.clone())
            .with_value(U256::ZERO)
            .with_gas_limit(assembled.gas);
        if assembled.gas_price == 0 {
            self.price(&mut request).await?;
        } else {
            FeeQuote::Legacy {
                gas_price: assembled.gas_price,
            }
            .apply(&mut request);
        }
        tracing::debug!(assembled_nonce = assembled.nonce, "Nonce is refetched before signing");

        self.submit(SwapStep::Swap, request).await
    }

    /// Wait for a receipt; anything but a successful one fails the step.
    async fn confirm(&self, step: SwapStep, tx_hash: TxHash) -> SwapResult<TransactionOutcome> {
        let timeout = self.settings.receipt_timeout_secs;
        match self
            .waiter
            .wait(tx_hash, timeout, self.settings.receipt_poll_interval_secs)
            .await?
        {
            TransactionOutcome::Confirmed => Ok(TransactionOutcome::Confirmed),
            TransactionOutcome::Reverted => Err(SwapError::TransactionReverted { step, tx_hash }),
            TransactionOutcome::TimedOut => Err(SwapError::Timeout {
                step,
                tx_hash,
                waited_secs: timeout,
            }),
        }
    }

    async fn price(&self, request: &mut TransactionRequest) -> SwapResult<()> {
        let quote = self.fees.estimate_fee(self.settings.fee_mode).await?;
        quote.apply(request);
        Ok(())
    }

    async fn submit(&self, step: SwapStep, request: TransactionRequest) -> SwapResult<TxHash> {
        let tx_hash = self.broadcaster.broadcast(request, true).await?;
        metrics::record_transaction_submitted(step.as_str());
        tracing::info!(tx = %self.waiter.link(tx_hash), "{} transaction submitted", step);
        Ok(tx_hash)
    }
}

fn ensure_funds(step: SwapStep, available: U256, required: U256) -> SwapResult<()> {
    if available < required {
        return Err(SwapError::InsufficientFunds {
            step,
            available,
            required,
        });
    }
    Ok(())
}
