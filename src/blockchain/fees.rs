//! Fee estimation for self-constructed transactions.
//!
//! Two separate computations live here:
//! - [`FeeEstimator::estimate_fee`] prices the transaction that is actually sent.
//! - [`FeeEstimator::estimated_total_fee`] is a coarse affordability budget used
//!   only by pre-flight balance checks.

use alloy::primitives::U256;
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult, FeeMode, FeeQuote};

/// Blocks sampled by the fee-budget history query.
pub const FEE_HISTORY_BLOCKS: u64 = 10;
/// Reward percentile requested alongside the fee history.
pub const FEE_HISTORY_PERCENTILE: f64 = 50.0;
/// Gas units assumed by the coarse fee budget.
pub const BUDGET_GAS_UNITS: u64 = 70_000;

/// `value * 1.25`, floored.
fn with_headroom(value: u128) -> u128 {
    value.saturating_mul(5) / 4
}

impl FeeQuote {
    /// EIP-1559 pricing from a base fee and the node's suggested tip.
    ///
    /// A zero tip falls back to the base fee.
    pub fn eip1559(base_fee: u128, suggested_priority_fee: u128) -> Self {
        let max_priority_fee_per_gas = if suggested_priority_fee == 0 {
            base_fee
        } else {
            suggested_priority_fee
        };
        FeeQuote::Eip1559 {
            max_fee_per_gas: with_headroom(base_fee).saturating_add(max_priority_fee_per_gas),
            max_priority_fee_per_gas,
        }
    }

    /// Legacy pricing from the current gas price.
    pub fn legacy(gas_price: u128) -> Self {
        FeeQuote::Legacy {
            gas_price: with_headroom(gas_price),
        }
    }

    /// Write the fee fields into a request, clearing the other model's fields.
    pub fn apply(&self, tx: &mut TransactionRequest) {
        match *self {
            FeeQuote::Legacy { gas_price } => {
                tx.gas_price = Some(gas_price);
                tx.max_fee_per_gas = None;
                tx.max_priority_fee_per_gas = None;
                tx.transaction_type = None;
            }
            FeeQuote::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                tx.gas_price = None;
                tx.max_fee_per_gas = Some(max_fee_per_gas);
                tx.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
                tx.transaction_type = Some(2);
            }
        }
    }
}

/// Computes fee parameters from live network data.
#[derive(Clone)]
pub struct FeeEstimator {
    rpc: Arc<dyn ChainRpc>,
}

impl FeeEstimator {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self { rpc }
    }

    /// Price a transaction under the given fee model.
    ///
    /// The EIP-1559 base fee is taken from `eth_gasPrice`.
    pub async fn estimate_fee(&self, mode: FeeMode) -> BlockchainResult<FeeQuote> {
        let gas_price = self.rpc.get_gas_price().await?;
        let quote = match mode {
            FeeMode::Legacy => FeeQuote::legacy(gas_price),
            FeeMode::Eip1559 => {
                let priority = self.rpc.get_max_priority_fee().await?;
                FeeQuote::eip1559(gas_price, priority)
            }
        };
        tracing::debug!(?mode, ?quote, "Fee estimated");
        Ok(quote)
    }

    /// Coarse upper bound on what one transaction may cost, in wei.
    pub async fn estimated_total_fee(&self) -> BlockchainResult<U256> {
        let base_fees = self
            .rpc
            .get_fee_history(FEE_HISTORY_BLOCKS, &[FEE_HISTORY_PERCENTILE])
            .await?;
        let base_fee = *base_fees
            .last()
            .ok_or_else(|| BlockchainError::Rpc("fee history returned no base fees".into()))?;
        let priority = self.rpc.get_max_priority_fee().await?;

        let budget = U256::from(base_fee)
            .saturating_add(U256::from(priority))
            .saturating_mul(U256::from(BUDGET_GAS_UNITS));
        tracing::debug!(base_fee, priority, budget = %budget, "Fee budget estimated");
        Ok(budget)
    }
}
