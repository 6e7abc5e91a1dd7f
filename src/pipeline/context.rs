//! Run-scoped, read-only swap parameters.

use alloy::primitives::{Address, U256};
use std::time::Duration;

use crate::blockchain::types::FeeMode;
use crate::blockchain::units::to_smallest_unit;
use crate::config::schema::{NetworkConfig, TransactionConfig};
use crate::net::proxy::ProxyEndpoint;
use crate::pipeline::error::SwapResult;

/// Decimals of the wrapped-native input token.
pub const NATIVE_DECIMALS: u8 = 18;

/// Everything a step needs to know about this run. Fixed at construction.
#[derive(Debug, Clone)]
pub struct SwapContext {
    /// Signing account.
    pub account: Address,
    pub chain_id: u64,
    /// Router that receives the allowance and executes the swap.
    pub router: Address,
    /// Wrapped-native token.
    pub input_token: Address,
    pub output_token: Address,
    /// Human amount as configured.
    pub amount: f64,
    /// `amount` in wei.
    pub amount_wei: U256,
    pub explorer_url: String,
    /// Proxy all outbound traffic of the run goes through.
    pub proxy: Option<ProxyEndpoint>,
}

impl SwapContext {
    pub fn new(
        account: Address,
        network: &NetworkConfig,
        amount: f64,
        proxy: Option<ProxyEndpoint>,
    ) -> SwapResult<Self> {
        let amount_wei = to_smallest_unit(amount, NATIVE_DECIMALS)?;
        Ok(Self {
            account,
            chain_id: network.chain_id,
            router: network.router_address,
            input_token: network.from_address,
            output_token: network.to_address,
            amount,
            amount_wei,
            explorer_url: network.explorer_url.clone(),
            proxy,
        })
    }
}

/// Transaction tuning resolved from configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub fee_mode: FeeMode,
    pub approve_gas_limit: u64,
    pub wrap_gas_limit: u64,
    pub receipt_timeout_secs: u64,
    pub receipt_poll_interval_secs: u64,
    pub step_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&TransactionConfig::default())
    }
}

impl From<&TransactionConfig> for PipelineSettings {
    fn from(config: &TransactionConfig) -> Self {
        Self {
            fee_mode: config.fee_mode,
            approve_gas_limit: config.approve_gas_limit,
            wrap_gas_limit: config.wrap_gas_limit,
            receipt_timeout_secs: config.receipt_timeout_secs,
            receipt_poll_interval_secs: config.receipt_poll_interval_secs,
            step_delay: Duration::from_millis(config.step_delay_ms),
        }
    }
}
