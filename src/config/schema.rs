//! Configuration schema definitions.
//!
//! Two files feed a run:
//! - the settings file ([`SwapConfig`]): account, amount, proxy and tuning
//! - the networks file ([`NetworksFile`]): per-network addresses and endpoints
//!
//! All types derive Serde traits for deserialization from TOML.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::blockchain::receipt::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};
use crate::blockchain::types::FeeMode;

/// Root of the settings file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SwapConfig {
    /// What to swap and from which account.
    pub swap: SwapSettings,

    /// Transaction construction and confirmation tuning.
    pub transactions: TransactionConfig,

    /// Swap-routing API settings.
    pub aggregator: AggregatorConfig,

    /// RPC client settings.
    pub rpc: RpcConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-run swap settings.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SwapSettings {
    /// Hex private key. May be overridden by `SWAP_PRIVATE_KEY`.
    pub private_key: String,

    /// Network name; must be a key of the networks file.
    pub network: String,

    /// Proxy in `login:pass@host:port` form, used for RPC and API traffic.
    pub proxy: Option<String>,

    /// Amount of native token to wrap and swap, in human units.
    pub amount: f64,
}

impl std::fmt::Debug for SwapSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapSettings")
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .field("proxy", &self.proxy.as_ref().map(|_| "<set>"))
            .field("amount", &self.amount)
            .finish()
    }
}

/// Transaction tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Fee model for self-constructed transactions.
    pub fee_mode: FeeMode,

    /// Fixed gas limit for the approve transaction.
    pub approve_gas_limit: u64,

    /// Fixed gas limit for the wrap transaction.
    pub wrap_gas_limit: u64,

    /// Accumulated wait budget per receipt, in seconds.
    pub receipt_timeout_secs: u64,

    /// Interval between receipt polls, in seconds.
    pub receipt_poll_interval_secs: u64,

    /// Pause between pipeline steps, in milliseconds.
    pub step_delay_ms: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            fee_mode: FeeMode::Eip1559,
            approve_gas_limit: 60_000,
            wrap_gas_limit: 100_000,
            receipt_timeout_secs: DEFAULT_TIMEOUT_SECS,
            receipt_poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            step_delay_ms: 500,
        }
    }
}

/// Swap-routing API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Base URL of the routing API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.odos.xyz".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// RPC request timeout in seconds.
    pub timeout_secs: u64,

    /// Probe the proxy before doing anything else.
    pub verify_proxy: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            verify_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of pretty output.
    pub json_logs: bool,

    /// Prometheus endpoint bind address; disabled when absent.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_address: None,
        }
    }
}

/// Constants for one network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Read-only failover endpoints.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 42161 for Arbitrum One).
    pub chain_id: u64,

    /// Router contract that receives the allowance.
    pub router_address: Address,

    /// Wrapped-native token; the swap's input.
    pub from_address: Address,

    /// Output token.
    pub to_address: Address,

    /// Block explorer base URL, ending in `/`.
    pub explorer_url: String,
}

/// The networks file: one table per network name.
pub type NetworksFile = BTreeMap<String, NetworkConfig>;
