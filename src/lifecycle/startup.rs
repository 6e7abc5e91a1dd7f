//! Startup orchestration.
//!
//! # Responsibilities
//! - Derive the account from the validated key
//! - Check the proxy once, before anything depends on it
//! - Connect to the RPC and confirm the chain ID
//! - Wire the routing client and the pipeline together
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::units::format_amount;
use crate::blockchain::{
    Account, BlockchainClient, BlockchainConfig, BlockchainError, ChainRpc, FeeMode, TokioSleeper,
};
use crate::config::schema::{NetworkConfig, SwapConfig};
use crate::net::proxy::{ProxyEndpoint, ProxyError};
use crate::pipeline::context::NATIVE_DECIMALS;
use crate::pipeline::{PipelineSettings, SwapContext, SwapError, SwapPipeline};
use crate::quoting::{ApiError, OdosClient};

/// Command-line adjustments applied on top of the settings file.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Do not probe the proxy before use.
    pub skip_proxy_check: bool,
    /// Price self-built transactions with `gasPrice` only.
    pub legacy_fees: bool,
}

/// Anything that prevents the run from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Proxy unusable: {0}")]
    Proxy(#[from] ProxyError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

impl StartupError {
    /// Process exit code; run-level errors keep their own class.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Swap(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Build a ready-to-run pipeline for `network`.
pub async fn bootstrap(
    config: &SwapConfig,
    network: &NetworkConfig,
    options: &StartupOptions,
) -> Result<SwapPipeline, StartupError> {
    let account = Arc::new(Account::from_private_key(
        &config.swap.private_key,
        network.chain_id,
    )?);
    tracing::info!(network = %config.swap.network, amount = config.swap.amount, "Preparing swap");

    let proxy = match config.swap.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(raw) => {
            let endpoint = ProxyEndpoint::parse(raw)?;
            if config.rpc.verify_proxy && !options.skip_proxy_check {
                endpoint.probe().await?;
            } else {
                tracing::warn!(host = %endpoint.host, "Proxy check skipped");
            }
            Some(endpoint)
        }
        None => {
            tracing::info!("No proxy configured, connecting directly");
            None
        }
    };
    let reqwest_proxy = proxy.as_ref().map(ProxyEndpoint::to_reqwest).transpose()?;

    let client = BlockchainClient::new(BlockchainConfig {
        rpc_url: network.rpc_url.clone(),
        failover_urls: network.failover_urls.clone(),
        chain_id: network.chain_id,
        rpc_timeout_secs: config.rpc.timeout_secs,
        proxy: reqwest_proxy.clone(),
    })?;
    let chain_id = client.verify_chain_id().await?;
    tracing::info!(chain_id = chain_id.0, "Connected to chain");

    let native = client.get_balance(account.address()).await?;
    tracing::info!(
        balance = %format_amount(native, NATIVE_DECIMALS).unwrap_or_else(|_| native.to_string()),
        "Native balance"
    );

    let router = OdosClient::new(
        &config.aggregator.base_url,
        Duration::from_secs(config.aggregator.request_timeout_secs),
        reqwest_proxy,
    )?;

    let ctx = SwapContext::new(account.address(), network, config.swap.amount, proxy)?;
    let mut settings = PipelineSettings::from(&config.transactions);
    if options.legacy_fees {
        settings.fee_mode = FeeMode::Legacy;
    }

    Ok(SwapPipeline::new(
        ctx,
        settings,
        account,
        Arc::new(client),
        Arc::new(router),
        Arc::new(TokioSleeper),
    ))
}
