//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the selected network is supported and present in the networks file
//! - Validate value ranges (amount > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: no network access (the proxy probe runs at startup)

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

use crate::config::schema::{NetworkConfig, SwapConfig};
use crate::net::ProxyEndpoint;

/// Networks the routing service is used on.
pub const SUPPORTED_NETWORKS: &[&str] = &[
    "Ethereum",
    "Optimism",
    "BNB",
    "Polygon",
    "Fantom",
    "Fraxtal",
    "zkSync Era",
    "Mantle",
    "Base",
    "Arbitrum",
    "Linea",
    "Scroll",
];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing '{0}'")]
    Missing(&'static str),

    #[error("invalid 'private_key'")]
    PrivateKey,

    #[error("unsupported network '{0}'")]
    UnsupportedNetwork(String),

    #[error("invalid 'proxy': {0}")]
    Proxy(String),

    #[error("invalid 'amount' {0}: must be a positive number")]
    Amount(String),

    #[error("'{0}' must be greater than zero")]
    Zero(&'static str),

    #[error("network '{network}': {reason}")]
    Network { network: String, reason: String },
}

/// Validate the settings file.
pub fn validate_config(config: &SwapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let swap = &config.swap;

    if swap.private_key.trim().is_empty() {
        errors.push(ValidationError::Missing("private_key"));
    } else if !is_valid_private_key(&swap.private_key) {
        errors.push(ValidationError::PrivateKey);
    }

    if swap.network.is_empty() {
        errors.push(ValidationError::Missing("network"));
    } else if !SUPPORTED_NETWORKS.contains(&swap.network.as_str()) {
        errors.push(ValidationError::UnsupportedNetwork(swap.network.clone()));
    }

    if let Some(proxy) = swap.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        if let Err(e) = ProxyEndpoint::parse(proxy) {
            errors.push(ValidationError::Proxy(e.to_string()));
        }
    }

    if !swap.amount.is_finite() || swap.amount <= 0.0 {
        errors.push(ValidationError::Amount(swap.amount.to_string()));
    }

    let tx = &config.transactions;
    for (name, value) in [
        ("transactions.approve_gas_limit", tx.approve_gas_limit),
        ("transactions.wrap_gas_limit", tx.wrap_gas_limit),
        ("transactions.receipt_timeout_secs", tx.receipt_timeout_secs),
        ("transactions.receipt_poll_interval_secs", tx.receipt_poll_interval_secs),
        ("aggregator.request_timeout_secs", config.aggregator.request_timeout_secs),
        ("rpc.timeout_secs", config.rpc.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(name));
        }
    }

    if url::Url::parse(&config.aggregator.base_url).is_err() {
        errors.push(ValidationError::Network {
            network: "aggregator".to_string(),
            reason: format!("invalid base_url '{}'", config.aggregator.base_url),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one network's constants.
pub fn validate_network(name: &str, network: &NetworkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |reason: String| {
        errors.push(ValidationError::Network {
            network: name.to_string(),
            reason,
        })
    };

    if url::Url::parse(&network.rpc_url).is_err() {
        fail(format!("invalid rpc_url '{}'", network.rpc_url));
    }
    if network.chain_id == 0 {
        fail("chain_id must be non-zero".to_string());
    }
    for (field, address) in [
        ("router_address", network.router_address),
        ("from_address", network.from_address),
        ("to_address", network.to_address),
    ] {
        if address == Address::ZERO {
            fail(format!("{} is the zero address", field));
        }
    }
    if network.from_address == network.to_address {
        fail("from_address and to_address are the same token".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_private_key(raw: &str) -> bool {
    let key = raw.trim();
    key.strip_prefix("0x")
        .unwrap_or(key)
        .parse::<PrivateKeySigner>()
        .is_ok()
}
