//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (optionally through the run's proxy)
//! - Query chain state (balances, nonces, fees, receipts, token state)
//! - Submit signed transactions to the primary endpoint
//! - Handle timeouts and network errors gracefully

use alloy::network::ReceiptResponse as _;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::{BlockNumberOrTag, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::http::Http;
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contracts::IERC20;
use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Connection settings for the selected network's RPC.
#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Failover JSON-RPC endpoint URLs (read-only queries other than nonces).
    pub failover_urls: Vec<String>,
    /// Expected chain ID.
    pub chain_id: u64,
    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
    /// Optional proxy every RPC request is routed through.
    pub proxy: Option<reqwest::Proxy>,
}

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only when the primary URL is unusable; an unreachable node is
    /// reported by the first query instead.
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(connect(primary_url, config.proxy.as_ref())?);

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => providers.push(connect(url, config.proxy.as_ref())?),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            failovers = providers.len() - 1,
            proxied = config.proxy.is_some(),
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<ChainId> {
        let actual = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(ChainId(actual))
    }

    /// Run a read-only query against each provider in turn until one answers.
    async fn query<T, F, Fut>(&self, what: &str, op: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc(format!("All providers failed to {}", what)))
    }

    async fn eth_call(&self, what: &str, to: Address, data: Vec<u8>) -> BlockchainResult<Bytes> {
        let request = TransactionRequest::default()
            .with_to(to)
            .with_input(Bytes::from(data));
        self.query(what, |p| {
            let request = request.clone();
            async move { p.call(request).await }
        })
        .await
    }
}

fn connect(url: url::Url, proxy: Option<&reqwest::Proxy>) -> BlockchainResult<DynProvider> {
    let mut builder = reqwest::Client::builder();
    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy.clone());
    }
    let http = builder
        .build()
        .map_err(|e| BlockchainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

    let client = RpcClient::new(Http::with_client(http, url), false);
    Ok(Arc::new(ProviderBuilder::new().connect_client(client)))
}

#[async_trait]
impl ChainRpc for BlockchainClient {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.query("get balance", |p| async move { p.get_balance(address).await })
            .await
    }

    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        // Nonces come from the endpoint that receives the broadcast; a lagging
        // failover could hand out a stale one.
        let provider = &self.providers[0];
        match timeout(self.timeout_duration, async {
            provider.get_transaction_count(address).await
        })
        .await
        {
            Ok(Ok(nonce)) => Ok(nonce),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("Failed to get nonce: {}", e))),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.query("get chain id", |p| async move { p.get_chain_id().await })
            .await
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.query("get gas price", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn get_max_priority_fee(&self) -> BlockchainResult<u128> {
        self.query("get max priority fee", |p| async move {
            p.get_max_priority_fee_per_gas().await
        })
        .await
    }

    async fn get_fee_history(
        &self,
        block_count: u64,
        reward_percentiles: &[f64],
    ) -> BlockchainResult<Vec<u128>> {
        let percentiles = reward_percentiles.to_vec();
        let history = self
            .query("get fee history", |p| {
                let percentiles = percentiles.clone();
                async move {
                    p.get_fee_history(block_count, BlockNumberOrTag::Latest, &percentiles)
                        .await
                }
            })
            .await?;
        Ok(history.base_fee_per_gas)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64> {
        self.query("estimate gas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        // Submission goes to the primary endpoint only and is never repeated.
        let provider = &self.providers[0];
        match timeout(self.timeout_duration, provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(BlockchainError::Broadcast(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    async fn get_receipt_status(&self, tx_hash: TxHash) -> BlockchainResult<Option<bool>> {
        let receipt = self
            .query("get receipt", |p| async move {
                p.get_transaction_receipt(tx_hash).await
            })
            .await?;
        Ok(receipt.map(|r| r.status()))
    }

    async fn erc20_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256> {
        let data = IERC20::balanceOfCall { owner }.abi_encode();
        let output = self.eth_call("call balanceOf", token, data).await?;
        IERC20::balanceOfCall::abi_decode_returns(&output).map_err(|e| BlockchainError::Decode {
            call: "balanceOf",
            reason: e.to_string(),
        })
    }

    async fn erc20_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> BlockchainResult<U256> {
        let data = IERC20::allowanceCall { owner, spender }.abi_encode();
        let output = self.eth_call("call allowance", token, data).await?;
        IERC20::allowanceCall::abi_decode_returns(&output).map_err(|e| BlockchainError::Decode {
            call: "allowance",
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            // Nothing listens here; queries fail fast with connection refused.
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 2,
            proxy: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = BlockchainClient::new(test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_rpc_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = BlockchainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        config.failover_urls.push("::bad::".to_string());

        let client = BlockchainClient::new(config).unwrap();
        let result = client.get_chain_id().await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("All providers failed to get chain id"));
    }
}
