//! Shared utilities for integration testing.
#![allow(dead_code)]

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use odos_swapper::blockchain::types::{BlockchainError, BlockchainResult};
use odos_swapper::blockchain::{ChainRpc, Sleeper};
use odos_swapper::config::NetworkConfig;
use odos_swapper::quoting::{
    ApiError, ApiResult, AssembleRequest, AssembleResponse, AssembledTransaction, QuoteRequest,
    QuoteResponse, SwapRouter,
};

/// Anvil's first dev account.
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const CHAIN_ID: u64 = 42161;
pub const GWEI: u128 = 1_000_000_000;

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn router_address() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn weth_address() -> Address {
    Address::repeat_byte(0xbb)
}

pub fn usdc_address() -> Address {
    Address::repeat_byte(0xcc)
}

pub fn test_network() -> NetworkConfig {
    NetworkConfig {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        failover_urls: Vec::new(),
        chain_id: CHAIN_ID,
        router_address: router_address(),
        from_address: weth_address(),
        to_address: usdc_address(),
        explorer_url: "https://arbiscan.io/".to_string(),
    }
}

/// In-memory chain. Every submitted transaction is kept and decodable;
/// its receipt status is scripted by submission order.
pub struct MockChain {
    pub native_balance: Mutex<U256>,
    pub token_balance: Mutex<U256>,
    pub allowance: Mutex<U256>,
    pub gas_price: u128,
    pub priority_fee: u128,
    pub base_fee: u128,
    /// Receipt status of the n-th submitted transaction; missing means success.
    pub receipts: Mutex<Vec<Option<bool>>>,
    sent: Mutex<Vec<Vec<u8>>>,
    estimate_calls: Mutex<u32>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            native_balance: Mutex::new(ether(2)),
            token_balance: Mutex::new(ether(2)),
            allowance: Mutex::new(U256::ZERO),
            gas_price: 10 * GWEI,
            priority_fee: GWEI,
            base_fee: 8 * GWEI,
            receipts: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            estimate_calls: Mutex::new(0),
        }
    }
}

impl MockChain {
    pub fn with_allowance(self, allowance: U256) -> Self {
        *self.allowance.lock().unwrap() = allowance;
        self
    }

    pub fn with_native_balance(self, balance: U256) -> Self {
        *self.native_balance.lock().unwrap() = balance;
        self
    }

    pub fn with_token_balance(self, balance: U256) -> Self {
        *self.token_balance.lock().unwrap() = balance;
        self
    }

    pub fn with_receipts(self, receipts: Vec<Option<bool>>) -> Self {
        *self.receipts.lock().unwrap() = receipts;
        self
    }

    /// Every submitted transaction, decoded, in submission order.
    pub fn sent(&self) -> Vec<TxEnvelope> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap())
            .collect()
    }

    pub fn estimate_calls(&self) -> u32 {
        *self.estimate_calls.lock().unwrap()
    }

    /// Wei charged by the pre-flight fee budget.
    pub fn fee_budget(&self) -> U256 {
        U256::from(self.base_fee + self.priority_fee) * U256::from(70_000u64)
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn get_balance(&self, _: Address) -> BlockchainResult<U256> {
        Ok(*self.native_balance.lock().unwrap())
    }

    async fn get_transaction_count(&self, _: Address) -> BlockchainResult<u64> {
        Ok(self.sent.lock().unwrap().len() as u64)
    }

    async fn get_chain_id(&self) -> BlockchainResult<u64> {
        Ok(CHAIN_ID)
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        Ok(self.gas_price)
    }

    async fn get_max_priority_fee(&self) -> BlockchainResult<u128> {
        Ok(self.priority_fee)
    }

    async fn get_fee_history(&self, blocks: u64, _: &[f64]) -> BlockchainResult<Vec<u128>> {
        let mut fees = vec![self.base_fee / 2; blocks as usize];
        if let Some(last) = fees.last_mut() {
            *last = self.base_fee;
        }
        Ok(fees)
    }

    async fn estimate_gas(&self, _: &TransactionRequest) -> BlockchainResult<u64> {
        *self.estimate_calls.lock().unwrap() += 1;
        Ok(50_000)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        self.sent.lock().unwrap().push(raw.to_vec());
        Ok(keccak256(raw))
    }

    async fn get_receipt_status(&self, tx_hash: TxHash) -> BlockchainResult<Option<bool>> {
        let position = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .position(|raw| keccak256(raw) == tx_hash)
            .ok_or_else(|| BlockchainError::Rpc(format!("unknown transaction {}", tx_hash)))?;
        Ok(self
            .receipts
            .lock()
            .unwrap()
            .get(position)
            .copied()
            .unwrap_or(Some(true)))
    }

    async fn erc20_balance(&self, _: Address, _: Address) -> BlockchainResult<U256> {
        Ok(*self.token_balance.lock().unwrap())
    }

    async fn erc20_allowance(&self, _: Address, _: Address, _: Address) -> BlockchainResult<U256> {
        Ok(*self.allowance.lock().unwrap())
    }
}

/// Routing API double that records what it was asked.
pub struct MockRouter {
    pub path_id: String,
    pub assembled: AssembledTransaction,
    pub fail_quote: bool,
    pub quotes: Mutex<Vec<QuoteRequest>>,
    pub assembles: Mutex<Vec<AssembleRequest>>,
}

impl MockRouter {
    pub fn new(user: Address) -> Self {
        Self {
            path_id: "abc".to_string(),
            assembled: AssembledTransaction {
                to: router_address(),
                from: user,
                data: vec![0x83, 0xbd, 0x37, 0xf9, 0x01].into(),
                chain_id: CHAIN_ID,
                gas: 420_000,
                gas_price: 12 * GWEI,
                nonce: 99,
                value: U256::ZERO,
            },
            fail_quote: false,
            quotes: Mutex::new(Vec::new()),
            assembles: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SwapRouter for MockRouter {
    async fn quote(&self, request: &QuoteRequest) -> ApiResult<QuoteResponse> {
        self.quotes.lock().unwrap().push(request.clone());
        if self.fail_quote {
            return Err(ApiError::Status {
                endpoint: "quote",
                status: 400,
                body: "no route".to_string(),
            });
        }
        Ok(QuoteResponse {
            path_id: self.path_id.clone(),
            out_amounts: vec!["2500000000".to_string()],
            gas_estimate: Some(300_000.0),
            price_impact: Some(0.01),
        })
    }

    async fn assemble(&self, request: &AssembleRequest) -> ApiResult<AssembleResponse> {
        self.assembles.lock().unwrap().push(request.clone());
        Ok(AssembleResponse {
            transaction: self.assembled.clone(),
        })
    }
}

/// Sleeper that records requested durations without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn calls(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Start a programmable HTTP backend. The handler receives each request's
/// body and returns the status and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let body = read_request_body(&mut socket).await;
                let (status, body) = f(body).await;
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response_str = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return String::from_utf8_lossy(&buf[header_end + 4..]).into_owned();
            }
        }
    }
    String::new()
}

/// Start a JSON-RPC backend answering each listed method with a fixed result
/// and anything else with "method not found".
pub async fn start_json_rpc_backend(results: Vec<(&'static str, serde_json::Value)>) -> SocketAddr {
    let results = Arc::new(results);
    start_programmable_backend(move |body| {
        let results = results.clone();
        async move {
            let request: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            let method = request["method"].as_str().unwrap_or_default();
            let response = match results.iter().find(|(m, _)| *m == method) {
                Some((_, result)) => json!({"jsonrpc": "2.0", "id": request["id"], "result": result}),
                None => json!({
                    "jsonrpc": "2.0",
                    "id": request["id"],
                    "error": {"code": -32601, "message": "method not found"}
                }),
            };
            (200, response.to_string())
        }
    })
    .await
}
