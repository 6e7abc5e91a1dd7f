//! Narrow chain-access interface consumed by the transaction lifecycle.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::BlockchainResult;

/// Chain RPC operations the swap core depends on.
///
/// `BlockchainClient` is the JSON-RPC implementation; tests substitute an
/// in-memory chain.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance in wei.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Transaction count (next nonce) at the latest block.
    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    async fn get_chain_id(&self) -> BlockchainResult<u64>;

    /// `eth_gasPrice` in wei.
    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    /// `eth_maxPriorityFeePerGas` in wei.
    async fn get_max_priority_fee(&self) -> BlockchainResult<u128>;

    /// Base fee per gas for the last `block_count` blocks, oldest first.
    async fn get_fee_history(
        &self,
        block_count: u64,
        reward_percentiles: &[f64],
    ) -> BlockchainResult<Vec<u128>>;

    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64>;

    /// Submit a signed transaction exactly once.
    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash>;

    /// `None` while the transaction is not mined, otherwise its success flag.
    async fn get_receipt_status(&self, tx_hash: TxHash) -> BlockchainResult<Option<bool>>;

    async fn erc20_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256>;

    async fn erc20_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> BlockchainResult<U256>;
}
