//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction request is missing a field required for signing.
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Raw transaction was rejected by the node.
    #[error("Broadcast rejected: {0}")]
    Broadcast(String),

    /// Contract return data could not be decoded.
    #[error("Failed to decode {call} response: {reason}")]
    Decode { call: &'static str, reason: String },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Fee model used when pricing a self-constructed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Single `gasPrice` field.
    Legacy,
    /// `maxFeePerGas` + `maxPriorityFeePerGas`.
    #[default]
    Eip1559,
}

/// Fee parameters computed for exactly one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeQuote {
    Legacy {
        gas_price: u128,
    },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

/// What a single receipt query observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptPoll {
    /// Not yet mined (or not yet visible to the node).
    NotFound,
    /// Mined; `true` when execution succeeded.
    Mined(bool),
}

impl From<Option<bool>> for ReceiptPoll {
    fn from(status: Option<bool>) -> Self {
        match status {
            Some(success) => ReceiptPoll::Mined(success),
            None => ReceiptPoll::NotFound,
        }
    }
}

/// Terminal result of waiting on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Receipt observed with success status.
    Confirmed,
    /// Receipt observed with failure status.
    Reverted,
    /// No receipt within the wait budget; the transaction may still land.
    TimedOut,
}

impl TransactionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionOutcome::Confirmed => "confirmed",
            TransactionOutcome::Reverted => "reverted",
            TransactionOutcome::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed, RLP/2718-encoded transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: TxHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(42161u64);
        assert_eq!(chain_id.0, 42161);
        assert_eq!(u64::from(chain_id), 42161);
    }

    #[test]
    fn test_receipt_poll_from_status() {
        assert_eq!(ReceiptPoll::from(None), ReceiptPoll::NotFound);
        assert_eq!(ReceiptPoll::from(Some(true)), ReceiptPoll::Mined(true));
        assert_eq!(ReceiptPoll::from(Some(false)), ReceiptPoll::Mined(false));
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::ChainMismatch {
            expected: 1,
            actual: 10,
        };
        assert!(err.to_string().contains("expected 1"));
    }
}
