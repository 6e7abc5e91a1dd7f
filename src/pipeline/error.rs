//! Error taxonomy of a swap run.

use alloy::primitives::{TxHash, U256};
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::blockchain::units::{format_amount, UnitError};
use crate::pipeline::context::NATIVE_DECIMALS;
use crate::pipeline::steps::SwapStep;
use crate::quoting::ApiError;

fn human(value: &U256) -> String {
    format_amount(*value, NATIVE_DECIMALS).unwrap_or_else(|_| value.to_string())
}

/// Every way a run can end early.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Insufficient funds for {step}: balance {}, required {} (amount + fees)",
        human(.available),
        human(.required)
    )]
    InsufficientFunds {
        step: SwapStep,
        available: U256,
        required: U256,
    },

    #[error(transparent)]
    UpstreamApi(#[from] ApiError),

    #[error("Assembled transaction rejected: {0}")]
    InvalidAssembly(String),

    #[error("{step} transaction {tx_hash} reverted")]
    TransactionReverted { step: SwapStep, tx_hash: TxHash },

    #[error("{step} transaction {tx_hash} not mined after {waited_secs}s; its fate is unknown")]
    Timeout {
        step: SwapStep,
        tx_hash: TxHash,
        waited_secs: u64,
    },

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("{step} ran before the step it depends on")]
    OutOfOrder { step: SwapStep },

    #[error("Run cancelled during {step}")]
    Cancelled { step: SwapStep },
}

impl From<UnitError> for SwapError {
    fn from(e: UnitError) -> Self {
        SwapError::Configuration(e.to_string())
    }
}

impl SwapError {
    /// Short operator-facing label for the failure class.
    pub fn headline(&self) -> &'static str {
        match self {
            SwapError::Configuration(_) => "Bad configuration",
            SwapError::InsufficientFunds { .. } => "Not enough funds",
            SwapError::UpstreamApi(_) | SwapError::InvalidAssembly(_) => "Routing API failure",
            SwapError::TransactionReverted { .. } => "Transaction failed on-chain",
            SwapError::Timeout { .. } => "Transaction unresolved",
            SwapError::Blockchain(_) => "Blockchain RPC failure",
            SwapError::OutOfOrder { .. } => "Internal sequencing error",
            SwapError::Cancelled { .. } => "Cancelled",
        }
    }

    /// Process exit code for the failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            SwapError::Configuration(_) => 2,
            SwapError::InsufficientFunds { .. } => 3,
            SwapError::UpstreamApi(_) | SwapError::InvalidAssembly(_) => 4,
            SwapError::TransactionReverted { .. } => 5,
            SwapError::Timeout { .. } => 6,
            SwapError::Blockchain(_) => 7,
            SwapError::OutOfOrder { .. } => 70,
            SwapError::Cancelled { .. } => 130,
        }
    }
}

pub type SwapResult<T> = Result<T, SwapError>;
