//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! settings (private key, network)
//!     → wallet.rs (account, signing)
//!     → client.rs (RPC connection with timeouts, behind rpc.rs)
//!     → fees.rs (legacy / EIP-1559 pricing, fee budget)
//!     → transaction.rs (nonce, gas limit, sign, broadcast)
//!     → receipt.rs (bounded receipt polling)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Signed transactions are submitted once; no automatic resubmission

pub mod client;
pub mod contracts;
pub mod fees;
pub mod receipt;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::{BlockchainClient, BlockchainConfig};
pub use fees::FeeEstimator;
pub use receipt::{ReceiptWaiter, Sleeper, TokioSleeper};
pub use rpc::ChainRpc;
pub use transaction::TransactionBroadcaster;
pub use types::{BlockchainError, ChainId, FeeMode, FeeQuote, TransactionOutcome};
pub use wallet::Account;
