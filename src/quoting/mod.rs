//! Swap-routing API (quote + assemble).
//!
//! # Data Flow
//! ```text
//! QuoteRequest  → POST /sor/quote/v2  → QuoteResponse { pathId }
//! pathId + user → POST /sor/assemble  → AssembledTransaction { to, data, gas, ... }
//! ```
//!
//! Both calls are fatal on timeout or non-2xx; nothing here retries.

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::OdosClient;
pub use types::{
    AssembleRequest, AssembleResponse, AssembledTransaction, QuoteRequest, QuoteResponse,
};

/// Failures talking to the routing API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Routing API {endpoint} timed out after {secs}s")]
    Timeout { endpoint: &'static str, secs: u64 },

    #[error("Routing API {endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Routing API {endpoint} unreachable: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },

    #[error("Routing API {endpoint} sent an unreadable response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    #[error("Routing API client could not be built: {0}")]
    Client(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The two routing calls the pipeline needs.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> ApiResult<QuoteResponse>;

    async fn assemble(&self, request: &AssembleRequest) -> ApiResult<AssembleResponse>;
}
