//! HTTP client for the Odos smart order router.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::quoting::types::{AssembleRequest, AssembleResponse, QuoteRequest, QuoteResponse};
use crate::quoting::{ApiError, ApiResult, SwapRouter};

pub const QUOTE_PATH: &str = "/sor/quote/v2";
pub const ASSEMBLE_PATH: &str = "/sor/assemble";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest error body kept in an [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Routing API client. Every request carries the same timeout and proxy.
#[derive(Debug, Clone)]
pub struct OdosClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OdosClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        proxy: Option<reqwest::Proxy>,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        builder = match proxy {
            Some(proxy) => builder.proxy(proxy),
            None => builder.no_proxy(),
        };
        let http = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn post<B, R>(&self, path: &'static str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Routing API request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        if !status.is_success() {
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(ApiError::Status {
                endpoint: path,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            endpoint: path,
            reason: e.to_string(),
        })
    }

    fn transport_error(&self, endpoint: &'static str, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                endpoint,
                secs: self.timeout.as_secs(),
            }
        } else {
            ApiError::Transport {
                endpoint,
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl SwapRouter for OdosClient {
    async fn quote(&self, request: &QuoteRequest) -> ApiResult<QuoteResponse> {
        let quote: QuoteResponse = self.post(QUOTE_PATH, request).await?;
        tracing::debug!(path_id = %quote.path_id, "Quote decoded");
        Ok(quote)
    }

    async fn assemble(&self, request: &AssembleRequest) -> ApiResult<AssembleResponse> {
        let assembled: AssembleResponse = self.post(ASSEMBLE_PATH, request).await?;
        tracing::debug!(to = %assembled.transaction.to, "Assembly decoded");
        Ok(assembled)
    }
}
