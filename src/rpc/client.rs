//! CometBFT JSON-RPC client implementation.
//!
//! The [`RpcClient`] speaks JSON-RPC 2.0 over HTTP to the node's RPC
//! listener (port 26657 by default). It covers the two methods the order
//! flow needs: `status` and `broadcast_tx_sync`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dydx_client::rpc::RpcClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::new("tcp://localhost:26657")?;
//!
//!     let status = client.status().await?;
//!     println!("Chain {} at height {}", status.chain_id, status.latest_block_height);
//!
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::network::normalize_endpoint;
use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::types::*;
use crate::shared::TxResponse;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcClientBuilder {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl RpcClientBuilder {
    /// Create a new builder for the given endpoint.
    ///
    /// `tcp://` and bare `host:port` endpoints are rewritten to `http://`.
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_endpoint(endpoint.as_ref()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> RpcResult<RpcClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.default_headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str())
                .map_err(|e| RpcError::InvalidParameter(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = reqwest::header::HeaderValue::from_str(&value)
                .map_err(|e| RpcError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        Ok(RpcClient {
            http_client,
            base_url: self.base_url,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }
}

/// CometBFT JSON-RPC client.
///
/// Requests are not retried; every failure is surfaced to the caller.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http_client: Client,
    base_url: String,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    /// Create a new client for the given endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(endpoint: impl AsRef<str>) -> RpcResult<Self> {
        RpcClientBuilder::new(endpoint).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(endpoint: impl AsRef<str>) -> RpcClientBuilder {
        RpcClientBuilder::new(endpoint)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Node endpoints
    // =========================================================================

    /// Query node identity and sync state.
    pub async fn status(&self) -> RpcResult<NodeStatus> {
        let status: StatusResponse = self.call("status", NoParams {}).await?;
        Ok(status.into())
    }

    /// Submit a signed transaction and wait for its CheckTx result.
    ///
    /// A non-zero `code` in the returned [`TxResponse`] means the node
    /// rejected the transaction; it is reported, not turned into an error.
    pub async fn broadcast_tx_sync(&self, tx_bytes: &[u8]) -> RpcResult<TxResponse> {
        if tx_bytes.is_empty() {
            return Err(RpcError::InvalidParameter("Transaction bytes cannot be empty".to_string()));
        }

        let params = BroadcastTxParams {
            tx: base64::engine::general_purpose::STANDARD.encode(tx_bytes),
        };
        let result: BroadcastTxResult = self.call("broadcast_tx_sync", params).await?;
        Ok(result.into())
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Execute a JSON-RPC call and decode its `result`.
    async fn call<P, T>(&self, method: &str, params: P) -> RpcResult<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        tracing::debug!(method, id, url = %self.base_url, "Sending JSON-RPC request");

        let response = self
            .http_client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // CometBFT reports JSON-RPC errors with 500s; prefer the error object when present.
            if let Ok(JsonRpcResponse { error: Some(error), .. }) =
                serde_json::from_str::<JsonRpcResponse<serde_json::Value>>(&body)
            {
                return Err(error.into());
            }
            return Err(RpcError::UnexpectedStatus(status.as_u16(), body));
        }

        let envelope: JsonRpcResponse<T> = serde_json::from_str(&body).map_err(|e| {
            RpcError::Deserialize(format!("Failed to deserialize {} response: {}", method, e))
        })?;

        match envelope {
            JsonRpcResponse { error: Some(error), .. } => Err(error.into()),
            JsonRpcResponse { result: Some(result), .. } => Ok(result),
            _ => Err(RpcError::MissingResult(method.to_string())),
        }
    }
}
