//! Error types for the CometBFT JSON-RPC client.

use thiserror::Error;

/// RPC-specific error type for the CometBFT client.
#[derive(Debug, Error)]
pub enum RpcError {
    /// HTTP/network error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON-RPC error object returned by the node
    #[error("JSON-RPC error {code}: {message}{}", format_data(.data))]
    JsonRpc {
        code: i64,
        message: String,
        data: Option<String>,
    },

    /// Response carried neither `result` nor `error`
    #[error("Missing result in response to {0}")]
    MissingResult(String),

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

fn format_data(data: &Option<String>) -> String {
    match data {
        Some(d) if !d.is_empty() => format!(" ({})", d),
        _ => String::new(),
    }
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Error object of a JSON-RPC 2.0 response.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl From<JsonRpcErrorObject> for RpcError {
    fn from(err: JsonRpcErrorObject) -> Self {
        RpcError::JsonRpc {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rpc_error_display() {
        let err: RpcError = JsonRpcErrorObject {
            code: -32603,
            message: "Internal error".to_string(),
            data: Some("tx already exists in cache".to_string()),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "JSON-RPC error -32603: Internal error (tx already exists in cache)"
        );
    }

    #[test]
    fn test_json_rpc_error_display_without_data() {
        let err = RpcError::JsonRpc {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        };
        assert_eq!(err.to_string(), "JSON-RPC error -32601: Method not found");
    }
}
