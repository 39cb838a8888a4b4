//! Wire types for the CometBFT JSON-RPC endpoints used by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rpc::error::JsonRpcErrorObject;

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: P,
}

impl<P: Serialize> JsonRpcRequest<P> {
    pub fn new(id: u64, method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub result: Option<T>,
    pub error: Option<JsonRpcErrorObject>,
}

/// Empty parameter object (`{}`).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

// ============================================================================
// status
// ============================================================================

/// Result of the `status` method.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub node_info: NodeInfo,
    pub sync_info: SyncInfo,
}

/// Node identity as reported by `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    /// Chain ID the node is running
    pub network: String,
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub version: String,
}

/// Sync state as reported by `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncInfo {
    #[serde(with = "string_u64")]
    pub latest_block_height: u64,
    pub latest_block_time: DateTime<Utc>,
    #[serde(default)]
    pub catching_up: bool,
}

/// Condensed node status.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStatus {
    pub chain_id: String,
    pub latest_block_height: u64,
    pub latest_block_time: DateTime<Utc>,
    pub catching_up: bool,
}

impl From<StatusResponse> for NodeStatus {
    fn from(status: StatusResponse) -> Self {
        Self {
            chain_id: status.node_info.network,
            latest_block_height: status.sync_info.latest_block_height,
            latest_block_time: status.sync_info.latest_block_time,
            catching_up: status.sync_info.catching_up,
        }
    }
}

// ============================================================================
// broadcast_tx_sync
// ============================================================================

/// Parameters of `broadcast_tx_sync`.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastTxParams {
    /// Base64-encoded `TxRaw` bytes
    pub tx: String,
}

/// Result of `broadcast_tx_sync` (CheckTx outcome).
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastTxResult {
    pub code: u32,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub codespace: Option<String>,
    pub hash: String,
}

impl From<BroadcastTxResult> for crate::shared::TxResponse {
    fn from(result: BroadcastTxResult) -> Self {
        Self {
            txhash: result.hash,
            code: result.code,
            codespace: result.codespace.unwrap_or_default(),
            raw_log: result.log.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// CometBFT encodes 64-bit integers as JSON strings.
pub mod string_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(u64),
        }

        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("Invalid integer: {}", s))),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_JSON: &str = r#"{
        "node_info": {
            "network": "dydxprotocol-single",
            "moniker": "alice",
            "version": "0.38.6"
        },
        "sync_info": {
            "latest_block_hash": "ABCDEF",
            "latest_block_height": "1042",
            "latest_block_time": "2024-05-01T12:00:00.123456789Z",
            "catching_up": false
        }
    }"#;

    #[test]
    fn test_status_deserialize() {
        let status: StatusResponse = serde_json::from_str(STATUS_JSON).unwrap();
        assert_eq!(status.node_info.network, "dydxprotocol-single");
        assert_eq!(status.sync_info.latest_block_height, 1042);
        assert!(!status.sync_info.catching_up);

        let status = NodeStatus::from(status);
        assert_eq!(status.chain_id, "dydxprotocol-single");
        assert_eq!(status.latest_block_time.timestamp(), 1_714_564_800);
    }

    #[test]
    fn test_height_as_number() {
        let json = r#"{"latest_block_height": 7, "latest_block_time": "2024-05-01T12:00:00Z"}"#;
        let sync: SyncInfo = serde_json::from_str(json).unwrap();
        assert_eq!(sync.latest_block_height, 7);
    }

    #[test]
    fn test_height_rejects_garbage() {
        let json = r#"{"latest_block_height": "tall", "latest_block_time": "2024-05-01T12:00:00Z"}"#;
        assert!(serde_json::from_str::<SyncInfo>(json).is_err());
    }

    #[test]
    fn test_broadcast_result_to_tx_response() {
        let json = r#"{"code": 0, "data": "", "log": "[]", "codespace": "", "hash": "0A1B"}"#;
        let result: BroadcastTxResult = serde_json::from_str(json).unwrap();
        let response = crate::shared::TxResponse::from(result);
        assert_eq!(response.txhash, "0A1B");
        assert!(response.is_success());
        assert!(!response.is_synthetic());
        assert_eq!(response.raw_log, "[]");
    }

    #[test]
    fn test_request_serialize() {
        let request = JsonRpcRequest::new(1, "status", NoParams {});
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "status");
        assert_eq!(json["params"], serde_json::json!({}));
    }
}
