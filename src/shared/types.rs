//! Shared type definitions for the dYdX client.
//!
//! This module contains types that are used by both the RPC and program modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// TxResponse (shared between program and RPC modules)
// ============================================================================

/// Transaction hash reported when an order is validated but not broadcast.
pub const VALIDATION_TX_HASH: &str = "validation-complete";

/// Outcome of submitting a transaction.
///
/// Produced either by [`RpcClient::broadcast_tx_sync`](crate::rpc::RpcClient::broadcast_tx_sync)
/// or synthetically by the unsigned validation path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TxResponse {
    /// Transaction hash (uppercase hex), or [`VALIDATION_TX_HASH`]
    pub txhash: String,
    /// ABCI result code (0 = success)
    pub code: u32,
    /// Codespace of a non-zero code
    #[serde(default)]
    pub codespace: String,
    /// Raw log emitted by CheckTx/DeliverTx
    #[serde(default)]
    pub raw_log: String,
    /// Block height the transaction was committed at (0 if not committed)
    #[serde(default)]
    pub height: i64,
    /// Gas requested
    #[serde(default)]
    pub gas_wanted: i64,
    /// Gas consumed
    #[serde(default)]
    pub gas_used: i64,
    /// Events emitted by the transaction
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TxResponse {
    /// Synthetic success result for an order that was built but not broadcast.
    pub fn validation_complete() -> Self {
        Self {
            txhash: VALIDATION_TX_HASH.to_string(),
            ..Default::default()
        }
    }

    /// Whether the node accepted the transaction.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Whether this is the synthetic result of the unsigned path.
    pub fn is_synthetic(&self) -> bool {
        self.txhash == VALIDATION_TX_HASH
    }
}

/// ABCI event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Event type
    #[serde(rename = "type")]
    pub kind: String,
    /// Key/value attributes
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

/// ABCI event attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_complete() {
        let response = TxResponse::validation_complete();
        assert_eq!(response.txhash, "validation-complete");
        assert!(response.is_success());
        assert!(response.is_synthetic());
        assert!(response.events.is_empty());
    }

    #[test]
    fn test_event_deserialize() {
        let json = r#"{"type": "message", "attributes": [{"key": "action", "value": "place_order"}]}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "message");
        assert_eq!(event.attributes[0].key, "action");
        assert_eq!(event.attributes[0].value, "place_order");
    }
}
