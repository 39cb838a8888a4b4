//! JSON-RPC client tests against a local canned HTTP responder.
//!
//! Each test starts a one-shot server on 127.0.0.1 that records the request
//! body and answers with a fixed JSON document, so no node is needed.

use base64::Engine;
use dydx_client::rpc::{RpcClient, RpcError};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ============================================================================
// Test Helpers
// ============================================================================

/// Serve one request with `status_line` and `body`; yields the request body.
async fn serve_once(status_line: &'static str, body: String) -> (String, oneshot::Receiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request_body = read_request_body(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let _ = tx.send(serde_json::from_slice(&request_body).unwrap_or(Value::Null));
    });

    (format!("http://{}", addr), rx)
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return Vec::new();
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = find(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            let body_start = header_end + 4;
            while buf.len() < body_start + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return buf[body_start..].to_vec();
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ============================================================================
// status
// ============================================================================

#[tokio::test]
async fn test_status_parses_node_info() {
    let body = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "node_info": {
                "network": "dydxprotocol-single",
                "moniker": "alice",
                "version": "0.38.6"
            },
            "sync_info": {
                "latest_block_height": "4242",
                "latest_block_time": "2024-05-01T12:00:00.123456789Z",
                "catching_up": false
            }
        }
    }"#;
    let (url, request) = serve_once("200 OK", body.to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let status = client.status().await.unwrap();

    assert_eq!(status.chain_id, "dydxprotocol-single");
    assert_eq!(status.latest_block_height, 4242);
    assert!(!status.catching_up);

    let request = request.await.unwrap();
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "status");
}

#[tokio::test]
async fn test_status_missing_result() {
    let (url, _request) = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1}"#.to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let err = client.status().await.unwrap_err();
    assert!(matches!(err, RpcError::MissingResult(ref m) if m == "status"));
}

// ============================================================================
// broadcast_tx_sync
// ============================================================================

#[tokio::test]
async fn test_broadcast_sends_base64_and_maps_result() {
    let body = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "code": 0,
            "data": "",
            "log": "[]",
            "codespace": "",
            "hash": "0A1B2C3D"
        }
    }"#;
    let (url, request) = serve_once("200 OK", body.to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let tx_bytes = vec![0x0a, 0x02, 0x08, 0x01];
    let response = client.broadcast_tx_sync(&tx_bytes).await.unwrap();

    assert!(response.is_success());
    assert!(!response.is_synthetic());
    assert_eq!(response.txhash, "0A1B2C3D");

    let request = request.await.unwrap();
    assert_eq!(request["method"], "broadcast_tx_sync");
    let sent = request["params"]["tx"].as_str().unwrap();
    assert_eq!(
        base64::engine::general_purpose::STANDARD.decode(sent).unwrap(),
        tx_bytes
    );
}

#[tokio::test]
async fn test_broadcast_reports_check_tx_rejection() {
    let body = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "code": 32,
            "data": "",
            "log": "account sequence mismatch, expected 4, got 3",
            "codespace": "sdk",
            "hash": "FFEE"
        }
    }"#;
    let (url, _request) = serve_once("200 OK", body.to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let response = client.broadcast_tx_sync(&[1, 2, 3]).await.unwrap();

    assert!(!response.is_success());
    assert_eq!(response.code, 32);
    assert_eq!(response.codespace, "sdk");
    assert!(response.raw_log.contains("sequence mismatch"));
}

#[tokio::test]
async fn test_json_rpc_error_object() {
    let body = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "error": {
            "code": -32603,
            "message": "Internal error",
            "data": "tx already exists in cache"
        }
    }"#;
    let (url, _request) = serve_once("500 Internal Server Error", body.to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let err = client.broadcast_tx_sync(&[1]).await.unwrap_err();

    match err {
        RpcError::JsonRpc { code, message, data } => {
            assert_eq!(code, -32603);
            assert_eq!(message, "Internal error");
            assert_eq!(data.as_deref(), Some("tx already exists in cache"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_http_status() {
    let (url, _request) = serve_once("502 Bad Gateway", "upstream down".to_string()).await;

    let client = RpcClient::new(&url).unwrap();
    let err = client.status().await.unwrap_err();
    assert!(matches!(err, RpcError::UnexpectedStatus(502, ref body) if body == "upstream down"));
}
