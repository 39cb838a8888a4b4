//! CometBFT JSON-RPC client module.
//!
//! This module provides the "streaming" half of the node connection: a
//! JSON-RPC client for node status and transaction broadcast. Account
//! queries go over gRPC (see [`crate::program::accounts`]).
//!
//! # Error Handling
//!
//! All methods return `RpcResult<T>` which is an alias for `Result<T, RpcError>`.
//!
//! ```rust,ignore
//! use dydx_client::rpc::{RpcClient, RpcError};
//!
//! match client.broadcast_tx_sync(&tx_bytes).await {
//!     Ok(response) if response.is_success() => println!("Accepted: {}", response.txhash),
//!     Ok(response) => println!("Rejected with code {}: {}", response.code, response.raw_log),
//!     Err(RpcError::JsonRpc { code, message, .. }) => println!("Node error {}: {}", code, message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{RpcClient, RpcClientBuilder};
pub use error::{RpcError, RpcResult};
pub use types::*;
