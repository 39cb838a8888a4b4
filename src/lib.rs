//! # dYdX v4 Rust Client
//!
//! A thin client for validating order placement against a dYdX v4 node.
//!
//! ## Modules
//!
//! - [`program`]: Session client, order messages, transaction envelope, account queries
//! - [`rpc`]: CometBFT JSON-RPC client (node status, transaction broadcast)
//! - [`wallet`]: Mnemonic key derivation and bech32 addresses
//! - [`config`]: TOML + environment configuration
//!
//! Plus a shared module:
//! - [`shared`]: Unit conversion and transaction result types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dydx_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mnemonic = std::env::var("DYDX_MNEMONIC")?;
//!     let mut client = DydxClient::connect("tcp://localhost:26657", "localhost:9090", &mnemonic).await?;
//!
//!     let status = client.status().await?;
//!     let params = OrderParams::buy(
//!         0,
//!         size_to_quantums(0.001, 0.00001),
//!         price_to_subticks(30000.0, 0.01),
//!         OrderParams::expiry_from(status.latest_block_height, 200),
//!     );
//!
//!     // Validate mode by default: built and checked, not signed or broadcast.
//!     let placement = client.place_order(&params).await?;
//!     println!("{}", placement.response.txhash);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Chain interaction: session client, messages, and transactions.
pub mod program;

/// Shared utilities and types.
pub mod shared;

/// Default endpoints and endpoint normalization.
pub mod network;

/// CometBFT JSON-RPC client.
pub mod rpc;

/// Key derivation and address encoding.
pub mod wallet;

/// Runtime configuration.
pub mod config;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use dydx_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::program::{
        // Client
        DydxClient, DydxClientBuilder, OrderPlacement,
        // Account state
        AccountInfo,
        // Errors
        SdkError, SdkResult,
        // Orders
        MsgPlaceOrder, Order, OrderBuilder, OrderParams, OrderSide, SubmissionMode,
        // Transactions
        SignedTx, TxFactory, UnsignedTx,
    };

    pub use crate::rpc::{NodeStatus, RpcClient, RpcError, RpcResult};

    pub use crate::wallet::{AddressCodec, Wallet};

    pub use crate::network::{DEFAULT_CHAIN_ID, DEFAULT_GRPC_URL, DEFAULT_NODE_URL};

    pub use crate::shared::{price_to_subticks, size_to_quantums, TxResponse};
}
