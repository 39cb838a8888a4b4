//! dYdX chain interaction module.
//!
//! This module provides the session client, the CLOB order messages, the
//! Cosmos transaction envelope, and the x/auth account query.

pub mod accounts;
pub mod builder;
pub mod client;
pub mod constants;
pub mod error;
pub mod orders;
pub mod tx;
pub mod types;

// Re-export commonly used items
pub use accounts::{query_account, AccountInfo, BaseAccount};
pub use builder::OrderBuilder;
pub use client::{generate_client_id, DydxClient, DydxClientBuilder, OrderPlacement};
pub use constants::*;
pub use error::{SdkError, SdkResult};
pub use orders::{MsgPlaceOrder, Order, OrderId, SubaccountId};
pub use tx::{Any, SignedTx, TxFactory, UnsignedTx};
pub use types::*;
