//! Constants for the dYdX v4 chain and its Cosmos SDK modules.
//!
//! This module contains protobuf type URLs, gRPC method paths, order flags,
//! and the transaction defaults used when building order transactions.

// ============================================================================
// Type URLs
// ============================================================================

/// `MsgPlaceOrder` type URL (x/clob).
pub const MSG_PLACE_ORDER_TYPE_URL: &str = "/dydxprotocol.clob.MsgPlaceOrder";

/// Secp256k1 public key type URL.
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// `BaseAccount` type URL (x/auth).
pub const BASE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.BaseAccount";

// ============================================================================
// gRPC paths
// ============================================================================

/// x/auth account query.
pub const ACCOUNT_QUERY_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

// ============================================================================
// Key derivation
// ============================================================================

/// BIP-44 path for the first Cosmos account (coin type 118).
pub const FULL_FUNDRAISER_PATH: &str = "m/44'/118'/0'/0/0";

// ============================================================================
// Orders
// ============================================================================

/// Order flags carried in the order ID.
pub mod order_flags {
    /// Short-term order (expires by block height)
    pub const SHORT_TERM: u32 = 0;
    /// Conditional order
    pub const CONDITIONAL: u32 = 32;
    /// Long-term order (expires by block time)
    pub const LONG_TERM: u32 = 64;
}

/// Highest valid sub-account number.
pub const MAX_SUBACCOUNT_NUMBER: u32 = 127;

/// Default market (BTC-USD).
pub const DEFAULT_CLOB_PAIR_ID: u32 = 0;

/// Default number of blocks a short-term order stays valid.
pub const DEFAULT_EXPIRY_BLOCKS: u32 = 200;

// ============================================================================
// Transactions
// ============================================================================

/// Default gas limit for order transactions.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Default gas adjustment applied to simulated gas estimates.
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.2;
