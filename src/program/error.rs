//! Error types for the dYdX chain interaction module.

use thiserror::Error;

/// SDK-specific errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// CometBFT RPC error
    #[error("RPC error: {0}")]
    Rpc(#[from] crate::rpc::RpcError),

    /// gRPC transport could not be established
    #[error("Transport error: {0}")]
    Transport(String),

    /// gRPC call returned a non-OK status
    #[error("gRPC error: {0}")]
    Grpc(String),

    /// Endpoint could not be parsed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Mnemonic phrase failed BIP-39 validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// BIP-32 derivation failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Bech32 address could not be encoded or decoded
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account decoded with an unsupported type URL
    #[error("Unexpected account type: {0}")]
    UnexpectedAccountType(String),

    /// Protobuf decode error
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Order message failed structural validation
    #[error("Invalid order message: {0}")]
    InvalidOrder(String),

    /// Transaction envelope failed validation
    #[error("Transaction validation failed: {0}")]
    InvalidTransaction(String),

    /// Invalid side value
    #[error("Invalid side value: {0} (must be 1 or 2)")]
    InvalidSide(i32),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// OS random source failed
    #[error("Failed to generate client ID: {0}")]
    Randomness(String),

    /// Session has no account info yet
    #[error("Account info not loaded; call update_account_info first")]
    AccountNotSynced,
}

impl From<tonic::transport::Error> for SdkError {
    fn from(err: tonic::transport::Error) -> Self {
        SdkError::Transport(err.to_string())
    }
}

impl From<tonic::Status> for SdkError {
    fn from(status: tonic::Status) -> Self {
        SdkError::Grpc(format!("{:?}: {}", status.code(), status.message()))
    }
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
