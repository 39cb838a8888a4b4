//! Network constants for a single-node dYdX v4 deployment.

/// Default CometBFT RPC endpoint.
pub const DEFAULT_NODE_URL: &str = "tcp://localhost:26657";

/// Default Cosmos gRPC endpoint.
pub const DEFAULT_GRPC_URL: &str = "localhost:9090";

/// Chain ID of the single-node deployment.
pub const DEFAULT_CHAIN_ID: &str = "dydxprotocol-single";

/// Bech32 human-readable prefix for account addresses.
pub const DEFAULT_ADDRESS_PREFIX: &str = "dydx";

/// Normalize an endpoint into an `http://` URL.
///
/// CometBFT advertises its listener as `tcp://host:port` and gRPC endpoints
/// are usually written as bare `host:port`; both are rewritten to `http://`.
/// URLs that already carry an `http`/`https` scheme are returned unchanged.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else if let Some(rest) = endpoint.strip_prefix("tcp://") {
        format!("http://{}", rest)
    } else {
        format!("http://{}", endpoint)
    }
}
