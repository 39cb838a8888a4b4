//! Runtime configuration for the validation client.
//!
//! Settings come from an optional TOML file (path in `DYDX_CONFIG`, default
//! `config.toml`) with a few environment overrides. The mnemonic is a
//! secret: it is read only from `DYDX_MNEMONIC` and never from the file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::network::{DEFAULT_ADDRESS_PREFIX, DEFAULT_CHAIN_ID};
use crate::program::constants::{
    DEFAULT_CLOB_PAIR_ID, DEFAULT_EXPIRY_BLOCKS, DEFAULT_GAS_ADJUSTMENT, DEFAULT_GAS_LIMIT,
};
use crate::program::types::{OrderSide, SubmissionMode};

/// Environment variable holding the mnemonic.
pub const MNEMONIC_ENV: &str = "DYDX_MNEMONIC";
/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "DYDX_CONFIG";
/// Config file used when `DYDX_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("{0} is not set")]
    MissingSecret(&'static str),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub node: NodeConfig,
    pub tx: TxConfig,
    pub order: OrderConfig,
    pub submission: SubmissionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub rpc_url: String,
    pub grpc_url: String,
    pub chain_id: String,
    pub address_prefix: String,
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:26657".into(),
            grpc_url: "http://localhost:9090".into(),
            chain_id: DEFAULT_CHAIN_ID.into(),
            address_prefix: DEFAULT_ADDRESS_PREFIX.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    /// Gas limit written into every envelope
    pub gas_limit: u64,
    /// Multiplier for simulated gas estimates. There is no simulation step,
    /// so this does not change the envelope; see `TxFactory::adjusted_gas`.
    pub gas_adjustment: f64,
    pub memo: String,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
            memo: String::new(),
        }
    }
}

/// The test order placed by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub clob_pair_id: u32,
    /// Size in base units (BTC)
    pub size: f64,
    pub step_size: f64,
    /// Price in quote units (USD)
    pub price: f64,
    pub tick_size: f64,
    /// Blocks from the current height until expiry
    pub expiry_blocks: u32,
    pub side: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            clob_pair_id: DEFAULT_CLOB_PAIR_ID,
            size: 0.001,
            step_size: 0.00001,
            price: 30000.0,
            tick_size: 0.01,
            expiry_blocks: DEFAULT_EXPIRY_BLOCKS,
            side: "buy".into(),
        }
    }
}

impl OrderConfig {
    pub fn order_side(&self) -> ConfigResult<OrderSide> {
        self.side
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("order.side '{}' is not buy or sell", self.side)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub mode: SubmissionMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    ///
    /// Does nothing if a global subscriber is already installed.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                let _ = fmt().json().with_env_filter(filter).try_init();
            }
            _ => {
                let _ = fmt().with_env_filter(filter).try_init();
            }
        }
    }
}

impl Config {
    /// Load from `path`, then apply environment overrides and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `DYDX_CONFIG` (or `config.toml`); a missing file means defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if Path::new(&path).exists() {
            Self::load(&path)
        } else {
            let mut config = Self::default();
            config.apply_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parse TOML, apply environment overrides, and validate.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override endpoints and chain ID from `DYDX_RPC_URL`, `DYDX_GRPC_URL`,
    /// and `DYDX_CHAIN_ID`.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DYDX_RPC_URL") {
            self.node.rpc_url = url;
        }
        if let Ok(url) = std::env::var("DYDX_GRPC_URL") {
            self.node.grpc_url = url;
        }
        if let Ok(chain_id) = std::env::var("DYDX_CHAIN_ID") {
            self.node.chain_id = chain_id;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.node.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("node.rpc_url cannot be empty".into()));
        }
        if self.node.grpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("node.grpc_url cannot be empty".into()));
        }
        if self.node.chain_id.trim().is_empty() {
            return Err(ConfigError::Invalid("node.chain_id cannot be empty".into()));
        }
        if self.node.address_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("node.address_prefix cannot be empty".into()));
        }
        if self.tx.gas_limit == 0 {
            return Err(ConfigError::Invalid("tx.gas_limit must be positive".into()));
        }
        if self.tx.gas_adjustment < 1.0 {
            return Err(ConfigError::Invalid("tx.gas_adjustment must be at least 1.0".into()));
        }
        if self.order.tick_size <= 0.0 || self.order.step_size <= 0.0 {
            return Err(ConfigError::Invalid("order tick_size and step_size must be positive".into()));
        }
        if self.order.expiry_blocks == 0 {
            return Err(ConfigError::Invalid("order.expiry_blocks must be at least 1".into()));
        }
        self.order.order_side()?;
        Ok(())
    }
}

/// Read the mnemonic from `DYDX_MNEMONIC`.
pub fn mnemonic_from_env() -> ConfigResult<String> {
    match std::env::var(MNEMONIC_ENV) {
        Ok(phrase) if !phrase.trim().is_empty() => Ok(phrase),
        _ => Err(ConfigError::MissingSecret(MNEMONIC_ENV)),
    }
}
