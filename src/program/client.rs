//! Async session client for a dYdX v4 node.
//!
//! [`DydxClient`] bundles the key pair, the address codec, and both
//! transports (CometBFT JSON-RPC and gRPC) with the account state needed to
//! build order transactions.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::RngCore;
use tonic::transport::{Channel, Endpoint};

use crate::network::{
    normalize_endpoint, DEFAULT_ADDRESS_PREFIX, DEFAULT_CHAIN_ID, DEFAULT_GRPC_URL,
    DEFAULT_NODE_URL,
};
use crate::program::accounts::{query_account, AccountInfo};
use crate::program::error::{SdkError, SdkResult};
use crate::program::orders::{MsgPlaceOrder, Order};
use crate::program::tx::{SignedTx, TxFactory, UnsignedTx};
use crate::program::types::{OrderParams, SubmissionMode};
use crate::rpc::{NodeStatus, RpcClient};
use crate::shared::TxResponse;
use crate::wallet::{AddressCodec, Wallet};

/// Default timeout for both transports.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for [`DydxClient`].
#[derive(Debug, Clone)]
pub struct DydxClientBuilder {
    rpc_url: String,
    grpc_url: String,
    address_prefix: String,
    timeout: Duration,
    tx_factory: TxFactory,
    mode: SubmissionMode,
}

impl Default for DydxClientBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_URL, DEFAULT_GRPC_URL)
    }
}

impl DydxClientBuilder {
    /// Create a builder for the given RPC and gRPC endpoints.
    pub fn new(rpc_url: impl Into<String>, grpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            grpc_url: grpc_url.into(),
            address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tx_factory: TxFactory::new(DEFAULT_CHAIN_ID),
            mode: SubmissionMode::default(),
        }
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.tx_factory.chain_id = chain_id.into();
        self
    }

    /// Set the bech32 account prefix.
    pub fn address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.address_prefix = prefix.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.tx_factory.gas_limit = gas_limit;
        self
    }

    pub fn gas_adjustment(mut self, gas_adjustment: f64) -> Self {
        self.tx_factory.gas_adjustment = gas_adjustment;
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.tx_factory.memo = memo.into();
        self
    }

    /// Choose whether `place_order` only validates or signs and broadcasts.
    pub fn submission_mode(mut self, mode: SubmissionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Derive the key pair and open both transports.
    ///
    /// # Errors
    ///
    /// Fails on a malformed mnemonic, an invalid prefix or endpoint, or if
    /// the gRPC connection cannot be established. Nothing is retried.
    pub async fn connect(self, mnemonic: &str) -> SdkResult<DydxClient> {
        let (codec, wallet, rpc_client, endpoint) = self.prepare(mnemonic)?;
        let channel = endpoint.connect().await?;
        Ok(self.finish(codec, wallet, rpc_client, channel))
    }

    /// Like [`connect`](Self::connect), but the gRPC connection is made on
    /// the first account query instead of here.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn connect_lazy(self, mnemonic: &str) -> SdkResult<DydxClient> {
        let (codec, wallet, rpc_client, endpoint) = self.prepare(mnemonic)?;
        let channel = endpoint.connect_lazy();
        Ok(self.finish(codec, wallet, rpc_client, channel))
    }

    fn prepare(&self, mnemonic: &str) -> SdkResult<(AddressCodec, Wallet, RpcClient, Endpoint)> {
        let codec = AddressCodec::new(&self.address_prefix)?;
        let wallet = Wallet::from_mnemonic(mnemonic, &codec)?;

        let rpc_client = RpcClient::builder(&self.rpc_url)
            .timeout(self.timeout)
            .build()?;

        let grpc_url = normalize_endpoint(&self.grpc_url);
        let endpoint = Endpoint::from_shared(grpc_url.clone())
            .map_err(|e| SdkError::InvalidEndpoint(format!("{}: {}", grpc_url, e)))?
            .connect_timeout(self.timeout)
            .timeout(self.timeout);

        Ok((codec, wallet, rpc_client, endpoint))
    }

    fn finish(self, codec: AddressCodec, wallet: Wallet, rpc_client: RpcClient, channel: Channel) -> DydxClient {
        tracing::info!(
            address = wallet.address(),
            rpc = rpc_client.base_url(),
            grpc = %normalize_endpoint(&self.grpc_url),
            chain_id = %self.tx_factory.chain_id,
            "Client connected"
        );

        DydxClient {
            rpc_client,
            channel,
            wallet,
            codec,
            tx_factory: self.tx_factory,
            mode: self.mode,
            account: None,
        }
    }
}

/// Outcome of [`DydxClient::place_order`].
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    /// Client-assigned order ID
    pub client_id: u32,
    /// The built transaction envelope
    pub envelope: UnsignedTx,
    /// Node response, or a synthetic one in validate mode
    pub response: TxResponse,
    /// Whether the transaction was signed and broadcast
    pub broadcast: bool,
}

/// Session client for one account on one dYdX node.
///
/// Sockets are released when the client is dropped, on every exit path.
#[derive(Debug)]
pub struct DydxClient {
    rpc_client: RpcClient,
    channel: Channel,
    wallet: Wallet,
    codec: AddressCodec,
    tx_factory: TxFactory,
    mode: SubmissionMode,
    account: Option<AccountInfo>,
}

impl DydxClient {
    /// Create a new client builder.
    pub fn builder(rpc_url: impl Into<String>, grpc_url: impl Into<String>) -> DydxClientBuilder {
        DydxClientBuilder::new(rpc_url, grpc_url)
    }

    /// Connect with default chain settings.
    pub async fn connect(rpc_url: &str, grpc_url: &str, mnemonic: &str) -> SdkResult<Self> {
        DydxClientBuilder::new(rpc_url, grpc_url).connect(mnemonic).await
    }

    /// Bech32 address of the session's account.
    pub fn address(&self) -> &str {
        self.wallet.address()
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    pub fn chain_id(&self) -> &str {
        &self.tx_factory.chain_id
    }

    pub fn tx_factory(&self) -> &TxFactory {
        &self.tx_factory
    }

    pub fn submission_mode(&self) -> SubmissionMode {
        self.mode
    }

    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Last account number and sequence fetched from the node.
    pub fn account_info(&self) -> Option<AccountInfo> {
        self.account
    }

    // ========================================================================
    // Node queries
    // ========================================================================

    /// Query node identity and latest block.
    pub async fn status(&self) -> SdkResult<NodeStatus> {
        Ok(self.rpc_client.status().await?)
    }

    /// Refresh account number and sequence from the node.
    ///
    /// The sequence is never incremented locally; every call re-fetches it.
    pub async fn update_account_info(&mut self) -> SdkResult<AccountInfo> {
        let account = query_account(&self.channel, self.wallet.address()).await?;
        let info = AccountInfo::from(&account);

        tracing::info!(
            address = self.wallet.address(),
            account_number = info.account_number,
            sequence = info.sequence,
            "Account info updated"
        );

        self.account = Some(info);
        Ok(info)
    }

    /// Use account state obtained elsewhere instead of querying the node.
    pub fn set_account_info(&mut self, info: AccountInfo) {
        self.account = Some(info);
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Build and validate the unsigned transaction for one short-term order.
    ///
    /// Uses the cached account info; call [`update_account_info`] first.
    ///
    /// [`update_account_info`]: DydxClient::update_account_info
    pub fn build_order(&self, params: &OrderParams, client_id: u32) -> SdkResult<UnsignedTx> {
        let account = self.account.ok_or(SdkError::AccountNotSynced)?;

        let msg = MsgPlaceOrder::new(Order::short_term(self.wallet.address(), client_id, params));
        msg.validate_basic(&self.codec)?;

        let tx = self.tx_factory.build(vec![msg.to_any()], &self.wallet, &account);
        tx.ensure_single_message(MsgPlaceOrder::TYPE_URL)?;

        Ok(tx)
    }

    /// Sign an envelope built by this session.
    pub fn sign(&self, tx: &UnsignedTx) -> SdkResult<SignedTx> {
        tx.sign(&self.wallet)
    }

    /// Place a short-term order.
    ///
    /// Refreshes account info from the node, then runs
    /// [`submit_order`](Self::submit_order).
    pub async fn place_order(&mut self, params: &OrderParams) -> SdkResult<OrderPlacement> {
        self.update_account_info().await?;
        self.submit_order(params).await
    }

    /// Build and submit a short-term order against the cached account info.
    ///
    /// Draws a random client ID, builds and validates the envelope. In
    /// [`SubmissionMode::Validate`] nothing is signed or sent and the
    /// response is synthetic ([`TxResponse::validation_complete`]). In
    /// [`SubmissionMode::Broadcast`] the envelope is signed and submitted
    /// with `broadcast_tx_sync`; a non-zero response code is returned, not
    /// raised.
    pub async fn submit_order(&self, params: &OrderParams) -> SdkResult<OrderPlacement> {
        let client_id = generate_client_id()?;
        let envelope = self.build_order(params, client_id)?;

        tracing::info!(
            client_id,
            clob_pair_id = params.clob_pair_id,
            side = %params.side,
            quantums = params.quantums,
            subticks = params.subticks,
            good_til_block = params.good_til_block,
            "Order envelope built"
        );

        match self.mode {
            SubmissionMode::Validate => {
                tracing::warn!(client_id, "Transaction not signed; reporting synthetic result");
                Ok(OrderPlacement {
                    client_id,
                    envelope,
                    response: TxResponse::validation_complete(),
                    broadcast: false,
                })
            }
            SubmissionMode::Broadcast => {
                let signed = self.sign(&envelope)?;
                let hash = signed.hash();
                tracing::info!(%hash, "Broadcasting transaction");

                let mut response = self.rpc_client.broadcast_tx_sync(&signed.to_bytes()).await?;
                if response.txhash.is_empty() {
                    response.txhash = hash;
                }
                if !response.is_success() {
                    tracing::warn!(code = response.code, log = %response.raw_log, "Transaction rejected");
                }

                Ok(OrderPlacement {
                    client_id,
                    envelope,
                    response,
                    broadcast: true,
                })
            }
        }
    }

    /// Consume the session. Both transports are released when `self` is
    /// dropped at the end of this call.
    pub fn close(self) {
        tracing::debug!(address = self.wallet.address(), "Closing client");
    }
}

/// Random 32-bit client order ID from the OS CSPRNG.
///
/// Uniqueness against earlier orders is not checked.
pub fn generate_client_id() -> SdkResult<u32> {
    let mut bytes = [0u8; 4];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SdkError::Randomness(e.to_string()))?;
    Ok(u32::from_be_bytes(bytes))
}
