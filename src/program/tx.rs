//! Cosmos SDK transaction envelope.
//!
//! Protobuf types of `cosmos.tx.v1beta1` plus [`TxFactory`], which turns
//! messages and account state into an [`UnsignedTx`]. Signing is a
//! separate, explicit step ([`UnsignedTx::sign`]).

use prost::Message;
use sha2::{Digest, Sha256};

use crate::program::accounts::AccountInfo;
use crate::program::constants::{DEFAULT_GAS_ADJUSTMENT, DEFAULT_GAS_LIMIT};
use crate::program::error::{SdkError, SdkResult};
use crate::wallet::Wallet;

// ============================================================================
// Wire types
// ============================================================================

/// `google.protobuf.Any`
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// `cosmos.crypto.secp256k1.PubKey`
#[derive(Clone, PartialEq, Eq, Message)]
pub struct PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// `cosmos.base.v1beta1.Coin`
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
    #[prost(oneof = "mode_info::Sum", tags = "1")]
    pub sum: Option<mode_info::Sum>,
}

pub mod mode_info {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Single {
        #[prost(enumeration = "super::SignMode", tag = "1")]
        pub mode: i32,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Sum {
        #[prost(message, tag = "1")]
        Single(Single),
    }
}

impl ModeInfo {
    /// Single signer, `SIGN_MODE_DIRECT`.
    pub fn direct() -> Self {
        Self {
            sum: Some(mode_info::Sum::Single(mode_info::Single {
                mode: SignMode::Direct as i32,
            })),
        }
    }
}

/// `cosmos.tx.signing.v1beta1.SignMode` (subset)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SignMode {
    Unspecified = 0,
    Direct = 1,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// Bytes covered by a `SIGN_MODE_DIRECT` signature.
#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

/// Broadcastable transaction encoding.
#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

// ============================================================================
// Factory
// ============================================================================

/// Chain and fee settings applied to every transaction a session builds.
#[derive(Debug, Clone, PartialEq)]
pub struct TxFactory {
    pub chain_id: String,
    pub gas_limit: u64,
    /// Applied only by [`TxFactory::adjusted_gas`]; `build` always uses `gas_limit`.
    pub gas_adjustment: f64,
    pub memo: String,
}

impl TxFactory {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
            memo: String::new(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_gas_adjustment(mut self, gas_adjustment: f64) -> Self {
        self.gas_adjustment = gas_adjustment;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Scale a gas estimate by the gas adjustment, rounding up.
    ///
    /// Only used when a gas estimate is available; the fixed `gas_limit`
    /// goes into the envelope otherwise.
    pub fn adjusted_gas(&self, estimate: u64) -> u64 {
        (estimate as f64 * self.gas_adjustment).ceil() as u64
    }

    /// Build an unsigned transaction carrying `messages`.
    ///
    /// The fee is zero (dYdX order messages are gasless) and the signer
    /// info carries the wallet's public key and the account's sequence.
    pub fn build(&self, messages: Vec<Any>, wallet: &Wallet, account: &AccountInfo) -> UnsignedTx {
        let body = TxBody {
            messages,
            memo: self.memo.clone(),
            timeout_height: 0,
        };

        let auth_info = AuthInfo {
            signer_infos: vec![SignerInfo {
                public_key: Some(wallet.public_key_any()),
                mode_info: Some(ModeInfo::direct()),
                sequence: account.sequence,
            }],
            fee: Some(Fee {
                amount: Vec::new(),
                gas_limit: self.gas_limit,
                payer: String::new(),
                granter: String::new(),
            }),
        };

        UnsignedTx {
            body,
            auth_info,
            chain_id: self.chain_id.clone(),
            account_number: account.account_number,
        }
    }
}

// ============================================================================
// Envelopes
// ============================================================================

/// A transaction ready to be signed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTx {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    pub chain_id: String,
    pub account_number: u64,
}

impl UnsignedTx {
    pub fn messages(&self) -> &[Any] {
        &self.body.messages
    }

    /// Check that the envelope holds exactly one message of type `type_url`.
    pub fn ensure_single_message(&self, type_url: &str) -> SdkResult<&Any> {
        match self.body.messages.as_slice() {
            [msg] if msg.type_url == type_url => Ok(msg),
            [msg] => Err(SdkError::InvalidTransaction(format!(
                "expected message {}, got {}",
                type_url, msg.type_url
            ))),
            msgs => Err(SdkError::InvalidTransaction(format!(
                "expected exactly 1 message, got {}",
                msgs.len()
            ))),
        }
    }

    /// Sequence of the (single) signer.
    pub fn sequence(&self) -> u64 {
        self.auth_info
            .signer_infos
            .first()
            .map(|s| s.sequence)
            .unwrap_or_default()
    }

    pub fn gas_limit(&self) -> u64 {
        self.auth_info.fee.as_ref().map(|f| f.gas_limit).unwrap_or_default()
    }

    pub fn sign_doc(&self) -> SignDoc {
        SignDoc {
            body_bytes: self.body.encode_to_vec(),
            auth_info_bytes: self.auth_info.encode_to_vec(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        }
    }

    /// Encoded size of the envelope without signatures.
    pub fn encoded_len(&self) -> usize {
        self.body.encoded_len() + self.auth_info.encoded_len()
    }

    /// Sign with `SIGN_MODE_DIRECT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet's public key differs from the one
    /// recorded in the signer info.
    pub fn sign(&self, wallet: &Wallet) -> SdkResult<SignedTx> {
        let expected = wallet.public_key_any();
        let signer = self
            .auth_info
            .signer_infos
            .first()
            .ok_or_else(|| SdkError::InvalidTransaction("no signer info".to_string()))?;
        if signer.public_key.as_ref() != Some(&expected) {
            return Err(SdkError::InvalidTransaction(
                "wallet does not match the transaction signer".to_string(),
            ));
        }

        let sign_doc = self.sign_doc();
        let signature = wallet.sign(&sign_doc.encode_to_vec());

        Ok(SignedTx {
            raw: TxRaw {
                body_bytes: sign_doc.body_bytes,
                auth_info_bytes: sign_doc.auth_info_bytes,
                signatures: vec![signature],
            },
        })
    }
}

/// A signed transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTx {
    pub raw: TxRaw,
}

impl SignedTx {
    /// Protobuf-encoded `TxRaw`, as broadcast.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw.encode_to_vec()
    }

    /// Transaction hash: uppercase hex SHA-256 of the raw bytes.
    pub fn hash(&self) -> String {
        hex::encode_upper(Sha256::digest(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::AddressCodec;
    use k256::ecdsa::signature::Verifier;
    use k256::ecdsa::{Signature, VerifyingKey};

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                            abandon abandon abandon abandon abandon about";

    fn wallet() -> Wallet {
        Wallet::from_mnemonic(MNEMONIC, &AddressCodec::new("dydx").unwrap()).unwrap()
    }

    fn account() -> AccountInfo {
        AccountInfo {
            account_number: 7,
            sequence: 3,
        }
    }

    fn msg(type_url: &str) -> Any {
        Any {
            type_url: type_url.to_string(),
            value: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_factory_defaults() {
        let factory = TxFactory::new("dydxprotocol-single");
        assert_eq!(factory.gas_limit, 300_000);
        assert_eq!(factory.gas_adjustment, 1.2);
        assert_eq!(factory.adjusted_gas(100_000), 120_000);
    }

    #[test]
    fn test_gas_adjustment_does_not_change_envelope() {
        let plain = TxFactory::new("dydxprotocol-single").build(vec![msg("/a.B")], &wallet(), &account());
        let adjusted = TxFactory::new("dydxprotocol-single")
            .with_gas_adjustment(3.0)
            .build(vec![msg("/a.B")], &wallet(), &account());

        assert_eq!(adjusted.gas_limit(), 300_000);
        assert_eq!(adjusted.gas_limit(), plain.gas_limit());
        assert_eq!(adjusted.encoded_len(), plain.encoded_len());
    }

    #[test]
    fn test_build_fills_auth_info() {
        let factory = TxFactory::new("dydxprotocol-single").with_memo("validation");
        let tx = factory.build(vec![msg("/a.B")], &wallet(), &account());

        assert_eq!(tx.sequence(), 3);
        assert_eq!(tx.account_number, 7);
        assert_eq!(tx.gas_limit(), 300_000);
        assert_eq!(tx.body.memo, "validation");
        assert_eq!(tx.messages().len(), 1);
        assert!(tx.encoded_len() > 0);
    }

    #[test]
    fn test_ensure_single_message() {
        let factory = TxFactory::new("c");
        let w = wallet();

        let one = factory.build(vec![msg("/a.B")], &w, &account());
        assert!(one.ensure_single_message("/a.B").is_ok());
        assert!(one.ensure_single_message("/a.C").is_err());

        let none = factory.build(Vec::new(), &w, &account());
        assert!(matches!(
            none.ensure_single_message("/a.B"),
            Err(SdkError::InvalidTransaction(_))
        ));

        let two = factory.build(vec![msg("/a.B"), msg("/a.B")], &w, &account());
        assert!(two.ensure_single_message("/a.B").is_err());
    }

    #[test]
    fn test_sign_produces_verifiable_signature() {
        let w = wallet();
        let tx = TxFactory::new("dydxprotocol-single").build(vec![msg("/a.B")], &w, &account());
        let signed = tx.sign(&w).unwrap();

        assert_eq!(signed.raw.signatures.len(), 1);
        let signature = Signature::from_slice(&signed.raw.signatures[0]).unwrap();
        let verifying_key = VerifyingKey::from_sec1_bytes(w.public_key_bytes()).unwrap();
        verifying_key
            .verify(&tx.sign_doc().encode_to_vec(), &signature)
            .unwrap();

        let decoded = TxRaw::decode(signed.to_bytes().as_slice()).unwrap();
        assert_eq!(decoded, signed.raw);
    }

    #[test]
    fn test_sign_rejects_other_wallet() {
        let tx = TxFactory::new("c").build(vec![msg("/a.B")], &wallet(), &account());
        let other = Wallet::from_mnemonic_with_path(
            MNEMONIC,
            "m/44'/118'/0'/0/1",
            &AddressCodec::new("dydx").unwrap(),
        )
        .unwrap();
        assert!(tx.sign(&other).is_err());
    }

    #[test]
    fn test_hash_format() {
        let w = wallet();
        let signed = TxFactory::new("c")
            .build(vec![msg("/a.B")], &w, &account())
            .sign(&w)
            .unwrap();
        let hash = signed.hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_direct_mode_info() {
        match ModeInfo::direct().sum {
            Some(mode_info::Sum::Single(single)) => assert_eq!(single.mode, SignMode::Direct as i32),
            other => panic!("unexpected mode info {:?}", other),
        }
    }
}
