//! Key management for dYdX accounts.
//!
//! Derives a secp256k1 signing key from a BIP-39 mnemonic and encodes the
//! resulting account address with an explicit bech32 prefix.
//!
//! # Derivation
//!
//! 1. Mnemonic phrase → 64-byte seed (empty passphrase)
//! 2. Seed → BIP-32 key at `m/44'/118'/0'/0/0`
//! 3. Compressed public key → `RIPEMD160(SHA256(pubkey))`
//! 4. 20-byte account ID → bech32 with the chain's prefix (`dydx`)

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use bip32::{DerivationPath, XPrv};
use bip39::Mnemonic;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use prost::Message;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::program::constants::{FULL_FUNDRAISER_PATH, SECP256K1_PUBKEY_TYPE_URL};
use crate::program::error::{SdkError, SdkResult};
use crate::program::tx::{Any, PubKey};

/// Length of a Cosmos account ID.
pub const ACCOUNT_ID_LEN: usize = 20;

// ============================================================================
// Address codec
// ============================================================================

/// Bech32 address encoding for one chain prefix.
///
/// Passed explicitly to everything that encodes or checks addresses, so
/// sessions for different chains can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCodec {
    hrp: Hrp,
}

impl AddressCodec {
    /// Create a codec for the given human-readable prefix.
    pub fn new(prefix: &str) -> SdkResult<Self> {
        let hrp = Hrp::parse(prefix)
            .map_err(|e| SdkError::InvalidAddress(format!("invalid prefix '{}': {}", prefix, e)))?;
        Ok(Self { hrp })
    }

    /// The bech32 prefix.
    pub fn prefix(&self) -> &str {
        self.hrp.as_str()
    }

    /// Encode raw account bytes.
    pub fn encode(&self, account_id: &[u8]) -> SdkResult<String> {
        bech32::encode::<Bech32>(self.hrp, account_id)
            .map_err(|e| SdkError::InvalidAddress(e.to_string()))
    }

    /// Decode an address, checking the prefix and account ID length.
    pub fn decode(&self, address: &str) -> SdkResult<Vec<u8>> {
        let (hrp, data) =
            bech32::decode(address).map_err(|e| SdkError::InvalidAddress(format!("{}: {}", address, e)))?;

        if hrp != self.hrp {
            return Err(SdkError::InvalidAddress(format!(
                "expected prefix '{}', got '{}'",
                self.prefix(),
                hrp
            )));
        }
        if data.len() != ACCOUNT_ID_LEN {
            return Err(SdkError::InvalidAddress(format!(
                "expected {} byte account ID, got {}",
                ACCOUNT_ID_LEN,
                data.len()
            )));
        }

        Ok(data)
    }

    /// Check that `address` is a well-formed address for this prefix.
    pub fn validate(&self, address: &str) -> SdkResult<()> {
        self.decode(address).map(|_| ())
    }
}

/// Cosmos account ID of a compressed secp256k1 public key.
pub fn account_id(public_key: &[u8]) -> [u8; ACCOUNT_ID_LEN] {
    let sha = Sha256::digest(public_key);
    let mut id = [0u8; ACCOUNT_ID_LEN];
    id.copy_from_slice(&Ripemd160::digest(sha));
    id
}

// ============================================================================
// Wallet
// ============================================================================

/// A secp256k1 key pair derived from a mnemonic, with its encoded address.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    public_key: [u8; 33],
    address: String,
}

impl Wallet {
    /// Derive the first account (`m/44'/118'/0'/0/0`) from a mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidMnemonic`] if the phrase fails BIP-39
    /// validation (word list or checksum).
    pub fn from_mnemonic(phrase: &str, codec: &AddressCodec) -> SdkResult<Self> {
        Self::from_mnemonic_with_path(phrase, FULL_FUNDRAISER_PATH, codec)
    }

    /// Derive a key at an explicit BIP-32 path.
    pub fn from_mnemonic_with_path(phrase: &str, path: &str, codec: &AddressCodec) -> SdkResult<Self> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let mnemonic = Mnemonic::parse_normalized(&normalized)
            .map_err(|e| SdkError::InvalidMnemonic(e.to_string()))?;
        let seed = mnemonic.to_seed_normalized("");

        let path = DerivationPath::from_str(path)
            .map_err(|e| SdkError::KeyDerivation(format!("invalid path '{}': {}", path, e)))?;
        let xprv = XPrv::derive_from_path(seed, &path)
            .map_err(|e| SdkError::KeyDerivation(e.to_string()))?;

        Self::from_signing_key(xprv.private_key().clone(), codec)
    }

    /// Wrap an existing signing key.
    pub fn from_signing_key(signing_key: SigningKey, codec: &AddressCodec) -> SdkResult<Self> {
        let point = signing_key.verifying_key().to_encoded_point(true);
        let public_key: [u8; 33] = point
            .as_bytes()
            .try_into()
            .map_err(|_| SdkError::KeyDerivation("unexpected public key length".to_string()))?;
        let address = codec.encode(&account_id(&public_key))?;

        Ok(Self {
            signing_key,
            public_key,
            address,
        })
    }

    /// Bech32 account address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Compressed SEC1 public key.
    pub fn public_key_bytes(&self) -> &[u8; 33] {
        &self.public_key
    }

    /// Public key as the `Any` carried in a transaction's signer info.
    pub fn public_key_any(&self) -> Any {
        Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: PubKey {
                key: self.public_key.to_vec(),
            }
            .encode_to_vec(),
        }
    }

    /// Sign `message` (hashed with SHA-256) and return the 64-byte `r || s`.
    ///
    /// Signatures are low-S normalized, as Cosmos SDK requires.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}
