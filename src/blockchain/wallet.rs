//! Account keys, addresses and amino signing.
//!
//! # Security
//! - Key material is loaded ONLY from environment variables (or passed in directly)
//! - Keys and mnemonics are never logged or serialized
//!
//! An account secret is either a BIP-39 mnemonic, derived on Secret's
//! coin type (`m/44'/529'/0'/0/0`), or a hex secp256k1 private key. The
//! bech32 address is always derived from the key.

use alloy::primitives::B256;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::signers::Signer;
use bech32::{ToBase32, Variant};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::AccountConfig;

/// Default environment variable name for the account secret.
pub const PRIVATE_KEY_ENV_VAR: &str = "SECRET_BOX_PRIVATE_KEY";

/// Human-readable prefix of Secret Network account addresses.
pub const ADDRESS_PREFIX: &str = "secret";

/// HD path Secret Network wallets derive their first account on.
pub const DERIVATION_PATH: &str = "m/44'/529'/0'/0/0";

/// A secp256k1 account key paired with the address derived from it.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Bech32 account address (e.g., "secret1...").
    address: String,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Self::from_signer(signer)
    }

    /// Create a wallet from a BIP-39 mnemonic phrase.
    pub fn from_mnemonic(phrase: &str) -> BlockchainResult<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.split_whitespace().collect::<Vec<_>>().join(" "))
            .derivation_path(DERIVATION_PATH)
            .and_then(|builder| builder.build())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid mnemonic: {}", e)))?;

        Self::from_signer(signer)
    }

    /// Create a wallet from either a mnemonic or a hex private key.
    ///
    /// Anything containing whitespace is read as a mnemonic.
    pub fn from_secret(secret: &str) -> BlockchainResult<Self> {
        let secret = secret.trim();
        if secret.contains(char::is_whitespace) {
            Self::from_mnemonic(secret)
        } else {
            Self::from_private_key(secret)
        }
    }

    /// Load a wallet whose secret is stored in the environment variable `var`.
    pub fn from_env(var: &str) -> BlockchainResult<Self> {
        let secret = std::env::var(var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_secret(&secret)
    }

    /// Load the wallet for a configured account.
    ///
    /// A configured address must match the one derived from the key.
    pub fn from_account(account: &AccountConfig) -> BlockchainResult<Self> {
        let wallet = Self::from_env(&account.key_env)?;
        wallet.check_address(account.address.as_deref())?;
        Ok(wallet)
    }

    fn from_signer(signer: PrivateKeySigner) -> BlockchainResult<Self> {
        let public_key = signer.credential().verifying_key().to_encoded_point(true);
        let address = derive_address(public_key.as_bytes())?;
        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Fail if `expected` names a different account than this key.
    pub fn check_address(&self, expected: Option<&str>) -> BlockchainResult<()> {
        match expected {
            Some(expected) if expected.trim() != self.address => Err(BlockchainError::Wallet(format!(
                "Configured address {} does not match key address {}",
                expected.trim(),
                self.address
            ))),
            _ => Ok(()),
        }
    }

    /// Get the account address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Compressed (33-byte) secp256k1 public key.
    pub fn public_key(&self) -> Vec<u8> {
        self.signer
            .credential()
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Sign an amino sign doc.
    ///
    /// The document is hashed with SHA-256 and the digest signed; the result
    /// is the 64-byte `r || s` form Cosmos chains expect.
    pub async fn sign_amino(&self, sign_doc: &[u8]) -> BlockchainResult<[u8; 64]> {
        let digest = B256::from_slice(Sha256::digest(sign_doc).as_slice());
        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

        let bytes = signature.as_bytes();
        let mut compact = [0u8; 64];
        compact.copy_from_slice(&bytes[..64]);
        Ok(compact)
    }
}

/// Bech32 `secret1...` address of a compressed secp256k1 public key:
/// `ripemd160(sha256(pubkey))`.
pub fn derive_address(compressed_public_key: &[u8]) -> BlockchainResult<String> {
    let hash = Ripemd160::digest(Sha256::digest(compressed_public_key));
    bech32::encode(ADDRESS_PREFIX, hash.to_base32(), Variant::Bech32)
        .map_err(|e| BlockchainError::Wallet(format!("Address encoding failed: {}", e)))
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
