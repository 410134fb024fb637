//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing (e.g., "secret-4", "secretdev-1").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId(pub String);

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Proxy connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Proxy request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was rejected by the chain.
    #[error("Transaction rejected with code {code}: {log}")]
    Rejected { code: u32, log: String },

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },

    /// A response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client not configured for the requested operation.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A compute execute request as handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Address of the account sending the transaction.
    pub sender: String,
    pub contract_address: String,
    pub code_hash: String,
    /// Contract message, serialized as JSON.
    pub msg: serde_json::Value,
    pub gas_limit: u64,
}

/// A compute query request as handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub contract_address: String,
    pub code_hash: String,
    /// Contract query, serialized as JSON.
    pub query: serde_json::Value,
}

/// Acknowledgement of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    /// Transaction hash (hex).
    pub txhash: String,
    /// ABCI result code; zero means success.
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub gas_wanted: u64,
}

impl TxResponse {
    /// Whether the chain accepted the transaction.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Turn a non-zero result code into [`BlockchainError::Rejected`].
    pub fn into_result(self) -> BlockchainResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BlockchainError::Rejected {
                code: self.code,
                log: self.raw_log,
            })
        }
    }
}
