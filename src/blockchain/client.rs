//! Compute client seam.
//!
//! The contract facade talks to the chain only through [`ComputeClient`].
//! Implementations own message encryption, transaction signing and
//! broadcast; [`SigningProxyClient`](crate::blockchain::proxy::SigningProxyClient)
//! is the one this crate ships.

use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ExecuteRequest, QueryRequest, TxResponse};

/// Transport used by the contract facade.
///
/// Implementations own encryption, signing and broadcast. Callers get
/// back either the decrypted contract answer or an error, nothing is
/// retried here.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Address transactions are sent from.
    fn sender(&self) -> &str;

    /// Execute a contract message and wait for the acknowledgement.
    async fn execute_contract(&self, request: ExecuteRequest) -> BlockchainResult<TxResponse>;

    /// Run a read-only contract query and return the raw JSON answer.
    async fn query_contract(&self, request: QueryRequest) -> BlockchainResult<serde_json::Value>;
}
