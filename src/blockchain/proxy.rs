//! HTTP client for a signing proxy in front of a Secret node.
//!
//! Secret contracts only accept encrypted messages, and execute needs a
//! signed transaction. This client does neither: it speaks plaintext JSON
//! to a proxy that holds the sender's key, encrypts for the contract's
//! code hash, signs, broadcasts and decrypts answers. No Secret node
//! serves these routes itself.
//!
//! # Protocol
//! ```text
//! GET  /cosmos/base/tendermint/v1beta1/node_info   node LCD route, passed through
//!      → { "default_node_info": { "network": "<chain id>" } }
//! POST /proxy/v1/execute   body: ExecuteRequest
//!      → TxResponse (non-zero `code` is a rejected transaction)
//! POST /proxy/v1/query     body: QueryRequest
//!      → the decrypted contract answer, verbatim
//! ```
//! Any non-2xx status is a transport error carrying the response body.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::client::ComputeClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, ExecuteRequest, QueryRequest, TxResponse,
};
use crate::config::NetworkConfig;
use crate::observability::metrics;

pub const NODE_INFO_PATH: &str = "cosmos/base/tendermint/v1beta1/node_info";
pub const EXECUTE_PATH: &str = "proxy/v1/execute";
pub const QUERY_PATH: &str = "proxy/v1/query";

#[derive(Deserialize)]
struct NodeInfoResponse {
    default_node_info: DefaultNodeInfo,
}

#[derive(Deserialize)]
struct DefaultNodeInfo {
    network: String,
}

/// [`ComputeClient`] over the signing proxy protocol.
#[derive(Clone)]
pub struct SigningProxyClient {
    http: reqwest::Client,
    base_url: String,
    sender: String,
    config: NetworkConfig,
}

impl SigningProxyClient {
    /// Create a client sending from `sender`.
    ///
    /// Requests go to `config.proxy_endpoint()`.
    pub fn new(config: NetworkConfig, sender: impl Into<String>) -> BlockchainResult<Self> {
        let endpoint = config.proxy_endpoint();
        let parsed: url::Url = endpoint.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid proxy URL '{}': {}", endpoint, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        let sender = sender.into();
        tracing::debug!(
            url = %parsed,
            chain_id = %config.chain_id,
            sender = %sender,
            "Signing proxy client created"
        );

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            sender,
            config,
        })
    }

    /// Get the chain id of the node behind the proxy.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let url = self.endpoint(NODE_INFO_PATH);
        let response = self.http.get(&url).send().await.map_err(|e| self.map_error(e))?;
        let info: NodeInfoResponse = self.read_json(response).await?;
        Ok(ChainId(info.default_node_info.network))
    }

    /// Verify the connected chain id matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id.clone(),
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Check if the proxy is reachable.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_chain_id().await.is_ok();
        metrics::record_proxy_health(healthy);
        healthy
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> BlockchainResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> BlockchainResult<T> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_error(e))?;

        if !status.is_success() {
            return Err(BlockchainError::Rpc(format!(
                "Proxy returned status {}: {}",
                status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| BlockchainError::Decode(format!("{}: {}", e, text)))
    }

    fn map_error(&self, err: reqwest::Error) -> BlockchainError {
        if err.is_timeout() {
            BlockchainError::Timeout(self.config.rpc_timeout_secs)
        } else {
            BlockchainError::Rpc(err.to_string())
        }
    }
}

#[async_trait]
impl ComputeClient for SigningProxyClient {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn execute_contract(&self, request: ExecuteRequest) -> BlockchainResult<TxResponse> {
        let tx: TxResponse = self.post(EXECUTE_PATH, &request).await?;
        tracing::debug!(
            txhash = %tx.txhash,
            code = tx.code,
            gas_used = tx.gas_used,
            "Execute acknowledged"
        );
        tx.into_result()
    }

    async fn query_contract(&self, request: QueryRequest) -> BlockchainResult<serde_json::Value> {
        self.post(QUERY_PATH, &request).await
    }
}

impl std::fmt::Debug for SigningProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningProxyClient")
            .field("url", &self.base_url)
            .field("chain_id", &self.config.chain_id)
            .field("sender", &self.sender)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
