//! SecretBox contract access facade.
//!
//! One method per contract interaction. Each builds the message, hands it
//! to a [`ComputeClient`] and returns whatever comes back. Nothing is
//! retried or validated here; transport errors, rejected transactions and
//! signing failures reach the caller unchanged.

use serde::Serialize;

use crate::blockchain::client::ComputeClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ExecuteRequest, QueryRequest, TxResponse,
};
use crate::config::{AppConfig, ContractConfig};
use crate::contract::msg::{
    decode_query_response, AllInfoResult, AmIRichestResult, ExecuteMsg, QueryAnswer, QueryMsg,
    QueryResult, QueryWithPermit,
};
use crate::observability::metrics;
use crate::permit::{Permission, Permit, PermitParams, PermitSigner};

/// Handle on the deployed SecretBox contract.
#[derive(Debug, Clone)]
pub struct SecretBox {
    contract: ContractConfig,
    permit_chain_id: String,
}

impl SecretBox {
    /// Create a facade for `contract`, signing permits for `permit_chain_id`.
    pub fn new(contract: ContractConfig, permit_chain_id: impl Into<String>) -> Self {
        Self {
            contract,
            permit_chain_id: permit_chain_id.into(),
        }
    }

    /// Create a facade from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.contract.clone(), config.permit_chain_id())
    }

    /// Contract address.
    pub fn address(&self) -> &str {
        &self.contract.address
    }

    /// Record the sender's net worth.
    pub async fn submit_net_worth<C>(&self, client: &C, networth: &str) -> BlockchainResult<TxResponse>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = ExecuteMsg::SubmitNetWorth {
            networth: networth.to_string(),
        };
        let tx = self.execute(client, "submit_net_worth", &msg).await?;
        tracing::info!(sender = %client.sender(), txhash = %tx.txhash, "Submitted net worth");
        Ok(tx)
    }

    /// Set the sender's viewing key.
    pub async fn set_viewing_key<C>(&self, client: &C, key: &str) -> BlockchainResult<TxResponse>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = ExecuteMsg::SetViewingKey {
            key: key.to_string(),
        };
        let tx = self.execute(client, "set_viewing_key", &msg).await?;
        tracing::info!(sender = %client.sender(), txhash = %tx.txhash, "Viewing key set");
        Ok(tx)
    }

    /// Query everything stored for `address`, authenticated by viewing key.
    pub async fn query_all_info<C>(&self, client: &C, address: &str, key: &str) -> BlockchainResult<AllInfoResult>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = QueryMsg::AllInfo {
            addr: address.to_string(),
            key: key.to_string(),
        };
        self.query(client, "all_info", &msg).await
    }

    /// Ask whether `address` is the richest participant, authenticated by viewing key.
    pub async fn query_am_i_richest<C>(&self, client: &C, address: &str, key: &str) -> BlockchainResult<AmIRichestResult>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = QueryMsg::AmIRichest {
            addr: address.to_string(),
            key: key.to_string(),
        };
        self.query(client, "am_i_richest", &msg).await
    }

    /// `all_info` for the permit's signer.
    pub async fn query_all_info_with_permit<C>(&self, client: &C, permit: &Permit) -> BlockchainResult<AllInfoResult>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = QueryMsg::WithPermit {
            permit: permit.clone(),
            query: QueryWithPermit::AllInfo {},
        };
        self.query(client, "all_info_with_permit", &msg).await
    }

    /// `am_i_richest` for the permit's signer.
    pub async fn query_am_i_richest_with_permit<C>(&self, client: &C, permit: &Permit) -> BlockchainResult<AmIRichestResult>
    where
        C: ComputeClient + ?Sized,
    {
        let msg = QueryMsg::WithPermit {
            permit: permit.clone(),
            query: QueryWithPermit::AmIRichest {},
        };
        self.query(client, "am_i_richest_with_permit", &msg).await
    }

    /// Sign a permit for this contract only.
    ///
    /// Duplicate permissions are collapsed; their order is kept.
    pub async fn generate_permit<S>(&self, account: &S, permit_name: &str, permissions: &[Permission]) -> BlockchainResult<Permit>
    where
        S: PermitSigner + ?Sized,
    {
        let mut scoped: Vec<Permission> = Vec::with_capacity(permissions.len());
        for permission in permissions {
            if !scoped.contains(permission) {
                scoped.push(*permission);
            }
        }

        let params = PermitParams {
            permit_name: permit_name.to_string(),
            allowed_tokens: vec![self.contract.address.clone()],
            chain_id: self.permit_chain_id.clone(),
            permissions: scoped,
        };

        let result = account.sign_permit(params).await;
        metrics::record_contract_call("generate_permit", result.is_ok());
        let permit = result?;

        tracing::info!(
            signer = %account.address(),
            permit_name = %permit_name,
            chain_id = %self.permit_chain_id,
            "Permit generated"
        );
        Ok(permit)
    }

    async fn execute<C, M>(&self, client: &C, operation: &'static str, msg: &M) -> BlockchainResult<TxResponse>
    where
        C: ComputeClient + ?Sized,
        M: Serialize,
    {
        let request = ExecuteRequest {
            sender: client.sender().to_string(),
            contract_address: self.contract.address.clone(),
            code_hash: self.contract.code_hash.clone(),
            msg: to_json(msg)?,
            gas_limit: self.contract.gas_limit,
        };

        let result = client.execute_contract(request).await;
        metrics::record_contract_call(operation, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(operation, error = %e, "Execute failed");
        }
        result
    }

    async fn query<C, T>(&self, client: &C, operation: &'static str, msg: &QueryMsg) -> BlockchainResult<QueryResult<T>>
    where
        C: ComputeClient + ?Sized,
        T: QueryAnswer,
    {
        let request = QueryRequest {
            contract_address: self.contract.address.clone(),
            code_hash: self.contract.code_hash.clone(),
            query: to_json(msg)?,
        };

        let result = client
            .query_contract(request)
            .await
            .and_then(decode_query_response::<T>);
        metrics::record_contract_call(operation, result.is_ok());

        match &result {
            Ok(QueryResult::Error(message)) => {
                tracing::debug!(operation, message = %message, "Contract returned an error");
            }
            Err(e) => tracing::warn!(operation, error = %e, "Query failed"),
            Ok(QueryResult::Answer(_)) => {}
        }
        result
    }
}

fn to_json<M: Serialize>(msg: &M) -> BlockchainResult<serde_json::Value> {
    serde_json::to_value(msg).map_err(|e| BlockchainError::Decode(format!("Failed to encode message: {}", e)))
}
