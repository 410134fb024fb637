//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the SecretBox client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain endpoint settings.
    pub network: NetworkConfig,

    /// The deployed SecretBox contract.
    pub contract: ContractConfig,

    /// Accounts able to send transactions and sign permits.
    pub accounts: Vec<AccountConfig>,

    /// Permit signing settings.
    pub permits: PermitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Look up a configured account by name.
    pub fn account(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.name == name)
    }

    /// Chain id that permits are signed for.
    ///
    /// Falls back to the network chain id when no override is set.
    pub fn permit_chain_id(&self) -> &str {
        self.permits
            .chain_id
            .as_deref()
            .unwrap_or(self.network.chain_id.as_str())
    }
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Node endpoint URL (e.g., "http://localhost:9091").
    pub url: String,

    /// Signing proxy URL. Defaults to `url` when the node endpoint itself
    /// serves the proxy routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Chain id the endpoint is expected to serve.
    pub chain_id: String,

    /// Request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl NetworkConfig {
    /// Endpoint the signing proxy is reached at.
    pub fn proxy_endpoint(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(self.url.as_str())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            proxy_url: None,
            chain_id: "secretdev-1".to_string(),
            rpc_timeout_secs: 30,
        }
    }
}

/// Deployed contract reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Code id the contract was instantiated from.
    pub code_id: u64,

    /// Hex code hash used to encrypt messages for the contract.
    pub code_hash: String,

    /// Contract address (bech32).
    pub address: String,

    /// Gas limit attached to execute transactions.
    pub gas_limit: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            code_id: 0,
            code_hash: String::new(),
            address: String::new(),
            gas_limit: 1_000_000,
        }
    }
}

/// A named account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Name used to select the account (e.g., "alice").
    pub name: String,

    /// Expected account address (bech32). When set it must match the
    /// address derived from the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Environment variable holding the account mnemonic or hex private key.
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

fn default_key_env() -> String {
    crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR.to_string()
}

/// Permit signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PermitConfig {
    /// Chain id embedded in signed permits, when it differs from the network's.
    pub chain_id: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
