//! Configuration loading from disk and the process environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Node endpoint URL.
pub const ENV_GRPC_URL: &str = "LOCALSECRET_GRPC";
/// Optional signing proxy URL.
pub const ENV_PROXY_URL: &str = "SECRET_BOX_PROXY_URL";
/// Numeric code id of the uploaded contract.
pub const ENV_CODE_ID: &str = "SECRET_BOX_CODE";
/// Contract code hash.
pub const ENV_CODE_HASH: &str = "SECRET_BOX_HASH";
/// Deployed contract address.
pub const ENV_CONTRACT_ADDRESS: &str = "SECRET_BOX_ADDRESS";
/// Optional chain id override.
pub const ENV_CHAIN_ID: &str = "SECRET_BOX_CHAIN_ID";
/// Optional permit chain id override.
pub const ENV_PERMIT_CHAIN_ID: &str = "SECRET_BOX_PERMIT_CHAIN_ID";
/// Optional execute gas limit override.
pub const ENV_GAS_LIMIT: &str = "SECRET_BOX_GAS_LIMIT";
/// Optional log level override.
pub const ENV_LOG_LEVEL: &str = "SECRET_BOX_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, reason: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, reason } => write!(f, "Invalid {}: {}", var, reason),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, overlay the environment,
/// then validate.
///
/// A `.env` file in the working directory is loaded first if present.
/// Variables already set in the process environment win over `.env`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Ok(dotenv_path) = dotenvy::dotenv() {
        tracing::debug!(path = ?dotenv_path, "Loaded .env file");
    }

    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |name| env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts the environment so the overlay can be exercised
/// without touching process state.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_GRPC_URL) {
        config.network.url = url;
    }
    if let Some(url) = get(ENV_PROXY_URL) {
        config.network.proxy_url = Some(url);
    }
    if let Some(code_id) = get(ENV_CODE_ID) {
        config.contract.code_id = parse_number(ENV_CODE_ID, &code_id)?;
    }
    if let Some(hash) = get(ENV_CODE_HASH) {
        config.contract.code_hash = hash;
    }
    if let Some(address) = get(ENV_CONTRACT_ADDRESS) {
        config.contract.address = address;
    }
    if let Some(chain_id) = get(ENV_CHAIN_ID) {
        config.network.chain_id = chain_id;
    }
    if let Some(chain_id) = get(ENV_PERMIT_CHAIN_ID) {
        config.permits.chain_id = Some(chain_id);
    }
    if let Some(gas_limit) = get(ENV_GAS_LIMIT) {
        config.contract.gas_limit = parse_number(ENV_GAS_LIMIT, &gas_limit)?;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    Ok(())
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}
