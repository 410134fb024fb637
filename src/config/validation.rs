//! Configuration validation.
//!
//! # Responsibilities
//! - Check that every required setting is present
//! - Check that account entries are uniquely named and any configured
//!   address is a `secret1` address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Values are carried through as given; the chain judges their content

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required setting is empty. Holds the setting's name.
    Missing(&'static str),
    /// An account entry is unusable.
    Account { name: String, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "{} is not set", field),
            ValidationError::Account { name, reason } => {
                write!(f, "account '{}': {}", name, reason)
            }
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.network.url.trim().is_empty() {
        errors.push(ValidationError::Missing("network.url"));
    }
    if config.network.chain_id.trim().is_empty() {
        errors.push(ValidationError::Missing("network.chain_id"));
    }
    if config.contract.code_id == 0 {
        errors.push(ValidationError::Missing("contract.code_id"));
    }
    if config.contract.code_hash.trim().is_empty() {
        errors.push(ValidationError::Missing("contract.code_hash"));
    }
    if config.contract.address.trim().is_empty() {
        errors.push(ValidationError::Missing("contract.address"));
    }

    let mut seen = HashSet::new();
    for account in &config.accounts {
        if let Some(address) = &account.address {
            if !address.trim().starts_with("secret1") {
                errors.push(ValidationError::Account {
                    name: account.name.clone(),
                    reason: "address is not a secret1 address",
                });
            }
        }
        if !seen.insert(account.name.as_str()) {
            errors.push(ValidationError::Account {
                name: account.name.clone(),
                reason: "duplicate name",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
