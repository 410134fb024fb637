//! Query permit types.
//!
//! Shapes follow the secret-toolkit query permit so a signed [`Permit`]
//! serializes exactly as the contract expects inside `with_permit`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Amino type of a secp256k1 public key.
pub const PUB_KEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Errors raised while handling permits locally.
#[derive(Debug, Error)]
pub enum PermitError {
    #[error("Permit file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Permit JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown permission '{0}' (expected all_info or am_i_richest)")]
    UnknownPermission(String),

    #[error("Invalid permit signature: {0}")]
    Signature(String),
}

/// A query the permit holder is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    AllInfo,
    AmIRichest,
}

impl Permission {
    /// Every permission the contract understands.
    pub const ALL: [Permission; 2] = [Permission::AllInfo, Permission::AmIRichest];

    /// Wire name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AllInfo => "all_info",
            Permission::AmIRichest => "am_i_richest",
        }
    }

    /// Parse a user selection where the empty string means "nothing selected".
    pub fn parse_selection(s: &str) -> Result<Option<Self>, PermitError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl FromStr for Permission {
    type Err = PermitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_info" => Ok(Permission::AllInfo),
            "am_i_richest" => Ok(Permission::AmIRichest),
            other => Err(PermitError::UnknownPermission(other.to_string())),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed part of a permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitParams {
    pub permit_name: String,
    /// Contracts the permit may be presented to.
    pub allowed_tokens: Vec<String>,
    pub chain_id: String,
    pub permissions: Vec<Permission>,
}

/// Public key attached to a permit signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub kind: String,
    /// Base64 compressed secp256k1 key.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitSignature {
    pub pub_key: PubKey,
    /// Base64 64-byte `r || s` signature.
    pub signature: String,
}

/// A signed query permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    pub params: PermitParams,
    pub signature: PermitSignature,
}

impl Permit {
    /// Whether the permit grants `permission`.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.params.permissions.contains(&permission)
    }

    /// Whether the permit may be presented to `contract_address`.
    pub fn allows_contract(&self, contract_address: &str) -> bool {
        self.params.allowed_tokens.iter().any(|t| t == contract_address)
    }

    /// Write the permit as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), PermitError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a permit written by [`Permit::save`] or by any other wallet.
    pub fn load(path: &Path) -> Result<Self, PermitError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_permit() -> Permit {
        Permit {
            params: PermitParams {
                permit_name: "test".to_string(),
                allowed_tokens: vec!["secret1box".to_string()],
                chain_id: "secretdev-1".to_string(),
                permissions: vec![Permission::AllInfo],
            },
            signature: PermitSignature {
                pub_key: PubKey {
                    kind: PUB_KEY_TYPE.to_string(),
                    value: "AAAA".to_string(),
                },
                signature: "BBBB".to_string(),
            },
        }
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!("all_info".parse::<Permission>().unwrap(), Permission::AllInfo);
        assert_eq!(Permission::parse_selection("am_i_richest").unwrap(), Some(Permission::AmIRichest));
        assert_eq!(Permission::parse_selection("").unwrap(), None);
        assert!(matches!(
            "owner".parse::<Permission>(),
            Err(PermitError::UnknownPermission(p)) if p == "owner"
        ));
    }

    #[test]
    fn test_permit_wire_shape() {
        let value = serde_json::to_value(sample_permit()).unwrap();
        assert_eq!(
            value,
            json!({
                "params": {
                    "permit_name": "test",
                    "allowed_tokens": ["secret1box"],
                    "chain_id": "secretdev-1",
                    "permissions": ["all_info"]
                },
                "signature": {
                    "pub_key": { "type": "tendermint/PubKeySecp256k1", "value": "AAAA" },
                    "signature": "BBBB"
                }
            })
        );
    }

    #[test]
    fn test_permit_scope_checks() {
        let permit = sample_permit();
        assert!(permit.has_permission(Permission::AllInfo));
        assert!(!permit.has_permission(Permission::AmIRichest));
        assert!(permit.allows_contract("secret1box"));
        assert!(!permit.allows_contract("secret1other"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("permit.json");

        let permit = sample_permit();
        permit.save(&path).unwrap();
        assert_eq!(Permit::load(&path).unwrap(), permit);
    }
}
