//! Permit signing.
//!
//! A permit is signed as an amino `StdSignDoc` carrying a single
//! `query_permit` message with zero fee, zero account number and zero
//! sequence. The contract rebuilds the same document to verify it.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use serde::Serialize;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::permit::types::{
    Permission, Permit, PermitError, PermitParams, PermitSignature, PubKey, PUB_KEY_TYPE,
};

/// Something able to sign query permits for one account.
#[async_trait]
pub trait PermitSigner: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> &str;

    /// Sign `params`, producing a permit the contract can verify.
    async fn sign_permit(&self, params: PermitParams) -> BlockchainResult<Permit>;
}

// Field order is alphabetical: amino JSON is signed with sorted keys.
#[derive(Serialize)]
struct SignDoc<'a> {
    account_number: &'static str,
    chain_id: &'a str,
    fee: Fee,
    memo: &'static str,
    msgs: [PermitMsg<'a>; 1],
    sequence: &'static str,
}

#[derive(Serialize)]
struct Fee {
    amount: [Coin; 1],
    gas: &'static str,
}

#[derive(Serialize)]
struct Coin {
    amount: &'static str,
    denom: &'static str,
}

#[derive(Serialize)]
struct PermitMsg<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: PermitMsgValue<'a>,
}

#[derive(Serialize)]
struct PermitMsgValue<'a> {
    allowed_tokens: &'a [String],
    permissions: &'a [Permission],
    permit_name: &'a str,
}

/// Canonical bytes signed for `params`.
pub fn sign_doc_bytes(params: &PermitParams) -> Result<Vec<u8>, PermitError> {
    let doc = SignDoc {
        account_number: "0",
        chain_id: &params.chain_id,
        fee: Fee {
            amount: [Coin {
                amount: "0",
                denom: "uscrt",
            }],
            gas: "1",
        },
        memo: "",
        msgs: [PermitMsg {
            kind: "query_permit",
            value: PermitMsgValue {
                allowed_tokens: &params.allowed_tokens,
                permissions: &params.permissions,
                permit_name: &params.permit_name,
            },
        }],
        sequence: "0",
    };
    Ok(serde_json::to_vec(&doc)?)
}

/// Check a permit's signature against its embedded public key.
///
/// This only proves the permit is internally consistent. Whether the key
/// belongs to the querying account is decided on-chain.
pub fn verify_permit(permit: &Permit) -> Result<(), PermitError> {
    if permit.signature.pub_key.kind != PUB_KEY_TYPE {
        return Err(PermitError::Signature(format!(
            "unsupported key type {}",
            permit.signature.pub_key.kind
        )));
    }

    let key_bytes = BASE64
        .decode(&permit.signature.pub_key.value)
        .map_err(|e| PermitError::Signature(format!("public key: {}", e)))?;
    let sig_bytes = BASE64
        .decode(&permit.signature.signature)
        .map_err(|e| PermitError::Signature(format!("signature: {}", e)))?;

    let key = VerifyingKey::from_sec1_bytes(&key_bytes)
        .map_err(|e| PermitError::Signature(format!("public key: {}", e)))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|e| PermitError::Signature(format!("signature: {}", e)))?;

    let doc = sign_doc_bytes(&permit.params)?;
    key.verify(&doc, &signature)
        .map_err(|_| PermitError::Signature("does not match params".to_string()))
}

#[async_trait]
impl PermitSigner for Wallet {
    fn address(&self) -> &str {
        Wallet::address(self)
    }

    async fn sign_permit(&self, params: PermitParams) -> BlockchainResult<Permit> {
        let doc = sign_doc_bytes(&params)
            .map_err(|e| BlockchainError::Wallet(format!("Failed to encode sign doc: {}", e)))?;
        let signature = self.sign_amino(&doc).await?;

        tracing::debug!(
            address = %Wallet::address(self),
            permit_name = %params.permit_name,
            permissions = ?params.permissions,
            "Permit signed"
        );

        Ok(Permit {
            params,
            signature: PermitSignature {
                pub_key: PubKey {
                    kind: PUB_KEY_TYPE.to_string(),
                    value: BASE64.encode(self.public_key()),
                },
                signature: BASE64.encode(signature),
            },
        })
    }
}
