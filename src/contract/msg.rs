//! SecretBox wire messages and query answers.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::permit::Permit;

/// State-changing messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Record the sender's net worth. The value is a decimal string.
    SubmitNetWorth { networth: String },
    /// Set the sender's viewing key.
    SetViewingKey { key: String },
}

/// Read-only queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    AllInfo { addr: String, key: String },
    AmIRichest { addr: String, key: String },
    WithPermit { permit: Permit, query: QueryWithPermit },
}

/// Queries that may run under a permit. They carry no arguments: the
/// permit identifies the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryWithPermit {
    AllInfo {},
    AmIRichest {},
}

/// Answer to `all_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllInfoResponse {
    pub richest: bool,
    #[serde(serialize_with = "uint128_to_string", deserialize_with = "uint128_from_json")]
    pub networth: u128,
}

/// Answer to `am_i_richest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmIRichestResponse {
    pub richest: bool,
}

/// A contract answer type together with the names it may be wrapped under.
pub trait QueryAnswer: DeserializeOwned {
    /// snake_case variant name (`all_info`).
    const TAG: &'static str;
    /// Variant name as the contract's `QueryAnswer` enum spells it (`AllInfo`).
    const VARIANT: &'static str;
}

impl QueryAnswer for AllInfoResponse {
    const TAG: &'static str = "all_info";
    const VARIANT: &'static str = "AllInfo";
}

impl QueryAnswer for AmIRichestResponse {
    const TAG: &'static str = "am_i_richest";
    const VARIANT: &'static str = "AmIRichest";
}

/// Either a decoded answer or the contract's error message.
///
/// The contract reports failures (wrong viewing key, missing permission)
/// as a bare string in place of the answer, so callers must branch here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResult<T> {
    Answer(T),
    Error(String),
}

impl<T> QueryResult<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }

    /// The answer, if the query succeeded.
    pub fn answer(&self) -> Option<&T> {
        match self {
            QueryResult::Answer(answer) => Some(answer),
            QueryResult::Error(_) => None,
        }
    }

    /// Convert into a `Result`, with the contract message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            QueryResult::Answer(answer) => Ok(answer),
            QueryResult::Error(message) => Err(message),
        }
    }
}

pub type AllInfoResult = QueryResult<AllInfoResponse>;
pub type AmIRichestResult = QueryResult<AmIRichestResponse>;

/// Decode a raw query response into a [`QueryResult`].
///
/// Accepts a string (the error variant), the flat answer record, or the
/// record wrapped under its variant name. Anything else is a decode error.
pub fn decode_query_response<T: QueryAnswer>(value: Value) -> BlockchainResult<QueryResult<T>> {
    let value = match value {
        Value::String(message) => return Ok(QueryResult::Error(message)),
        Value::Object(mut map) if map.len() == 1 => {
            let inner = map.remove(T::TAG).or_else(|| map.remove(T::VARIANT));
            inner.unwrap_or(Value::Object(map))
        }
        other => other,
    };

    serde_json::from_value(value.clone())
        .map(QueryResult::Answer)
        .map_err(|e| BlockchainError::Decode(format!("unexpected {} answer {}: {}", T::TAG, value, e)))
}

fn uint128_to_string<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// `Uint128` travels as a decimal string and may use the full `u128`
/// range. Plain JSON numbers are accepted too, but only up to `u64::MAX`:
/// larger ones reach us as lossy floats and are rejected.
fn uint128_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(u128::from(n)),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}
