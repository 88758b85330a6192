use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Version {
    #[default]
    TwoPointZero,
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::TwoPointZero => serializer.serialize_str("2.0"),
        }
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version_str = String::deserialize(deserializer)?;
        match version_str.as_str() {
            "2.0" => Ok(Self::TwoPointZero),
            _ => Err(SerdeError::custom("Invalid JSON-RPC version")),
        }
    }
}

// **************************** request *******************************

/// One request unit of the JSONSQL wire protocol.
///
/// `params` is generic so query types serialize straight into the body
/// without an intermediate `Value` round-trip.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Envelope<P = Value> {
    pub jsonrpc: Version,
    pub id: u64,
    pub method: String,
    pub params: P,
}

impl<P> Envelope<P> {
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: Version::TwoPointZero,
            id,
            method: method.into(),
            params,
        }
    }
}

impl<P: Serialize> Envelope<P> {
    /// Erases the params type, for collecting differently shaped
    /// envelopes into one batch.
    pub fn erase(self) -> serde_json::Result<Envelope<Value>> {
        Ok(Envelope {
            jsonrpc: self.jsonrpc,
            id: self.id,
            method: self.method,
            params: serde_json::to_value(self.params)?,
        })
    }
}
// *************************************************************************

// **************************** response *******************************
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ResponseId {
    Number(u64),
    String(String),
    Null,
}

/// One response unit. The server sends exactly one of `result`/`error`;
/// both are optional here so the transport can enforce that invariant
/// itself instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: Option<Version>,
    #[serde(default)]
    pub id: Option<ResponseId>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ThisError, PartialEq)]
#[error("{message} (code {code})")]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
// *************************************************************************
