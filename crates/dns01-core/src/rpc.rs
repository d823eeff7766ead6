//! JSON-RPC 2.0 data model
//!
//! Wire types shared by transports. Decoding works on the raw
//! [`serde_json::Value`] so that a `"result": null` reply is still a result.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Protocol version sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Provider method names
pub mod methods {
    /// Zone existence probe: `dns_zone(zone)`
    pub const DNS_ZONE: &str = "dns_zone";
    /// `create_dns_record(zone, record)`, returns a record handle
    pub const CREATE_DNS_RECORD: &str = "create_dns_record";
    /// `delete_dns_record(zone, handle)`
    pub const DELETE_DNS_RECORD: &str = "delete_dns_record";
}

/// A JSON-RPC request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Correlation id
    pub id: u64,
    /// Method name
    pub method: String,
    /// Positional parameters, auth parameters first
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request envelope
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Whether `payload` carries this request's id
    pub fn matches(&self, payload: &Value) -> bool {
        payload.get("id").and_then(Value::as_u64) == Some(self.id)
    }
}

/// Structured error returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Human readable message
    pub message: String,
    /// Provider error code
    pub code: i64,
    /// Optional extra detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// The outcome carried by a JSON-RPC response
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    /// The `result` member
    Result(Value),
    /// The `error` member
    Error(RpcError),
}

impl RpcResponse {
    /// Interpret a decoded, already id-checked response payload
    ///
    /// `result` wins over `error` when both are present. A payload with
    /// neither, or with an `error` that is not `{message, code}`, is a
    /// protocol violation.
    pub fn from_payload(payload: Value) -> Result<Self> {
        if let Some(result) = payload.get("result") {
            return Ok(Self::Result(result.clone()));
        }

        match payload.get("error") {
            Some(error) => match serde_json::from_value::<RpcError>(error.clone()) {
                Ok(error) => Ok(Self::Error(error)),
                Err(_) => Err(Error::protocol("invalid response", payload)),
            },
            None => Err(Error::protocol("invalid response", payload)),
        }
    }

    /// Convert into the call result, mapping `error` to [`Error::Api`]
    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Result(value) => Ok(value),
            Self::Error(error) => Err(Error::Api(error)),
        }
    }
}
