//! Challenge record types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lowest TTL the provider accepts, in seconds
pub const MINIMUM_TTL: u32 = 60;

/// A DNS record in the shape `create_dns_record` expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordSpec {
    /// Fully-qualified record name, with trailing dot
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Priority for MX/SRV; always null for TXT
    pub aux: Option<u32>,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Record content
    pub data: String,
}

impl DnsRecordSpec {
    /// A TXT record at the provider's minimum TTL
    pub fn txt(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: "TXT".to_string(),
            aux: None,
            ttl: MINIMUM_TTL,
            data: content.into(),
        }
    }
}

/// Provider-assigned identifier of a created record
///
/// Opaque to this crate. Serializes as the raw value the provider returned
/// so it can be handed back across a process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordHandle(Value);

impl RecordHandle {
    /// Wrap a provider value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw provider value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the raw provider value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}
