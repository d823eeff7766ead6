//! Error types for DNS-01 record automation
//!
//! Every failure is terminal for the current `perform`/`cleanup` call and is
//! propagated to the caller. Callers branch on the variant, not the message.

use crate::rpc::RpcError;
use thiserror::Error;

/// Result type alias for DNS-01 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed underlying cause of a transport failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials missing or configuration invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network, HTTP or body-decoding failure
    #[error("{message}: {source}")]
    Transport {
        /// What failed
        message: String,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// Malformed or out-of-sequence JSON-RPC response
    #[error("{message}: {payload}")]
    Protocol {
        /// What was wrong with the response
        message: String,
        /// Raw response payload, kept for diagnosis
        payload: serde_json::Value,
    },

    /// Structured error returned by the provider
    #[error("API error: {0}")]
    Api(RpcError),

    /// No candidate suffix of the hostname is a zone owned by the account
    #[error("Unable to find a DNS zone for {hostname}")]
    ZoneNotFound {
        /// Validation hostname as given by the caller
        hostname: String,
    },

    /// Challenge record creation failed
    #[error("Unable to create an acme-challenge record for {domain} in the zone {zone}: {source}")]
    RecordCreation {
        /// Domain being validated
        domain: String,
        /// Zone the record was created in
        zone: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Challenge record deletion failed
    #[error("Unable to delete the acme-challenge record for {domain} in the zone {zone}: {source}")]
    RecordDeletion {
        /// Domain being validated
        domain: String,
        /// Zone the record lives in
        zone: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Lifecycle operation called out of order
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Local JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error wrapping its cause
    pub fn transport(
        msg: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: source.into(),
        }
    }

    /// Create a protocol error carrying the offending payload
    pub fn protocol(msg: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Protocol {
            message: msg.into(),
            payload,
        }
    }

    /// Create a zone-not-found error
    pub fn zone_not_found(hostname: impl Into<String>) -> Self {
        Self::ZoneNotFound {
            hostname: hostname.into(),
        }
    }

    /// Wrap a failure of `create_dns_record`
    pub fn record_creation(domain: impl Into<String>, zone: impl Into<String>, source: Error) -> Self {
        Self::RecordCreation {
            domain: domain.into(),
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure of `delete_dns_record`
    pub fn record_deletion(domain: impl Into<String>, zone: impl Into<String>, source: Error) -> Self {
        Self::RecordDeletion {
            domain: domain.into(),
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    /// Create a lifecycle error
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// The provider-side error, if this failure came from one
    ///
    /// Looks through `RecordCreation`/`RecordDeletion` wrappers.
    pub fn api_error(&self) -> Option<&RpcError> {
        match self {
            Self::Api(err) => Some(err),
            Self::RecordCreation { source, .. } | Self::RecordDeletion { source, .. } => {
                source.api_error()
            }
            _ => None,
        }
    }

    /// Nothing at this layer is retried automatically.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
