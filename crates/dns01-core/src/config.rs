//! Configuration types
//!
//! Credentials are supplied already parsed by the embedding ACME client;
//! this module only models and validates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Expected length of a provider account reference
pub const ACCOUNT_REFERENCE_LEN: usize = 4;

/// Account credentials for the provider API
///
/// The Debug implementation never exposes the API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCredentials {
    account_reference: String,
    api_key: String,
}

impl AccountCredentials {
    /// Create credentials
    pub fn new(account_reference: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            account_reference: account_reference.into(),
            api_key: api_key.into(),
        }
    }

    /// The account reference, sent as the first param of every call
    pub fn account_reference(&self) -> &str {
        &self.account_reference
    }

    /// The API key, sent as the second param of every call
    /// ⚠️ NEVER log this value
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Validate the credentials
    ///
    /// Empty values are rejected. An account reference that is not four
    /// characters long is suspicious but accepted.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.account_reference.trim().is_empty() {
            return Err(crate::Error::config("Account reference cannot be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        if self.account_reference.chars().count() != ACCOUNT_REFERENCE_LEN {
            tracing::warn!(
                "Account reference '{}' is not {} characters long",
                self.account_reference,
                ACCOUNT_REFERENCE_LEN
            );
        }
        Ok(())
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account_reference", &self.account_reference)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

/// Authenticator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorConfig {
    /// Registered transport name (e.g., "metaname")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API endpoint override; `None` uses the provider default
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Time the ACME client should wait for DNS changes to become visible
    ///
    /// Informational: the authenticator itself never waits.
    #[serde(default = "default_propagation_seconds")]
    pub propagation_seconds: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl AuthenticatorConfig {
    /// Create a configuration with defaults for the given provider
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            endpoint: None,
            propagation_seconds: default_propagation_seconds(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the propagation delay
    pub fn with_propagation_seconds(mut self, seconds: u64) -> Self {
        self.propagation_seconds = seconds;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Propagation delay as a [`Duration`]
    pub fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_seconds)
    }

    /// Request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.provider.is_empty() {
            return Err(crate::Error::config("Provider name cannot be empty"));
        }

        if let Some(endpoint) = &self.endpoint
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                endpoint
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }

        Ok(())
    }
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self::new(default_provider())
    }
}

fn default_provider() -> String {
    "metaname".to_string()
}

fn default_propagation_seconds() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}
