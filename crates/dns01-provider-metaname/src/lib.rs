// # Metaname JSON-RPC Transport
//
// This crate provides the Metaname implementation of `RpcTransport`.
//
// ## Behaviour
//
// - ✅ One HTTPS POST per call, JSON-RPC 2.0 envelope
// - ✅ Account reference and API key prepended to every call's params
// - ✅ Request ids start at 0 and advance only on in-sequence replies
// - ✅ HTTP timeout configured (30 seconds by default)
// - ❌ NO retry logic (a failed call is reported once)
// - ❌ NO zone or record caching
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - Provider MUST fail fast if credentials are empty
//
// ## API Reference
//
// - Metaname API 1.1: https://metaname.net/api/1.1/doc
// - `dns_zone(account_reference, api_key, zone)`
// - `create_dns_record(account_reference, api_key, zone, record)`
// - `delete_dns_record(account_reference, api_key, zone, reference)`

use async_trait::async_trait;
use dns01_core::rpc::{RpcRequest, RpcResponse};
use dns01_core::{
    AccountCredentials, AuthenticatorConfig, Error, Result, RpcTransport, RpcTransportFactory,
    TransportRegistry,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Metaname API endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://metaname.net/api/1.1";

/// Name the transport is registered under
pub const PROVIDER_NAME: &str = "metaname";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateful JSON-RPC client for the Metaname API
///
/// Owns the request-id counter of its session; see [`RpcTransport`] for
/// the sequencing contract.
pub struct MetanameClient {
    /// Account credentials
    /// ⚠️ NEVER log the API key
    credentials: AccountCredentials,

    /// JSON-RPC endpoint URL
    endpoint: String,

    /// Id of the next request
    request_id: u64,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for MetanameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetanameClient")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl MetanameClient {
    /// Create a client with the default timeout
    ///
    /// `endpoint` of `None` uses [`DEFAULT_API_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if the HTTP client cannot be built.
    pub fn new(credentials: AccountCredentials, endpoint: Option<String>) -> Result<Self> {
        Self::with_timeout(credentials, endpoint, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(
        credentials: AccountCredentials,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            request_id: 0,
            client,
        })
    }

    /// The endpoint calls are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Params every call starts with
    fn auth_params(&self) -> [Value; 2] {
        [
            Value::String(self.credentials.account_reference().to_string()),
            Value::String(self.credentials.api_key().to_string()),
        ]
    }

    /// Envelope for the next call
    pub fn build_request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        let mut all_params = Vec::with_capacity(params.len() + 2);
        all_params.extend(self.auth_params());
        all_params.extend(params);
        RpcRequest::new(self.request_id, method, all_params)
    }
}

#[async_trait]
impl RpcTransport for MetanameClient {
    /// Call a Metaname API method
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /api/1.1
    /// Content-Type: application/json
    ///
    /// {"jsonrpc": "2.0", "id": 0, "method": "dns_zone",
    ///  "params": ["abcd", "<api key>", "example.com"]}
    /// ```
    async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = self.build_request(method, params);
        tracing::debug!("Metaname API call: {} (id {})", method, request.id);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::transport("Metaname API call failed", e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport("Metaname API call failed", e))?;

        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| Error::transport("Metaname API returned a non-JSON response", e))?;

        if !request.matches(&payload) {
            tracing::warn!(
                "Metaname API reply to {} does not carry request id {}",
                method,
                request.id
            );
            return Err(Error::protocol("out of sequence response", payload));
        }
        self.request_id += 1;

        RpcResponse::from_payload(payload)?.into_result()
    }

    fn next_request_id(&self) -> u64 {
        self.request_id
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Metaname clients
pub struct MetanameFactory;

impl RpcTransportFactory for MetanameFactory {
    fn create(
        &self,
        credentials: &AccountCredentials,
        config: &AuthenticatorConfig,
    ) -> Result<Box<dyn RpcTransport>> {
        credentials.validate()?;

        Ok(Box::new(MetanameClient::with_timeout(
            credentials.clone(),
            config.endpoint.clone(),
            config.request_timeout(),
        )?))
    }
}

/// Register the Metaname transport with a registry
///
/// # Example
///
/// ```rust
/// use dns01_core::TransportRegistry;
///
/// let registry = TransportRegistry::new();
/// dns01_provider_metaname::register(&registry);
/// assert!(registry.has_transport("metaname"));
/// ```
pub fn register(registry: &TransportRegistry) {
    registry.register_transport(PROVIDER_NAME, Arc::new(MetanameFactory));
}
