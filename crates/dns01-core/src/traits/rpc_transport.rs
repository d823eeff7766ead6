// # RPC Transport Trait
//
// Defines the interface for calling a provider's JSON-RPC API.
//
// ## Implementations
//
// - Metaname: `dns01-provider-metaname` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::RpcTransport;
// use serde_json::json;
//
// async fn probe(transport: &mut dyn RpcTransport) -> dns01_core::Result<()> {
//     transport.call("dns_zone", vec![json!("example.com")]).await?;
//     Ok(())
// }
// ```

use crate::config::{AccountCredentials, AuthenticatorConfig};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for JSON-RPC transport implementations
///
/// A transport owns the request-id counter for its session. `call` takes
/// `&mut self`: one transport serves one workflow at a time, and
/// concurrent workflows each need their own instance.
///
/// # Contract
///
/// - Authentication parameters are prepended to `params` by the transport
/// - The id sent equals the counter before the call
/// - The counter advances by exactly one after an in-sequence response,
///   whatever that response contains
/// - An out-of-sequence response leaves the counter unchanged and fails
///   with [`crate::Error::Protocol`]
/// - No retries: a failed call is reported once
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Call `method` and return the `result` member of the response
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Transport`]: network, HTTP or JSON decoding failure
    /// - [`crate::Error::Protocol`]: out-of-sequence or malformed response
    /// - [`crate::Error::Api`]: the provider returned an `error` member
    async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value, crate::Error>;

    /// The id the next request will carry
    fn next_request_id(&self) -> u64;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from credentials
pub trait RpcTransportFactory: Send + Sync {
    /// Create a transport bound to the given account
    ///
    /// # Errors
    ///
    /// [`crate::Error::Configuration`] if the credentials or settings are
    /// unusable.
    fn create(
        &self,
        credentials: &AccountCredentials,
        config: &AuthenticatorConfig,
    ) -> Result<Box<dyn RpcTransport>, crate::Error>;
}
