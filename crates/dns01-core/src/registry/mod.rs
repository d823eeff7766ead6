//! Plugin-based transport registry
//!
//! Transport factories are registered by provider name at startup, so the
//! binary picks a provider from configuration without hard-coded branches.
//!
//! ## Registration
//!
//! Provider crates expose a `register` function:
//!
//! ```rust,ignore
//! // In dns01-provider-metaname
//! pub fn register(registry: &TransportRegistry) {
//!     registry.register_transport("metaname", Arc::new(MetanameFactory));
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::RpcTransportFactory;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of transport factories keyed by provider name
///
/// Uses interior mutability with RwLock, allowing concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Arc<dyn RpcTransportFactory>>>,
}

impl TransportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport factory, replacing any previous one of that name
    pub fn register_transport(
        &self,
        name: impl Into<String>,
        factory: Arc<dyn RpcTransportFactory>,
    ) {
        let mut transports = self
            .transports
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        transports.insert(name.into(), factory);
    }

    /// Look up the factory for a provider
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if no factory is registered under `name`.
    pub fn factory(&self, name: &str) -> Result<Arc<dyn RpcTransportFactory>> {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        transports
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", name)))
    }

    /// List all registered provider names, sorted
    pub fn list_transports(&self) -> Vec<String> {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = transports.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider is registered
    pub fn has_transport(&self, name: &str) -> bool {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        transports.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccountCredentials, AuthenticatorConfig};
    use crate::traits::RpcTransport;

    struct MockTransportFactory;

    impl RpcTransportFactory for MockTransportFactory {
        fn create(
            &self,
            _credentials: &AccountCredentials,
            _config: &AuthenticatorConfig,
        ) -> Result<Box<dyn RpcTransport>> {
            Err(Error::config("Mock transport not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = TransportRegistry::new();

        // Initially empty
        assert!(!registry.has_transport("mock"));
        assert!(registry.factory("mock").is_err());

        registry.register_transport("mock", Arc::new(MockTransportFactory));

        assert!(registry.has_transport("mock"));
        assert!(registry.factory("mock").is_ok());
        assert_eq!(registry.list_transports(), vec!["mock".to_string()]);
    }

    #[test]
    fn test_unknown_provider_is_configuration_error() {
        let registry = TransportRegistry::new();
        let err = registry.factory("route53").err().unwrap();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("route53")));
    }
}
