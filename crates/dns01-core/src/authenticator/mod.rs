//! Challenge record lifecycle
//!
//! The [`Authenticator`] creates the TXT record an ACME server checks for
//! a DNS-01 challenge, and removes it afterwards.
//!
//! ## State Machine
//!
//! ```text
//!            perform ok              cleanup ok
//!   Idle ──────────────────► Created ──────────► Idle
//!     │
//!     │ perform error
//!     ▼
//!   Failed
//! ```
//!
//! The only state carried between `perform` and `cleanup` is the record
//! handle returned by the provider. The zone is resolved again on cleanup.

use crate::config::{AccountCredentials, AuthenticatorConfig};
use crate::error::{Error, Result};
use crate::record::{DnsRecordSpec, RecordHandle};
use crate::registry::TransportRegistry;
use crate::rpc::methods;
use crate::traits::{RpcTransport, RpcTransportFactory};
use crate::zone::resolve_zone;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the authenticator is in the challenge lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// No record outstanding
    Idle,
    /// A record was created and awaits cleanup
    Created,
    /// The last `perform` failed; no record is known
    Failed,
}

/// DNS-01 authenticator driving one challenge at a time
pub struct Authenticator {
    factory: Arc<dyn RpcTransportFactory>,
    config: AuthenticatorConfig,
    credentials: Option<AccountCredentials>,
    /// Built on first use, then reused
    transport: Option<Box<dyn RpcTransport>>,
    record_handle: Option<RecordHandle>,
    state: ChallengeState,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("transport_ready", &self.transport.is_some())
            .field("record_handle", &self.record_handle)
            .field("state", &self.state)
            .finish()
    }
}

impl Authenticator {
    /// Create an authenticator using `factory` to build its transport
    pub fn new(factory: Arc<dyn RpcTransportFactory>, config: AuthenticatorConfig) -> Self {
        Self {
            factory,
            config,
            credentials: None,
            transport: None,
            record_handle: None,
            state: ChallengeState::Idle,
        }
    }

    /// Create an authenticator for the provider named in `config`
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if the configuration is invalid or the
    /// provider is not registered.
    pub fn from_registry(registry: &TransportRegistry, config: AuthenticatorConfig) -> Result<Self> {
        config.validate()?;
        let factory = registry.factory(&config.provider)?;
        Ok(Self::new(factory, config))
    }

    /// Supply account credentials
    ///
    /// Any transport built from earlier credentials is discarded.
    pub fn set_credentials(&mut self, credentials: AccountCredentials) {
        self.credentials = Some(credentials);
        self.transport = None;
    }

    /// Human readable description
    pub fn description(&self) -> String {
        format!(
            "DNS-01 authenticator using the {} DNS API",
            self.config.provider
        )
    }

    /// How long the ACME client should wait after `perform`
    pub fn propagation_delay(&self) -> Duration {
        self.config.propagation_delay()
    }

    /// Current lifecycle state
    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Handle of the outstanding record, if any
    pub fn record_handle(&self) -> Option<&RecordHandle> {
        self.record_handle.as_ref()
    }

    /// Adopt a handle produced by a `perform` in another process
    pub fn restore_record_handle(&mut self, handle: RecordHandle) {
        if let Some(previous) = &self.record_handle {
            warn!("Replacing outstanding record handle {}", previous);
        }
        self.record_handle = Some(handle);
        self.state = ChallengeState::Created;
    }

    /// Transport for this account, built on first use
    fn transport(&mut self) -> Result<&mut (dyn RpcTransport + 'static)> {
        if self.transport.is_none() {
            let credentials = self.credentials.as_ref().ok_or_else(|| {
                Error::config(format!(
                    "API credentials for a {} account must be configured before using this authenticator",
                    self.config.provider
                ))
            })?;
            credentials.validate()?;

            debug!(
                "Creating {} transport for account {}",
                self.config.provider,
                credentials.account_reference()
            );
            self.transport = Some(self.factory.create(credentials, &self.config)?);
        }

        match self.transport.as_mut() {
            Some(transport) => Ok(&mut **transport),
            None => Err(Error::config("Transport unavailable")),
        }
    }

    /// Create the challenge TXT record
    ///
    /// On success the provider's record handle is kept for [`cleanup`].
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`]: no credentials
    /// - [`Error::ZoneNotFound`]: no owned zone matches `validation_hostname`
    /// - [`Error::RecordCreation`]: `create_dns_record` failed
    ///
    /// [`cleanup`]: Authenticator::cleanup
    pub async fn perform(
        &mut self,
        domain: &str,
        validation_hostname: &str,
        validation_value: &str,
    ) -> Result<RecordHandle> {
        match self
            .create_record(domain, validation_hostname, validation_value)
            .await
        {
            Ok(handle) => {
                if let Some(previous) = &self.record_handle {
                    warn!(
                        "Record {} was never cleaned up and is no longer tracked",
                        previous
                    );
                }
                self.record_handle = Some(handle.clone());
                self.state = ChallengeState::Created;
                Ok(handle)
            }
            Err(e) => {
                self.state = ChallengeState::Failed;
                Err(e)
            }
        }
    }

    async fn create_record(
        &mut self,
        domain: &str,
        validation_hostname: &str,
        validation_value: &str,
    ) -> Result<RecordHandle> {
        let transport = self.transport()?;
        let zone = resolve_zone(transport, validation_hostname).await?;

        let record = DnsRecordSpec::txt(format!("{}.", validation_hostname), validation_value);
        let params = vec![Value::String(zone.clone()), serde_json::to_value(&record)?];

        info!(
            "Creating TXT record {} in zone {} for {}",
            record.name, zone, domain
        );

        let handle = transport
            .call(methods::CREATE_DNS_RECORD, params)
            .await
            .map_err(|e| Error::record_creation(domain, &zone, e))?;

        info!("Created TXT record {} (handle {})", record.name, handle);
        Ok(RecordHandle::new(handle))
    }

    /// Delete the record created by [`perform`]
    ///
    /// # Errors
    ///
    /// - [`Error::Lifecycle`]: no record has been created
    /// - [`Error::ZoneNotFound`]: the zone can no longer be found
    /// - [`Error::RecordDeletion`]: `delete_dns_record` failed; the handle
    ///   is kept so the record can be removed by hand
    ///
    /// [`perform`]: Authenticator::perform
    pub async fn cleanup(
        &mut self,
        domain: &str,
        validation_hostname: &str,
        _validation_value: &str,
    ) -> Result<()> {
        let handle = self
            .record_handle
            .clone()
            .ok_or_else(|| Error::lifecycle("no record to clean up"))?;

        let transport = self.transport()?;
        let zone = resolve_zone(transport, validation_hostname).await?;

        info!(
            "Deleting TXT record {} (handle {}) from zone {} for {}",
            validation_hostname, handle, zone, domain
        );

        transport
            .call(
                methods::DELETE_DNS_RECORD,
                vec![Value::String(zone.clone()), handle.into_value()],
            )
            .await
            .map_err(|e| Error::record_deletion(domain, &zone, e))?;

        self.record_handle = None;
        self.state = ChallengeState::Idle;
        info!("Deleted TXT record {}", validation_hostname);
        Ok(())
    }
}
