//! Test doubles and common utilities for lifecycle contract tests
//!
//! [`FakeProvider`] models an account on a JSON-RPC DNS provider: a set of
//! owned zones plus the records created in them. Transports built by
//! [`FakeTransportFactory`] talk to it in-process and record every call.

#![allow(dead_code)]

use dns01_core::error::{Error, Result};
use dns01_core::rpc::{RpcError, methods};
use dns01_core::{AccountCredentials, AuthenticatorConfig, RpcTransport, RpcTransportFactory};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCOUNT_REFERENCE: &str = "test_account_reference";
pub const API_KEY: &str = "test_api_key";
pub const RECORD_REFERENCE: &str = "record_reference";

/// One call as seen by the provider, auth params included
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

#[derive(Default)]
struct ProviderInner {
    zones: Vec<String>,
    records: Vec<(String, Value)>,
    calls: Vec<RecordedCall>,
    fail_create: bool,
    fail_delete: bool,
    fail_transport: bool,
}

/// Shared provider state; clones observe the same account
#[derive(Clone, Default)]
pub struct FakeProvider {
    inner: Arc<Mutex<ProviderInner>>,
}

impl FakeProvider {
    /// An account owning `zones`
    pub fn with_zones(zones: &[&str]) -> Self {
        let provider = Self::default();
        provider.inner.lock().unwrap().zones = zones.iter().map(|z| z.to_string()).collect();
        provider
    }

    /// Make `create_dns_record` fail with a provider error
    pub fn fail_create(&self) {
        self.inner.lock().unwrap().fail_create = true;
    }

    /// Make `delete_dns_record` fail with a provider error
    pub fn fail_delete(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete = fail;
    }

    /// Make every call fail as if the network were down
    pub fn fail_transport(&self, fail: bool) {
        self.inner.lock().unwrap().fail_transport = fail;
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Calls of one method, in order
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    /// Zones probed with `dns_zone`, in order
    pub fn probed_zones(&self) -> Vec<String> {
        self.calls_to(methods::DNS_ZONE)
            .into_iter()
            .filter_map(|c| c.params.get(2).and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    /// Records currently present, as (zone, record) pairs
    pub fn records(&self) -> Vec<(String, Value)> {
        self.inner.lock().unwrap().records.clone()
    }

    fn handle(&self, id: u64, method: &str, params: Vec<Value>) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall {
            id,
            method: method.to_string(),
            params: params.clone(),
        });

        if inner.fail_transport {
            return Err(Error::transport(
                "Metaname API call failed",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }

        let zone = params.get(2).and_then(Value::as_str).unwrap_or_default().to_string();
        if !inner.zones.contains(&zone) {
            return Err(api_error("Invalid domain name", -4));
        }

        match method {
            methods::DNS_ZONE => Ok(json!([])),
            methods::CREATE_DNS_RECORD => {
                if inner.fail_create {
                    return Err(api_error("Invalid record", -12));
                }
                let record = params.get(3).cloned().unwrap_or(Value::Null);
                inner.records.push((zone, record));
                Ok(json!(RECORD_REFERENCE))
            }
            methods::DELETE_DNS_RECORD => {
                if inner.fail_delete {
                    return Err(api_error("Record could not be deleted", -13));
                }
                if params.get(3) != Some(&json!(RECORD_REFERENCE)) || inner.records.is_empty() {
                    return Err(api_error("No such record", -14));
                }
                inner.records.clear();
                Ok(json!({}))
            }
            other => Err(api_error(&format!("Unknown method {other}"), -32601)),
        }
    }
}

fn api_error(message: &str, code: i64) -> Error {
    Error::Api(RpcError {
        message: message.to_string(),
        code,
        data: None,
    })
}

/// In-process transport with real id sequencing
pub struct FakeTransport {
    provider: FakeProvider,
    credentials: AccountCredentials,
    request_id: u64,
}

#[async_trait::async_trait]
impl RpcTransport for FakeTransport {
    async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value> {
        let mut full = vec![
            json!(self.credentials.account_reference()),
            json!(self.credentials.api_key()),
        ];
        full.extend(params);

        let outcome = self.provider.handle(self.request_id, method, full);
        if !matches!(outcome, Err(Error::Transport { .. })) {
            self.request_id += 1;
        }
        outcome
    }

    fn next_request_id(&self) -> u64 {
        self.request_id
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Factory counting how many transports it built
#[derive(Clone)]
pub struct FakeTransportFactory {
    provider: FakeProvider,
    created: Arc<AtomicUsize>,
}

impl FakeTransportFactory {
    pub fn new(provider: FakeProvider) -> Self {
        Self {
            provider,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of transports built so far
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl RpcTransportFactory for FakeTransportFactory {
    fn create(
        &self,
        credentials: &AccountCredentials,
        _config: &AuthenticatorConfig,
    ) -> Result<Box<dyn RpcTransport>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeTransport {
            provider: self.provider.clone(),
            credentials: credentials.clone(),
            request_id: 0,
        }))
    }
}

/// Credentials matching the constants above
pub fn test_credentials() -> AccountCredentials {
    AccountCredentials::new(ACCOUNT_REFERENCE, API_KEY)
}

/// A transport bound to `provider` with test credentials
pub fn transport_for(provider: &FakeProvider) -> Box<dyn RpcTransport> {
    FakeTransportFactory::new(provider.clone())
        .create(&test_credentials(), &AuthenticatorConfig::new("fake"))
        .expect("fake transport construction succeeds")
}
