//! Core traits for DNS-01 record automation
//!
//! - [`RpcTransport`]: Issue JSON-RPC calls against a provider API
//! - [`RpcTransportFactory`]: Build a transport once credentials are known

pub mod rpc_transport;

pub use rpc_transport::{RpcTransport, RpcTransportFactory};
