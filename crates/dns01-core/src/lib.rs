// # dns01-core
//
// Core library for DNS-01 challenge automation against JSON-RPC DNS APIs.
//
// ## Architecture Overview
//
// - **RpcTransport**: Trait for calling a provider's JSON-RPC API
// - **zone**: Probe-based discovery of the zone owning a validation hostname
// - **Authenticator**: Creates and removes the challenge TXT record
// - **TransportRegistry**: Plugin-based registry of transport factories
//
// ## Control Flow
//
// Authenticator → zone resolver → RpcTransport → network
//
// The embedding ACME client calls `Authenticator::perform`, waits for the
// propagation delay, lets the CA validate, then calls `Authenticator::cleanup`.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod rpc;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use authenticator::{Authenticator, ChallengeState};
pub use config::{AccountCredentials, AuthenticatorConfig};
pub use error::{Error, Result};
pub use record::{DnsRecordSpec, RecordHandle};
pub use registry::TransportRegistry;
pub use rpc::{RpcError, RpcRequest, RpcResponse};
pub use traits::{RpcTransport, RpcTransportFactory};
pub use zone::{resolve_zone, zone_candidates};
