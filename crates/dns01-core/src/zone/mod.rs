//! Zone resolution
//!
//! The provider offers no way to list the zones an account owns, so the
//! owning zone of a validation hostname is found by probing candidate
//! suffixes with `dns_zone`, most specific first. The first probe that
//! succeeds names the zone.
//!
//! ```text
//! _acme-challenge.a.b.example.com
//!                 └─ a.b.example.com   probe 1
//!                    └─ b.example.com  probe 2
//!                       └─ example.com probe 3
//! ```

use crate::error::{Error, Result};
use crate::rpc::methods;
use crate::traits::RpcTransport;
use serde_json::Value;
use tracing::{debug, warn};

/// Leading label of every DNS-01 validation hostname
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// Candidate zone names for a validation hostname, longest first
///
/// The trailing dot and the first label are removed, then one leading
/// label is dropped per candidate. Single-label names are never
/// candidates.
pub fn zone_candidates(validation_hostname: &str) -> Vec<String> {
    let hostname = validation_hostname.trim_end_matches('.');

    let Some((prefix, rest)) = hostname.split_once('.') else {
        return Vec::new();
    };
    if prefix != ACME_CHALLENGE_LABEL {
        warn!(
            "Validation hostname {} does not start with {}; stripping '{}' anyway",
            validation_hostname, ACME_CHALLENGE_LABEL, prefix
        );
    }

    let labels: Vec<&str> = rest.split('.').collect();
    if labels.iter().any(|label| label.is_empty()) {
        return Vec::new();
    }

    (0..labels.len().saturating_sub(1))
        .map(|start| labels[start..].join("."))
        .collect()
}

/// Find the zone owning `validation_hostname`
///
/// Any probe failure counts as "not this zone" and the next candidate is
/// tried. Probing stops at the first success.
///
/// # Errors
///
/// [`Error::ZoneNotFound`] naming `validation_hostname` once every
/// candidate has been rejected.
pub async fn resolve_zone(
    transport: &mut dyn RpcTransport,
    validation_hostname: &str,
) -> Result<String> {
    for candidate in zone_candidates(validation_hostname) {
        debug!("Probing {} zone: {}", transport.provider_name(), candidate);

        match transport
            .call(methods::DNS_ZONE, vec![Value::String(candidate.clone())])
            .await
        {
            Ok(_) => {
                debug!("Found zone {} for {}", candidate, validation_hostname);
                return Ok(candidate);
            }
            Err(e) => {
                debug!("{} is not a usable zone: {}", candidate, e);
            }
        }
    }

    Err(Error::zone_not_found(validation_hostname))
}
