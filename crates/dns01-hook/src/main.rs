// # dns01-hook - ACME manual hook
//
// A THIN integration layer between an ACME client's manual hooks and
// dns01-core. All record and zone logic lives in dns01-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering transports
// 4. Running one lifecycle phase (perform or cleanup)
//
// ## Usage
//
// ```bash
// certbot certonly --manual --preferred-challenges dns \
//     --manual-auth-hook "dns01-hook perform" \
//     --manual-cleanup-hook "dns01-hook cleanup" \
//     -d example.com
// ```
//
// ## Configuration
//
// ### Challenge (set by the ACME client)
// - `CERTBOT_DOMAIN`: Domain being validated
// - `CERTBOT_VALIDATION`: TXT record content
// - `CERTBOT_AUTH_OUTPUT`: Output of the perform phase (cleanup only)
//
// ### Provider
// - `DNS01_PROVIDER`: Provider type (default: metaname)
// - `METANAME_ACCOUNT_REFERENCE`: Four character account reference
// - `METANAME_API_KEY`: API key
// - `METANAME_ENDPOINT`: API endpoint (optional)
//
// ### Behaviour
// - `DNS01_PROPAGATION_SECONDS`: Wait after perform (default: 10)
// - `DNS01_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// perform prints the record handle on stdout; the ACME client hands it back
// to cleanup as CERTBOT_AUTH_OUTPUT. Logs go to stderr.

use anyhow::{Context, Result};
use dns01_core::{AccountCredentials, Authenticator, AuthenticatorConfig, RecordHandle};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookExitCode {
    /// Phase completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The perform or cleanup operation failed
    OperationError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Lifecycle phase requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Perform,
    Cleanup,
}

impl Phase {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            Some("perform") | Some("auth") => Ok(Phase::Perform),
            Some("cleanup") => Ok(Phase::Cleanup),
            Some(other) => anyhow::bail!(
                "Unknown phase '{}'. Usage: dns01-hook <perform|cleanup>",
                other
            ),
            None => anyhow::bail!("Missing phase. Usage: dns01-hook <perform|cleanup>"),
        }
    }
}

/// Application configuration
struct Config {
    phase: Phase,
    domain: String,
    validation: String,
    auth_output: Option<String>,
    provider: String,
    account_reference: String,
    api_key: String,
    endpoint: Option<String>,
    propagation_seconds: u64,
    request_timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env(phase: Option<&str>) -> Result<Self> {
        Self::from_lookup(phase, |key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    fn from_lookup(phase: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} is required", key))
        };
        let number = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds. Got: {}", key, v)),
                None => Ok(default),
            }
        };

        Ok(Self {
            phase: Phase::parse(phase)?,
            domain: required("CERTBOT_DOMAIN")?,
            validation: required("CERTBOT_VALIDATION")?,
            auth_output: lookup("CERTBOT_AUTH_OUTPUT"),
            provider: lookup("DNS01_PROVIDER").unwrap_or_else(|| "metaname".to_string()),
            account_reference: required("METANAME_ACCOUNT_REFERENCE")?,
            api_key: required("METANAME_API_KEY")?,
            endpoint: lookup("METANAME_ENDPOINT").filter(|v| !v.is_empty()),
            propagation_seconds: number("DNS01_PROPAGATION_SECONDS", 10)?,
            request_timeout_secs: number("DNS01_REQUEST_TIMEOUT_SECS", 30)?,
            log_level: lookup("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let token_lower = self.api_key.to_lowercase();
        if token_lower.contains("your_api_key") || token_lower.contains("replace_me") {
            anyhow::bail!(
                "METANAME_API_KEY appears to be a placeholder. \
                Use an actual API key from your Metaname account."
            );
        }

        if self.propagation_seconds > 3600 {
            anyhow::bail!(
                "DNS01_PROPAGATION_SECONDS must be at most 3600 seconds. Got: {}",
                self.propagation_seconds
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.credentials().validate()?;
        self.authenticator_config().validate()?;
        Ok(())
    }

    fn credentials(&self) -> AccountCredentials {
        AccountCredentials::new(&self.account_reference, &self.api_key)
    }

    fn authenticator_config(&self) -> AuthenticatorConfig {
        let mut config = AuthenticatorConfig::new(&self.provider)
            .with_propagation_seconds(self.propagation_seconds)
            .with_request_timeout_secs(self.request_timeout_secs);
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        config
    }

    /// Domain without a wildcard label
    fn base_domain(&self) -> &str {
        let domain = self.domain.trim_end_matches('.');
        domain.strip_prefix("*.").unwrap_or(domain)
    }

    /// Name the CA looks up for the TXT record
    fn validation_hostname(&self) -> String {
        format!("{}.{}", dns01_core::zone::ACME_CHALLENGE_LABEL, self.base_domain())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Record handle from the perform phase's output
///
/// The ACME client captures everything perform wrote to stdout; the handle
/// is the last non-empty line.
fn parse_auth_output(output: &str) -> Result<Option<RecordHandle>> {
    let Some(line) = output.lines().map(str::trim).rfind(|l| !l.is_empty()) else {
        return Ok(None);
    };
    let handle = serde_json::from_str(line)
        .with_context(|| format!("CERTBOT_AUTH_OUTPUT is not a record handle: {}", line))?;
    Ok(Some(handle))
}

fn main() -> ExitCode {
    let phase = env::args().nth(1);

    // Load configuration from environment
    let config = match Config::from_env(phase.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return HookExitCode::ConfigError.into();
    }

    // stdout is reserved for the record handle
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::OperationError.into();
        }
    };

    rt.block_on(async {
        match run_hook(config).await {
            Ok(()) => HookExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                exit_code_for(&e)
            }
        }
    })
    .into()
}

/// Configuration problems surfaced by the library still exit as such
fn exit_code_for(err: &anyhow::Error) -> HookExitCode {
    match err.downcast_ref::<dns01_core::Error>() {
        Some(dns01_core::Error::Configuration(_)) => HookExitCode::ConfigError,
        _ => HookExitCode::OperationError,
    }
}

/// Register every transport compiled into this binary
fn registry() -> dns01_core::TransportRegistry {
    let registry = dns01_core::TransportRegistry::new();

    #[cfg(feature = "metaname")]
    dns01_provider_metaname::register(&registry);

    registry
}

/// Run one lifecycle phase
async fn run_hook(config: Config) -> Result<()> {
    let registry = registry();
    let mut authenticator = Authenticator::from_registry(&registry, config.authenticator_config())?;
    authenticator.set_credentials(config.credentials());

    let domain = config.base_domain().to_string();
    let hostname = config.validation_hostname();
    info!("{}", authenticator.description());

    match config.phase {
        Phase::Perform => {
            let handle = authenticator
                .perform(&domain, &hostname, &config.validation)
                .await?;
            println!("{}", serde_json::to_string(&handle)?);

            let delay = authenticator.propagation_delay();
            if !delay.is_zero() {
                info!("Waiting {:?} for DNS propagation", delay);
                tokio::time::sleep(delay).await;
            }
        }
        Phase::Cleanup => {
            match config.auth_output.as_deref().map(parse_auth_output).transpose()? {
                Some(Some(handle)) => authenticator.restore_record_handle(handle),
                _ => warn!("CERTBOT_AUTH_OUTPUT is empty; no record handle to clean up"),
            }
            authenticator
                .cleanup(&domain, &hostname, &config.validation)
                .await?;
        }
    }

    Ok(())
}
