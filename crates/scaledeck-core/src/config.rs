// ── Runtime connection configuration ──
//
// Describes *how* to reach a Headscale server. Carries the credential and
// connection tuning, but never touches disk. The CLI constructs a
// `ConsoleConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single Headscale server.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Server root URL (e.g., `https://headscale.example.com`).
    pub url: Url,
    /// API key created with `headscale apikeys create`.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            url,
            api_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
