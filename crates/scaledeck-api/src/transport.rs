// Shared transport configuration and the request seam used by scaledeck-core.
//
// `TransportConfig` builds the `reqwest::Client` (TLS, timeout, default
// headers). `ApiTransport` is the narrow get/post/delete surface the core
// talks to, so it can run against a real server or an in-memory fake.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed servers).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by `HeadscaleClient` to inject the `Authorization: Bearer` header.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("scaledeck/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Request surface consumed by the data layer.
///
/// Implementations handle auth headers and base-URL resolution, and turn
/// every non-2xx response into an [`Error`] carrying the HTTP status.
/// Paths are server-root relative (e.g. `"/api/v1/node"`).
pub trait ApiTransport: Send + Sync {
    /// `GET path?query`, returning the parsed JSON payload.
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// `POST path` with a JSON body, returning the parsed JSON payload.
    fn post(&self, path: &str, body: &Value) -> impl Future<Output = Result<Value, Error>> + Send;

    /// `DELETE path?query`. The response body is discarded.
    fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// The server root this transport talks to.
    fn base_url(&self) -> &Url;
}
