// ── Console facade ──
//
// Wires a `HeadscaleClient` and a fresh `DataStore` into an `Accessor`.
// This is the entry point the CLI uses; tests can build an `Accessor`
// over any `ApiTransport` directly.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::debug;

use scaledeck_api::{HeadscaleClient, TlsMode, TransportConfig};

use crate::accessor::Accessor;
use crate::config::{ConsoleConfig, TlsVerification};
use crate::error::CoreError;
use crate::export::Exporter;
use crate::store::DataStore;

/// A connection to one Headscale server plus its cache.
pub struct Console {
    accessor: Accessor<HeadscaleClient>,
}

impl Console {
    /// Build the HTTP client for `config`. No request is sent.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
        };
        let client =
            HeadscaleClient::from_api_key(config.url.as_str(), &config.api_key, &transport)?;
        let preview: String = config.api_key.expose_secret().chars().take(8).collect();
        debug!(url = %config.url, key = %format_args!("{preview}…"), "console ready");

        Ok(Self {
            accessor: Accessor::new(client, Arc::new(DataStore::new())),
        })
    }

    pub fn accessor(&self) -> &Accessor<HeadscaleClient> {
        &self.accessor
    }

    pub fn store(&self) -> &Arc<DataStore> {
        self.accessor.store()
    }

    pub fn exporter(&self) -> Exporter<'_, HeadscaleClient> {
        Exporter::new(&self.accessor)
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
