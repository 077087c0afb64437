// ── API key domain type ──

use serde::{Deserialize, Serialize};

/// An API key as listed by the server.
///
/// The full key is only shown once at creation; afterwards `prefix` is
/// the stable handle used for expiry and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Decorated prefix as returned by the server, e.g.
    /// `hskey-api-AbCdEf012345-***` or `AbCdEf7***`.
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub expiration: String,
}
