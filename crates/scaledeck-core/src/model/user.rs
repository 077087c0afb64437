// ── User domain type ──

use serde::{Deserialize, Serialize};

/// A Headscale user (namespace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: String,
    /// Identity provider (`"oidc"` for OIDC users, empty for local users).
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    /// Display name if set, otherwise the login name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}
