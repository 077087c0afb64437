// ── Node domain type ──

use serde::{Deserialize, Serialize};

use super::user::User;

/// A machine registered with the coordination server.
///
/// The owning [`User`] is embedded by value at fetch time. Renaming the
/// user later does not touch previously fetched nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub given_name: String,
    pub user: User,
    pub ip_addresses: Vec<String>,
    pub online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Raw enum name, e.g. `REGISTER_METHOD_AUTH_KEY`.
    pub register_method: String,
    pub tags: Vec<String>,
    pub approved_routes: Vec<String>,
    pub available_routes: Vec<String>,
    pub subnet_routes: Vec<String>,
}

impl Node {
    /// Short label for the registration method (`authkey`, `cli`, `oidc`).
    pub fn register_method_label(&self) -> &str {
        match self.register_method.as_str() {
            "REGISTER_METHOD_AUTH_KEY" => "authkey",
            "REGISTER_METHOD_CLI" => "cli",
            "REGISTER_METHOD_OIDC" => "oidc",
            "" | "REGISTER_METHOD_UNSPECIFIED" => "unspecified",
            other => other,
        }
    }

    /// Routes the node advertises that are still awaiting approval.
    pub fn pending_routes(&self) -> impl Iterator<Item = &str> {
        self.available_routes
            .iter()
            .filter(|r| !self.approved_routes.contains(r))
            .map(String::as_str)
    }
}
