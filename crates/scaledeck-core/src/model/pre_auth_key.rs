// ── Pre-authentication key domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::User;

/// Characters of `key` that may appear in logs and debug output.
pub const KEY_PREVIEW_LEN: usize = 8;

/// A key that lets a machine join the mesh without interactive login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAuthKey {
    pub user: User,
    pub id: String,
    /// Secret material. Only [`PreAuthKey::key_preview`] may be logged.
    pub key: String,
    pub reusable: bool,
    pub ephemeral: bool,
    pub used: bool,
    pub expiration: String,
    pub created_at: String,
    pub acl_tags: Vec<String>,
}

impl PreAuthKey {
    /// The loggable head of the key.
    pub fn key_preview(&self) -> &str {
        let end = self
            .key
            .char_indices()
            .nth(KEY_PREVIEW_LEN)
            .map_or(self.key.len(), |(i, _)| i);
        &self.key[..end]
    }

    /// Keys from servers that predate masked `hskey-auth-` keys come back in full.
    pub fn is_legacy_format(&self) -> bool {
        !self.key.contains('*') && !self.key.starts_with("hskey-auth-")
    }
}

impl fmt::Debug for PreAuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreAuthKey")
            .field("id", &self.id)
            .field("user", &self.user.name)
            .field("key", &format_args!("{}…", self.key_preview()))
            .field("reusable", &self.reusable)
            .field("ephemeral", &self.ephemeral)
            .field("used", &self.used)
            .field("expiration", &self.expiration)
            .field("created_at", &self.created_at)
            .field("acl_tags", &self.acl_tags)
            .finish()
    }
}
