// ── Central data store ──
//
// Holds the cached users, nodes, pre-auth keys and API keys. There is no
// global instance: each console (or test) owns an `Arc<DataStore>`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::Collection;
use super::collection::EntityCollection;
use crate::convert::extract_raw_prefix;
use crate::model::{ApiKey, Node, PreAuthKey, User};

/// In-memory cache for all Headscale entities.
///
/// Readers take cheap `Arc` snapshots; writers replace or filter whole
/// collections. Last write wins.
pub struct DataStore {
    pub(crate) users: EntityCollection<User>,
    pub(crate) nodes: EntityCollection<Node>,
    pub(crate) pre_auth_keys: EntityCollection<PreAuthKey>,
    pub(crate) api_keys: EntityCollection<ApiKey>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);

        Self {
            users: EntityCollection::new(),
            nodes: EntityCollection::new(),
            pre_auth_keys: EntityCollection::new(),
            api_keys: EntityCollection::new(),
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn nodes_snapshot(&self) -> Arc<Vec<Arc<Node>>> {
        self.nodes.snapshot()
    }

    pub fn pre_auth_keys_snapshot(&self) -> Arc<Vec<Arc<PreAuthKey>>> {
        self.pre_auth_keys.snapshot()
    }

    pub fn api_keys_snapshot(&self) -> Arc<Vec<Arc<ApiKey>>> {
        self.api_keys.snapshot()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn user_by_id(&self, id: &str) -> Option<Arc<User>> {
        self.users.get_by_id(id)
    }

    pub fn node_by_id(&self, id: &str) -> Option<Arc<Node>> {
        self.nodes.get_by_id(id)
    }

    /// Number of cached entities in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Users => self.users.len(),
            Collection::Nodes => self.nodes.len(),
            Collection::PreAuthKeys => self.pre_auth_keys.len(),
            Collection::ApiKeys => self.api_keys.len(),
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub fn replace_users(&self, users: Vec<User>) {
        self.users.replace_all(users);
    }

    pub fn replace_nodes(&self, nodes: Vec<Node>) {
        self.nodes.replace_all(nodes);
    }

    pub fn replace_pre_auth_keys(&self, keys: Vec<PreAuthKey>) {
        self.pre_auth_keys.replace_all(keys);
    }

    pub fn replace_api_keys(&self, keys: Vec<ApiKey>) {
        self.api_keys.replace_all(keys);
    }

    /// Remove one entity by cache key. Removing a missing id is a no-op.
    pub fn remove_by_id(&self, collection: Collection, id: &str) -> bool {
        match collection {
            Collection::Users => self.users.remove_by_id(id),
            Collection::Nodes => self.nodes.remove_by_id(id),
            Collection::PreAuthKeys => self.pre_auth_keys.remove_by_id(id),
            Collection::ApiKeys => self.api_keys.remove_by_id(id),
        }
    }

    /// Remove every cached API key whose id or undecorated prefix matches.
    pub(crate) fn remove_api_keys_matching(
        &self,
        id: Option<&str>,
        raw_prefix: Option<&str>,
    ) -> bool {
        self.api_keys.remove_where(|key| {
            id.is_some_and(|id| key.id.as_deref() == Some(id))
                || raw_prefix.is_some_and(|p| extract_raw_prefix(&key.prefix) == p)
        })
    }

    pub(crate) fn mark_refreshed(&self) {
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
