// ── Remote Accessor ──
//
// Issues Headscale REST requests, maps responses into domain types, and
// applies successful mutations to the cache. Holds no entity state of its
// own: everything it keeps lives in the shared `DataStore`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use scaledeck_api::{ApiTransport, endpoints};

use crate::convert::{
    extract_raw_prefix, map_api_key, map_entities, map_node, map_pre_auth_key, map_user,
};
use crate::error::{CoreError, MappingError};
use crate::model::{ApiKey, Node, PreAuthKey, User};
use crate::raw::{FieldAliases, envelope, envelope_item, envelope_list};
use crate::store::{Collection, DataStore};

// ── Request and result types ─────────────────────────────────────────

/// Narrow a user listing to a single user. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    fn query(&self) -> Result<(&'static str, String), CoreError> {
        let set: Vec<(&'static str, &String)> = [
            ("id", self.id.as_ref()),
            ("name", self.name.as_ref()),
            ("email", self.email.as_ref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();

        match set.as_slice() {
            [(key, value)] => Ok((*key, (*value).clone())),
            [] => Err(CoreError::contract("user filter must set one of id, name or email")),
            _ => Err(CoreError::contract(
                "user filter must set only one of id, name or email",
            )),
        }
    }
}

/// How an API key is addressed for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyRef {
    /// Numeric key id, sent as `?id=`.
    Id(u64),
    /// Prefix as displayed or raw; decoration is stripped before sending.
    Prefix(String),
}

impl From<u64> for ApiKeyRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ApiKeyRef {
    fn from(prefix: &str) -> Self {
        Self::Prefix(prefix.to_owned())
    }
}

impl From<String> for ApiKeyRef {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

impl fmt::Display for ApiKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Prefix(prefix) => write!(f, "prefix {prefix}"),
        }
    }
}

/// Result of a state-changing request.
///
/// Failures are reported, not propagated, so callers can update their
/// view either way.
#[derive(Debug)]
#[must_use]
pub enum MutationOutcome {
    Succeeded,
    Failed(CoreError),
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Self::Succeeded => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Self::Succeeded => Ok(()),
            Self::Failed(err) => Err(err),
        }
    }

    fn from_result(action: &str, result: Result<(), CoreError>) -> Self {
        match result {
            Ok(()) => Self::Succeeded,
            Err(err) => {
                warn!(error = %err, "{action} failed");
                Self::Failed(err)
            }
        }
    }
}

/// Server health as reported by `/api/v1/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub database_connectivity: bool,
}

// ── Accessor ─────────────────────────────────────────────────────────

/// Typed entry point to a Headscale server.
pub struct Accessor<T: ApiTransport> {
    transport: T,
    store: Arc<DataStore>,
}

impl<T: ApiTransport> Accessor<T> {
    pub fn new(transport: T, store: Arc<DataStore>) -> Self {
        Self { transport, store }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// List users, optionally narrowed by exactly one of id, name or email.
    pub async fn fetch_users(&self, filter: Option<&UserFilter>) -> Result<Vec<User>, CoreError> {
        let query = filter.map(UserFilter::query).transpose()?;
        let query: Vec<(&str, String)> = query.into_iter().collect();

        let payload = self.transport.get(endpoints::USER, &query).await?;
        let raw = list_envelope(&payload, &envelope::USERS, "Users")?;
        let batch = map_entities(raw, map_user);
        debug!(
            count = batch.entities.len(),
            rejected = batch.rejected.len(),
            "fetched users"
        );
        Ok(batch.entities)
    }

    pub async fn fetch_nodes(&self) -> Result<Vec<Node>, CoreError> {
        let payload = self.transport.get(endpoints::NODE, &[]).await?;
        let raw = list_envelope(&payload, &envelope::NODES, "Nodes")?;
        let batch = map_entities(raw, map_node);
        debug!(
            count = batch.entities.len(),
            rejected = batch.rejected.len(),
            "fetched nodes"
        );
        Ok(batch.entities)
    }

    pub async fn fetch_node(&self, id: &str) -> Result<Node, CoreError> {
        if id.is_empty() {
            return Err(CoreError::contract("node id must not be empty"));
        }
        let payload = self
            .transport
            .get(&format!("{}/{id}", endpoints::NODE), &[])
            .await?;
        let raw = envelope_item(&payload, &envelope::NODE)
            .ok_or(MappingError::missing("Node", "node"))?;
        Ok(map_node(raw)?)
    }

    /// The ACL policy document, returned as the server sent it.
    pub async fn fetch_policy(&self) -> Result<String, CoreError> {
        let payload = self.transport.get(endpoints::POLICY, &[]).await?;
        envelope_item(&payload, &envelope::POLICY)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| MappingError::missing("Policy", "policy").into())
    }

    pub async fn fetch_api_keys(&self) -> Result<Vec<ApiKey>, CoreError> {
        let payload = self.transport.get(endpoints::API_KEY, &[]).await?;
        let raw = list_envelope(&payload, &envelope::API_KEYS, "ApiKeys")?;
        let batch = map_entities(raw, map_api_key);
        debug!(
            count = batch.entities.len(),
            rejected = batch.rejected.len(),
            "fetched API keys"
        );
        Ok(batch.entities)
    }

    pub async fn fetch_health(&self) -> Result<Health, CoreError> {
        let payload = self.transport.get(endpoints::HEALTH, &[]).await?;
        let connectivity = envelope_item(&payload, &envelope::DATABASE_CONNECTIVITY)
            .ok_or(MappingError::missing("Health", "databaseConnectivity"))?;
        Ok(Health {
            database_connectivity: connectivity.as_bool().unwrap_or(false),
        })
    }

    /// Pre-auth keys for the given users, or for every user when `None`.
    ///
    /// One request per user runs concurrently; any failure fails the whole
    /// call. Results are merged in request order and a key id seen twice
    /// keeps its first occurrence.
    pub async fn fetch_pre_auth_keys(
        &self,
        user_ids: Option<&[String]>,
    ) -> Result<Vec<PreAuthKey>, CoreError> {
        let fetched_users = match user_ids {
            Some(_) => Vec::new(),
            None => self.fetch_users(None).await?,
        };
        let ids: Vec<&str> = match user_ids {
            Some(ids) => ids
                .iter()
                .map(String::as_str)
                .filter(|id| !id.is_empty())
                .collect(),
            None => fetched_users.iter().map(|u| u.id.as_str()).collect(),
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let requests = ids.iter().map(|&id| async move {
            let query = [("user", id.to_owned())];
            let payload = self.transport.get(endpoints::PRE_AUTH_KEY, &query).await?;
            Ok::<_, CoreError>((id, payload))
        });
        let responses = try_join_all(requests).await?;

        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for (user_id, payload) in &responses {
            let context = fetched_users
                .iter()
                .find(|u| u.id == *user_id)
                .cloned()
                .or_else(|| self.store.user_by_id(user_id).map(|u| (*u).clone()));
            let raw = list_envelope(payload, &envelope::PRE_AUTH_KEYS, "PreAuthKeys")?;
            let batch = map_entities(raw, |r| map_pre_auth_key(r, context.as_ref()));
            keys.extend(
                batch
                    .entities
                    .into_iter()
                    .filter(|k| seen.insert(k.id.clone())),
            );
        }
        debug!(users = ids.len(), count = keys.len(), "fetched pre-auth keys");
        Ok(keys)
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn delete_user(&self, user: &User) -> MutationOutcome {
        MutationOutcome::from_result("delete user", self.try_delete_user(user).await)
    }

    pub async fn delete_node(&self, node: &Node) -> MutationOutcome {
        MutationOutcome::from_result("delete node", self.try_delete_node(node).await)
    }

    /// Delete an API key by numeric id or by (possibly decorated) prefix.
    pub async fn delete_api_key(&self, key: impl Into<ApiKeyRef>) -> MutationOutcome {
        let key = key.into();
        MutationOutcome::from_result("delete API key", self.try_delete_api_key(&key).await)
    }

    /// Expire an API key. Accepts a full key (`prefix.secret`) or a prefix.
    pub async fn expire_api_key(&self, key: &str) -> MutationOutcome {
        MutationOutcome::from_result("expire API key", self.try_expire_api_key(key).await)
    }

    async fn try_delete_user(&self, user: &User) -> Result<(), CoreError> {
        if user.id.is_empty() {
            return Err(CoreError::contract("user id must not be empty"));
        }
        self.transport
            .delete(&format!("{}/{}", endpoints::USER, user.id), &[])
            .await?;
        self.store.remove_by_id(Collection::Users, &user.id);
        info!(user = %user.name, "deleted user");
        Ok(())
    }

    async fn try_delete_node(&self, node: &Node) -> Result<(), CoreError> {
        if node.id.is_empty() {
            return Err(CoreError::contract("node id must not be empty"));
        }
        self.transport
            .delete(&format!("{}/{}", endpoints::NODE, node.id), &[])
            .await?;
        self.store.remove_by_id(Collection::Nodes, &node.id);
        info!(node = %node.name, "deleted node");
        Ok(())
    }

    async fn try_delete_api_key(&self, key: &ApiKeyRef) -> Result<(), CoreError> {
        match key {
            ApiKeyRef::Id(id) => {
                let id = id.to_string();
                self.transport
                    .delete(endpoints::API_KEY, &[("id", id.clone())])
                    .await?;
                self.store.remove_api_keys_matching(Some(&id), None);
            }
            ApiKeyRef::Prefix(prefix) => {
                let raw = extract_raw_prefix(prefix);
                if raw.is_empty() {
                    return Err(CoreError::contract("API key prefix must not be empty"));
                }
                self.transport
                    .delete(&format!("{}/{raw}", endpoints::API_KEY), &[])
                    .await?;
                self.store.remove_api_keys_matching(None, Some(raw));
            }
        }
        info!(key = %key, "deleted API key");
        Ok(())
    }

    async fn try_expire_api_key(&self, key: &str) -> Result<(), CoreError> {
        let head = key.split('.').next().unwrap_or_default();
        let raw = extract_raw_prefix(head);
        if raw.is_empty() {
            return Err(CoreError::contract("API key prefix must not be empty"));
        }
        self.transport
            .post(endpoints::API_KEY_EXPIRE, &json!({ "prefix": raw }))
            .await?;
        info!(prefix = raw, "expired API key");
        Ok(())
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch all users and replace the cached collection. Returns the count.
    pub async fn refresh_users(&self) -> Result<usize, CoreError> {
        let users = self.fetch_users(None).await?;
        let count = users.len();
        self.store.replace_users(users);
        self.store.mark_refreshed();
        Ok(count)
    }

    pub async fn refresh_nodes(&self) -> Result<usize, CoreError> {
        let nodes = self.fetch_nodes().await?;
        let count = nodes.len();
        self.store.replace_nodes(nodes);
        self.store.mark_refreshed();
        Ok(count)
    }

    /// Refresh pre-auth keys for the cached users, or for all users when
    /// the user cache is empty.
    pub async fn refresh_pre_auth_keys(&self) -> Result<usize, CoreError> {
        let cached: Vec<String> = self
            .store
            .users_snapshot()
            .iter()
            .map(|u| u.id.clone())
            .collect();
        let ids = (!cached.is_empty()).then_some(cached.as_slice());
        let keys = self.fetch_pre_auth_keys(ids).await?;
        let count = keys.len();
        self.store.replace_pre_auth_keys(keys);
        self.store.mark_refreshed();
        Ok(count)
    }

    pub async fn refresh_api_keys(&self) -> Result<usize, CoreError> {
        let keys = self.fetch_api_keys().await?;
        let count = keys.len();
        self.store.replace_api_keys(keys);
        self.store.mark_refreshed();
        Ok(count)
    }

    /// Refresh every collection, users first so pre-auth keys resolve
    /// their owners from the fresh user list.
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        let users = self.refresh_users().await?;
        let nodes = self.refresh_nodes().await?;
        let pre_auth_keys = self.refresh_pre_auth_keys().await?;
        let api_keys = self.refresh_api_keys().await?;
        info!(users, nodes, pre_auth_keys, api_keys, "refresh complete");
        Ok(())
    }
}

/// Unwrap a list envelope. A missing or non-array envelope is a shape
/// failure, not an empty list.
fn list_envelope<'a>(
    payload: &'a Value,
    field: &FieldAliases,
    entity: &'static str,
) -> Result<&'a [Value], MappingError> {
    envelope_list(payload, field).ok_or(MappingError::missing(entity, field.current))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{FakeTransport, accessor, api_key, user};

    // ── Users ──

    #[tokio::test]
    async fn fetch_users_sends_single_filter() {
        let acc = accessor(FakeTransport::new().respond(
            "/api/v1/user?name=alice",
            json!({ "users": [{ "id": "1", "name": "alice" }] }),
        ));

        let users = acc
            .fetch_users(Some(&UserFilter::by_name("alice")))
            .await
            .unwrap();
        assert_eq!(users, vec![user("1", "alice")]);
    }

    #[tokio::test]
    async fn user_filter_with_two_fields_sends_nothing() {
        let acc = accessor(FakeTransport::new());
        let filter = UserFilter {
            id: Some("1".into()),
            name: Some("alice".into()),
            email: None,
        };

        let err = acc.fetch_users(Some(&filter)).await.unwrap_err();
        assert!(matches!(err, CoreError::ContractViolation { .. }));

        let err = acc
            .fetch_users(Some(&UserFilter::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ContractViolation { .. }));
        assert!(acc.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn missing_list_envelope_is_mapping_error() {
        let acc = accessor(
            FakeTransport::new()
                .respond("/api/v1/node", json!({}))
                .respond("/api/v1/apikey", json!({ "apiKeys": "none" })),
        );
        let err = acc.fetch_nodes().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Mapping(MappingError { entity: "Nodes", field: "nodes" })
        ));
        let err = acc.fetch_api_keys().await.unwrap_err();
        assert!(matches!(err, CoreError::Mapping(_)));
    }

    #[tokio::test]
    async fn empty_list_envelope_is_empty() {
        let acc = accessor(FakeTransport::new().respond("/api/v1/node", json!({ "nodes": [] })));
        assert!(acc.fetch_nodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_refresh_keeps_cached_users() {
        let acc = accessor(
            FakeTransport::new().respond("/api/v1/user", json!({ "message": "oops" })),
        );
        acc.store().replace_users(vec![user("1", "alice")]);

        let err = acc.refresh_users().await.unwrap_err();
        assert!(matches!(err, CoreError::Mapping(_)));
        assert_eq!(acc.store().count(Collection::Users), 1);
        assert!(acc.store().last_refresh().is_none());
    }

    #[tokio::test]
    async fn pre_auth_keys_without_envelope_fail_whole_call() {
        let acc = accessor(
            FakeTransport::new()
                .respond("/api/v1/preauthkey?user=1", json!({ "preAuthKeys": [] }))
                .respond("/api/v1/preauthkey?user=2", json!({})),
        );
        let ids = vec!["1".to_owned(), "2".to_owned()];
        let err = acc.fetch_pre_auth_keys(Some(&ids)).await.unwrap_err();
        assert!(matches!(err, CoreError::Mapping(_)));
    }

    #[tokio::test]
    async fn fetch_node_without_envelope_is_mapping_error() {
        let acc = accessor(FakeTransport::new().respond("/api/v1/node/3", json!({})));
        let err = acc.fetch_node("3").await.unwrap_err();
        assert!(matches!(err, CoreError::Mapping(_)));
    }

    #[tokio::test]
    async fn fetch_policy_and_health() {
        let acc = accessor(
            FakeTransport::new()
                .respond("/api/v1/policy", json!({ "policy": "{\"acls\":[]}" }))
                .respond(
                    "/api/v1/health",
                    json!({ "database_connectivity": true }),
                ),
        );
        assert_eq!(acc.fetch_policy().await.unwrap(), "{\"acls\":[]}");
        assert!(acc.fetch_health().await.unwrap().database_connectivity);
    }

    // ── Pre-auth keys ──

    #[tokio::test]
    async fn pre_auth_keys_merge_in_request_order_and_dedup() {
        let acc = accessor(
            FakeTransport::new()
                .respond(
                    "/api/v1/preauthkey?user=1",
                    json!({ "preAuthKeys": [
                        { "id": "a", "key": "k-a" },
                        { "id": "shared", "key": "k-s1" }
                    ] }),
                )
                .respond(
                    "/api/v1/preauthkey?user=2",
                    json!({ "pre_auth_keys": [
                        { "id": "shared", "key": "k-s2" },
                        { "id": "b", "key": "k-b" }
                    ] }),
                ),
        );
        acc.store()
            .replace_users(vec![user("1", "alice"), user("2", "bob")]);

        let ids = vec!["1".to_owned(), String::new(), "2".to_owned()];
        let keys = acc.fetch_pre_auth_keys(Some(&ids)).await.unwrap();

        let got: Vec<(&str, &str, &str)> = keys
            .iter()
            .map(|k| (k.id.as_str(), k.key.as_str(), k.user.name.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("a", "k-a", "alice"),
                ("shared", "k-s1", "alice"),
                ("b", "k-b", "bob"),
            ]
        );
        assert_eq!(acc.transport().calls().len(), 2);
    }

    #[tokio::test]
    async fn pre_auth_keys_fetch_users_when_no_ids_given() {
        let acc = accessor(
            FakeTransport::new()
                .respond(
                    "/api/v1/user",
                    json!({ "users": [{ "id": "1", "name": "alice" }] }),
                )
                .respond(
                    "/api/v1/preauthkey?user=1",
                    json!({ "preAuthKeys": [{ "id": "a", "key": "k" }] }),
                ),
        );

        let keys = acc.fetch_pre_auth_keys(None).await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].user.name, "alice");
    }

    #[tokio::test]
    async fn pre_auth_key_failure_fails_whole_call() {
        let acc = accessor(FakeTransport::new().respond(
            "/api/v1/preauthkey?user=1",
            json!({ "preAuthKeys": [] }),
        ));
        let ids = vec!["1".to_owned(), "2".to_owned()];
        let err = acc.fetch_pre_auth_keys(Some(&ids)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn only_empty_ids_send_nothing() {
        let acc = accessor(FakeTransport::new());
        let ids = vec![String::new()];
        assert!(acc.fetch_pre_auth_keys(Some(&ids)).await.unwrap().is_empty());
        assert!(acc.transport().calls().is_empty());
    }

    // ── Mutations ──

    #[tokio::test]
    async fn delete_api_key_by_id_uses_query() {
        let acc = accessor(FakeTransport::new().respond("/api/v1/apikey?id=42", json!({})));
        acc.store().replace_api_keys(vec![
            api_key("42", "hskey-api-AAAAAAAAAAAA-***"),
            api_key("43", "hskey-api-BBBBBBBBBBBB-***"),
        ]);

        assert!(acc.delete_api_key(42_u64).await.is_success());

        let calls = acc.transport().calls();
        assert_eq!(calls[0].method, "DELETE");
        assert_eq!(calls[0].path, "/api/v1/apikey");
        assert_eq!(calls[0].query, vec![("id".to_owned(), "42".to_owned())]);
        assert_eq!(acc.store().count(Collection::ApiKeys), 1);
    }

    #[tokio::test]
    async fn delete_api_key_by_prefix_uses_raw_prefix_path() {
        let acc = accessor(
            FakeTransport::new().respond("/api/v1/apikey/AbCdEf012345", json!({})),
        );
        acc.store()
            .replace_api_keys(vec![api_key("1", "hskey-api-AbCdEf012345-***")]);

        let outcome = acc.delete_api_key("hskey-api-AbCdEf012345-***").await;
        assert!(outcome.is_success());
        assert_eq!(acc.transport().calls()[0].path, "/api/v1/apikey/AbCdEf012345");
        assert!(acc.store().api_keys_snapshot().is_empty());
    }

    #[tokio::test]
    async fn expire_api_key_strips_secret_and_decoration() {
        let acc = accessor(FakeTransport::new().respond("/api/v1/apikey/expire", json!({})));

        let outcome = acc.expire_api_key("hskey-api-AbCdEf012345-***.secret").await;
        assert!(outcome.is_success());
        assert_eq!(
            acc.transport().calls()[0].body,
            Some(json!({ "prefix": "AbCdEf012345" }))
        );
    }

    #[tokio::test]
    async fn expire_empty_prefix_fails_without_request() {
        let acc = accessor(FakeTransport::new());
        let outcome = acc.expire_api_key(".secret").await;
        assert!(matches!(
            outcome.error(),
            Some(CoreError::ContractViolation { .. })
        ));
        assert!(acc.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn delete_user_removes_from_cache() {
        let acc = accessor(FakeTransport::new().respond("/api/v1/user/1", json!({})));
        acc.store()
            .replace_users(vec![user("1", "alice"), user("2", "bob")]);

        assert!(acc.delete_user(&user("1", "alice")).await.is_success());
        assert!(acc.store().user_by_id("1").is_none());
        assert_eq!(acc.store().count(Collection::Users), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_cache_and_reports_unauthorized() {
        let mut transport = FakeTransport::new();
        transport.unauthorized = true;
        let acc = accessor(transport);
        let node = map_node(&json!({ "id": "5", "user": { "id": "1" } })).unwrap();
        acc.store().replace_nodes(vec![node.clone()]);

        let outcome = acc.delete_node(&node).await;
        assert!(outcome.error().unwrap().is_unauthorized());
        assert_eq!(acc.store().count(Collection::Nodes), 1);
    }

    // ── Refresh ──

    #[tokio::test]
    async fn refresh_all_populates_store() {
        let acc = accessor(
            FakeTransport::new()
                .respond(
                    "/api/v1/user",
                    json!({ "users": [{ "id": "1", "name": "alice" }] }),
                )
                .respond(
                    "/api/v1/node",
                    json!({ "nodes": [{ "id": "5", "user": { "id": "1", "name": "alice" } }] }),
                )
                .respond(
                    "/api/v1/preauthkey?user=1",
                    json!({ "preAuthKeys": [{ "id": "a", "key": "k" }] }),
                )
                .respond(
                    "/api/v1/apikey",
                    json!({ "apiKeys": [{ "id": "1", "prefix": "AbCdEf7***" }] }),
                ),
        );

        acc.refresh_all().await.unwrap();
        let store = acc.store();
        assert_eq!(store.count(Collection::Users), 1);
        assert_eq!(store.count(Collection::Nodes), 1);
        assert_eq!(store.count(Collection::PreAuthKeys), 1);
        assert_eq!(store.count(Collection::ApiKeys), 1);
        assert!(store.last_refresh().is_some());
    }
}
