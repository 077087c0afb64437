// ── Flattening for tabular export ──
//
// Projects nested domain types onto flat rows: lists collapse to a
// `"; "`-joined string and an owning user collapses to its name.

use serde_json::Value;

use super::csv::FlatRecord;
use crate::model::{ApiKey, Node, PreAuthKey, User};

const LIST_DELIMITER: &str = "; ";

fn row<const N: usize>(pairs: [(&str, Value); N]) -> FlatRecord {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

fn text(s: &str) -> Value {
    Value::String(s.to_owned())
}

fn optional(s: Option<&str>) -> Value {
    text(s.unwrap_or_default())
}

fn list(items: &[String]) -> Value {
    Value::String(items.join(LIST_DELIMITER))
}

pub fn flatten_user(user: &User) -> FlatRecord {
    row([
        ("id", text(&user.id)),
        ("name", text(&user.name)),
        ("displayName", optional(user.display_name.as_deref())),
        ("email", text(&user.email)),
        ("createdAt", text(&user.created_at)),
        ("provider", text(&user.provider)),
        ("providerId", text(&user.provider_id)),
    ])
}

pub fn flatten_node(node: &Node) -> FlatRecord {
    row([
        ("id", text(&node.id)),
        ("name", text(&node.name)),
        ("givenName", text(&node.given_name)),
        ("user", text(&node.user.name)),
        ("ipAddresses", list(&node.ip_addresses)),
        ("online", Value::Bool(node.online)),
        ("lastSeen", optional(node.last_seen.as_deref())),
        ("createdAt", text(&node.created_at)),
        ("expiry", optional(node.expiry.as_deref())),
        ("registerMethod", text(&node.register_method)),
        ("tags", list(&node.tags)),
        ("approvedRoutes", list(&node.approved_routes)),
        ("availableRoutes", list(&node.available_routes)),
        ("subnetRoutes", list(&node.subnet_routes)),
    ])
}

pub fn flatten_pre_auth_key(key: &PreAuthKey) -> FlatRecord {
    row([
        ("id", text(&key.id)),
        ("key", text(&key.key)),
        ("user", text(&key.user.name)),
        ("reusable", Value::Bool(key.reusable)),
        ("ephemeral", Value::Bool(key.ephemeral)),
        ("used", Value::Bool(key.used)),
        ("expiration", text(&key.expiration)),
        ("createdAt", text(&key.created_at)),
        ("aclTags", list(&key.acl_tags)),
    ])
}

/// A key without a server id leaves the `id` cell empty.
pub fn flatten_api_key(key: &ApiKey) -> FlatRecord {
    row([
        ("id", key.id.as_deref().map_or(Value::Null, text)),
        ("prefix", text(&key.prefix)),
        ("createdAt", text(&key.created_at)),
        ("lastSeen", optional(key.last_seen.as_deref())),
        ("expiration", text(&key.expiration)),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::convert::{map_api_key, map_node, map_pre_auth_key};
    use crate::export::serialize_csv;
    use crate::testing::user;

    #[test]
    fn node_lists_are_joined_and_user_is_named() {
        let node = map_node(&json!({
            "id": "5",
            "name": "laptop",
            "user": { "id": "1", "name": "alice" },
            "ipAddresses": ["100.64.0.5", "fd7a:115c:a1e0::5"],
            "tags": ["tag:a", "tag:b"]
        }))
        .unwrap();

        let flat = flatten_node(&node);
        assert_eq!(flat["user"], json!("alice"));
        assert_eq!(flat["ipAddresses"], json!("100.64.0.5; fd7a:115c:a1e0::5"));
        assert_eq!(flat["tags"], json!("tag:a; tag:b"));
        assert_eq!(flat["lastSeen"], json!(""));
        assert_eq!(flat.len(), 14);
    }

    #[test]
    fn pre_auth_key_csv() {
        let owner = user("1", "alice");
        let pak = map_pre_auth_key(
            &json!({ "id": "7", "key": "k", "reusable": true, "aclTags": ["tag:ci", "tag:x"] }),
            Some(&owner),
        )
        .unwrap();

        let csv = String::from_utf8(serialize_csv(&[flatten_pre_auth_key(&pak)])).unwrap();
        insta::assert_snapshot!(csv, @r"
        id,key,user,reusable,ephemeral,used,expiration,createdAt,aclTags
        7,k,alice,true,false,false,,,tag:ci; tag:x
        ");
    }

    #[test]
    fn api_key_without_id_has_empty_cell() {
        let key = map_api_key(&json!({ "prefix": "AbCdEf7***" })).unwrap();
        let flat = flatten_api_key(&key);
        assert_eq!(flat["id"], Value::Null);

        let csv = String::from_utf8(serialize_csv(&[flat])).unwrap();
        assert!(csv.ends_with("\n,AbCdEf7***,,,"));
    }

    #[test]
    fn user_columns_in_export_order() {
        let flat = flatten_user(&user("1", "alice"));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "name", "displayName", "email", "createdAt", "provider", "providerId"]
        );
    }
}
