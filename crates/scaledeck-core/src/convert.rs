// ── API-to-domain type conversions ──
//
// Bridges raw Headscale JSON into canonical domain types. Each mapper
// classifies the record once, resolves every field through its alias
// table, and rejects records missing a mandatory field.

use serde_json::Value;
use tracing::debug;

use crate::error::MappingError;
use crate::model::{ApiKey, Node, PreAuthKey, User};
use crate::raw::{FieldAliases, RawRecord};

const API_KEY_TAG: &str = "hskey-api-";

// ── Alias tables ─────────────────────────────────────────────────────

mod user_fields {
    use super::FieldAliases;

    pub const ID: FieldAliases = FieldAliases::new("id", "ID", "id");
    pub const NAME: FieldAliases = FieldAliases::new("name", "Name", "name");
    pub const DISPLAY_NAME: FieldAliases =
        FieldAliases::new("displayName", "DisplayName", "display_name");
    pub const EMAIL: FieldAliases = FieldAliases::new("email", "Email", "email");
    pub const PROVIDER: FieldAliases = FieldAliases::new("provider", "Provider", "provider");
    pub const PROVIDER_ID: FieldAliases =
        FieldAliases::new("providerId", "ProviderID", "provider_id");
    pub const CREATED_AT: FieldAliases =
        FieldAliases::new("createdAt", "CreatedAt", "created_at");
}

mod node_fields {
    use super::FieldAliases;

    pub const ID: FieldAliases = FieldAliases::new("id", "ID", "id");
    pub const NAME: FieldAliases = FieldAliases::new("name", "Name", "name");
    pub const GIVEN_NAME: FieldAliases = FieldAliases::new("givenName", "GivenName", "given_name");
    pub const USER: FieldAliases = FieldAliases::new("user", "User", "user");
    pub const IP_ADDRESSES: FieldAliases =
        FieldAliases::new("ipAddresses", "IPAddresses", "ip_addresses");
    pub const ONLINE: FieldAliases = FieldAliases::new("online", "Online", "online");
    pub const LAST_SEEN: FieldAliases = FieldAliases::new("lastSeen", "LastSeen", "last_seen");
    pub const CREATED_AT: FieldAliases =
        FieldAliases::new("createdAt", "CreatedAt", "created_at");
    pub const EXPIRY: FieldAliases = FieldAliases::new("expiry", "Expiry", "expiry");
    pub const REGISTER_METHOD: FieldAliases =
        FieldAliases::new("registerMethod", "RegisterMethod", "register_method");
    // Servers before 0.26 split tags into valid/forced lists.
    pub const TAGS: FieldAliases = FieldAliases::new("tags", "Tags", "tags").with_fallbacks(&[
        "validTags",
        "valid_tags",
        "forcedTags",
        "forced_tags",
    ]);
    pub const APPROVED_ROUTES: FieldAliases =
        FieldAliases::new("approvedRoutes", "ApprovedRoutes", "approved_routes");
    pub const AVAILABLE_ROUTES: FieldAliases =
        FieldAliases::new("availableRoutes", "AvailableRoutes", "available_routes");
    pub const SUBNET_ROUTES: FieldAliases =
        FieldAliases::new("subnetRoutes", "SubnetRoutes", "subnet_routes");
}

mod pre_auth_key_fields {
    use super::FieldAliases;

    pub const ID: FieldAliases = FieldAliases::new("id", "ID", "id");
    pub const KEY: FieldAliases = FieldAliases::new("key", "Key", "key");
    pub const USER: FieldAliases = FieldAliases::new("user", "User", "user");
    pub const REUSABLE: FieldAliases = FieldAliases::new("reusable", "Reusable", "reusable");
    pub const EPHEMERAL: FieldAliases = FieldAliases::new("ephemeral", "Ephemeral", "ephemeral");
    pub const USED: FieldAliases = FieldAliases::new("used", "Used", "used");
    pub const EXPIRATION: FieldAliases =
        FieldAliases::new("expiration", "Expiration", "expiration");
    pub const CREATED_AT: FieldAliases =
        FieldAliases::new("createdAt", "CreatedAt", "created_at");
    pub const ACL_TAGS: FieldAliases = FieldAliases::new("aclTags", "AclTags", "acl_tags");
}

mod api_key_fields {
    use super::FieldAliases;

    pub const ID: FieldAliases = FieldAliases::new("id", "ID", "id");
    pub const PREFIX: FieldAliases = FieldAliases::new("prefix", "Prefix", "prefix");
    pub const CREATED_AT: FieldAliases =
        FieldAliases::new("createdAt", "CreatedAt", "created_at");
    pub const LAST_SEEN: FieldAliases = FieldAliases::new("lastSeen", "LastSeen", "last_seen");
    pub const EXPIRATION: FieldAliases =
        FieldAliases::new("expiration", "Expiration", "expiration");
}

// ── Helpers ──────────────────────────────────────────────────────────

fn record<'a>(raw: &'a Value, entity: &'static str) -> Result<RawRecord<'a>, MappingError> {
    RawRecord::classify(raw).ok_or(MappingError::missing(entity, "object"))
}

fn required(
    rec: &RawRecord<'_>,
    field: &FieldAliases,
    entity: &'static str,
) -> Result<String, MappingError> {
    rec.string(field)
        .ok_or(MappingError::missing(entity, field.current))
}

// ── Mappers ──────────────────────────────────────────────────────────

/// Map a raw user record. Only `id` is mandatory.
pub fn map_user(raw: &Value) -> Result<User, MappingError> {
    use user_fields as f;
    let rec = record(raw, "User")?;

    Ok(User {
        id: required(&rec, &f::ID, "User")?,
        name: rec.string_or_default(&f::NAME),
        display_name: rec.string(&f::DISPLAY_NAME),
        email: rec.string_or_default(&f::EMAIL),
        provider: rec.string_or_default(&f::PROVIDER),
        provider_id: rec.string_or_default(&f::PROVIDER_ID),
        created_at: rec.string_or_default(&f::CREATED_AT),
    })
}

/// Map a raw node record. The embedded owner must itself be a valid user.
pub fn map_node(raw: &Value) -> Result<Node, MappingError> {
    use node_fields as f;
    let rec = record(raw, "Node")?;

    let id = required(&rec, &f::ID, "Node")?;
    let user = rec
        .object(&f::USER)
        .and_then(|u| map_user(u).ok())
        .ok_or(MappingError::missing("Node", "user"))?;

    Ok(Node {
        id,
        name: rec.string_or_default(&f::NAME),
        given_name: rec.string_or_default(&f::GIVEN_NAME),
        user,
        ip_addresses: rec.strings(&f::IP_ADDRESSES),
        online: rec.flag(&f::ONLINE),
        last_seen: rec.string(&f::LAST_SEEN),
        created_at: rec.string_or_default(&f::CREATED_AT),
        expiry: rec.string(&f::EXPIRY),
        register_method: rec.string_or_default(&f::REGISTER_METHOD),
        tags: rec.strings(&f::TAGS),
        approved_routes: rec.strings(&f::APPROVED_ROUTES),
        available_routes: rec.strings(&f::AVAILABLE_ROUTES),
        subnet_routes: rec.strings(&f::SUBNET_ROUTES),
    })
}

/// Map a raw pre-auth key record.
///
/// The owning user is taken from the embedded `user` object when it maps
/// cleanly, otherwise from `context` (the user the keys were listed for).
pub fn map_pre_auth_key(raw: &Value, context: Option<&User>) -> Result<PreAuthKey, MappingError> {
    use pre_auth_key_fields as f;
    let rec = record(raw, "PreAuthKey")?;

    let id = required(&rec, &f::ID, "PreAuthKey")?;
    let key = required(&rec, &f::KEY, "PreAuthKey")?;
    let user = rec
        .object(&f::USER)
        .and_then(|u| map_user(u).ok())
        .or_else(|| context.cloned())
        .ok_or(MappingError::missing("PreAuthKey", "user"))?;

    let pak = PreAuthKey {
        user,
        id,
        key,
        reusable: rec.flag(&f::REUSABLE),
        ephemeral: rec.flag(&f::EPHEMERAL),
        used: rec.flag(&f::USED),
        expiration: rec.string_or_default(&f::EXPIRATION),
        created_at: rec.string_or_default(&f::CREATED_AT),
        acl_tags: rec.strings(&f::ACL_TAGS),
    };
    debug!(
        id = %pak.id,
        key_preview = pak.key_preview(),
        legacy = pak.is_legacy_format(),
        "mapped pre-auth key"
    );
    Ok(pak)
}

/// Map a raw API key record. Only `prefix` is mandatory.
pub fn map_api_key(raw: &Value) -> Result<ApiKey, MappingError> {
    use api_key_fields as f;
    let rec = record(raw, "ApiKey")?;

    Ok(ApiKey {
        prefix: required(&rec, &f::PREFIX, "ApiKey")?,
        id: rec.string(&f::ID),
        created_at: rec.string_or_default(&f::CREATED_AT),
        last_seen: rec.string(&f::LAST_SEEN),
        expiration: rec.string_or_default(&f::EXPIRATION),
    })
}

// ── Bulk mapping ─────────────────────────────────────────────────────

/// Outcome of mapping a list: every valid entity plus one error per rejected record.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchMapping<T> {
    pub entities: Vec<T>,
    pub rejected: Vec<MappingError>,
}

impl<T> Default for BatchMapping<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Map each record independently; a bad record never fails the batch.
pub fn map_entities<T, F>(raw: &[Value], map: F) -> BatchMapping<T>
where
    F: Fn(&Value) -> Result<T, MappingError>,
{
    let mut batch = BatchMapping {
        entities: Vec::with_capacity(raw.len()),
        rejected: Vec::new(),
    };
    for item in raw {
        match map(item) {
            Ok(entity) => batch.entities.push(entity),
            Err(err) => {
                debug!(error = %err, "skipping unmappable record");
                batch.rejected.push(err);
            }
        }
    }
    batch
}

// ── API key prefixes ─────────────────────────────────────────────────

/// Strip the display decoration from an API key prefix.
///
/// `hskey-api-AbCdEf012345-***` and `AbCdEf7***` become `AbCdEf012345`
/// and `AbCdEf7`. Only the exact `-***` (tagged) or `***` (legacy) suffix
/// is removed; bare prefixes pass through.
pub fn extract_raw_prefix(formatted: &str) -> &str {
    match formatted.strip_prefix(API_KEY_TAG) {
        Some(bare) => bare.strip_suffix("-***").unwrap_or(bare),
        None => formatted.strip_suffix("***").unwrap_or(formatted),
    }
}
