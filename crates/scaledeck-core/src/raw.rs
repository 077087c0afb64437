// ── Raw payload shapes and alias resolution ──
//
// Headscale has shipped the same records under three spellings over time:
// camelCase (current REST gateway), PascalCase (legacy Go structs leaking
// through) and snake_case (raw gRPC gateway). A record is classified once,
// then each field is resolved through an explicit alias table.

use serde_json::{Map, Value};

/// Every known spelling of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub current: &'static str,
    pub legacy: &'static str,
    pub snake: &'static str,
    /// Older names for the same data, consulted last.
    pub fallbacks: &'static [&'static str],
}

impl FieldAliases {
    pub const fn new(current: &'static str, legacy: &'static str, snake: &'static str) -> Self {
        Self {
            current,
            legacy,
            snake,
            fallbacks: &[],
        }
    }

    pub const fn with_fallbacks(self, fallbacks: &'static [&'static str]) -> Self {
        Self { fallbacks, ..self }
    }
}

/// A JSON object tagged with the naming convention it was written in.
#[derive(Debug, Clone, Copy)]
pub enum RawRecord<'a> {
    Current(&'a Map<String, Value>),
    Legacy(&'a Map<String, Value>),
    Snake(&'a Map<String, Value>),
}

impl<'a> RawRecord<'a> {
    /// Tag a payload by its key spellings. Returns `None` for non-objects.
    pub fn classify(value: &'a Value) -> Option<Self> {
        let map = value.as_object()?;
        let record = if map
            .keys()
            .any(|k| k.starts_with(|c: char| c.is_ascii_uppercase()))
        {
            Self::Legacy(map)
        } else if map.keys().any(|k| k.contains('_')) {
            Self::Snake(map)
        } else {
            Self::Current(map)
        };
        Some(record)
    }

    fn map(&self) -> &'a Map<String, Value> {
        match self {
            Self::Current(m) | Self::Legacy(m) | Self::Snake(m) => m,
        }
    }

    fn own_spelling(&self, field: &FieldAliases) -> &'static str {
        match self {
            Self::Current(_) => field.current,
            Self::Legacy(_) => field.legacy,
            Self::Snake(_) => field.snake,
        }
    }

    /// First present value across the field's aliases, own spelling first.
    ///
    /// A key holding JSON `null` counts as absent; any other value,
    /// including `false`, `0` and `""`, counts as present.
    pub fn lookup(&self, field: &FieldAliases) -> Option<&'a Value> {
        let map = self.map();
        std::iter::once(self.own_spelling(field))
            .chain([field.current, field.legacy, field.snake])
            .chain(field.fallbacks.iter().copied())
            .find_map(|alias| map.get(alias).filter(|v| !v.is_null()))
    }

    /// String value, with numbers stringified. Empty strings count as absent.
    pub fn string(&self, field: &FieldAliases) -> Option<String> {
        match self.lookup(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Like [`string`](Self::string), defaulting to an empty string.
    pub fn string_or_default(&self, field: &FieldAliases) -> String {
        self.string(field).unwrap_or_default()
    }

    /// Boolean with truthiness for non-bool values; absent means `false`.
    pub fn flag(&self, field: &FieldAliases) -> bool {
        self.lookup(field).is_some_and(truthy)
    }

    /// String array; absent or wrongly-typed values give an empty list.
    pub fn strings(&self, field: &FieldAliases) -> Vec<String> {
        match self.lookup(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Nested object value.
    pub fn object(&self, field: &FieldAliases) -> Option<&'a Value> {
        self.lookup(field).filter(|v| v.is_object())
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ── Response envelopes ──────────────────────────────────────────────

pub mod envelope {
    use super::FieldAliases;

    pub const USERS: FieldAliases = FieldAliases::new("users", "Users", "users");
    pub const NODES: FieldAliases = FieldAliases::new("nodes", "Nodes", "nodes");
    pub const NODE: FieldAliases = FieldAliases::new("node", "Node", "node");
    pub const PRE_AUTH_KEYS: FieldAliases =
        FieldAliases::new("preAuthKeys", "PreAuthKeys", "pre_auth_keys");
    pub const API_KEYS: FieldAliases = FieldAliases::new("apiKeys", "ApiKeys", "api_keys");
    pub const POLICY: FieldAliases = FieldAliases::new("policy", "Policy", "policy");
    pub const DATABASE_CONNECTIVITY: FieldAliases = FieldAliases::new(
        "databaseConnectivity",
        "DatabaseConnectivity",
        "database_connectivity",
    );
}

/// Unwrap a list envelope such as `{"users": [...]}`.
///
/// Returns `None` when the payload is not an object, or the list is
/// missing or not an array.
pub fn envelope_list<'a>(payload: &'a Value, field: &FieldAliases) -> Option<&'a [Value]> {
    let record = RawRecord::classify(payload)?;
    record.lookup(field)?.as_array().map(Vec::as_slice)
}

/// Unwrap a single-item envelope such as `{"node": {...}}`.
pub fn envelope_item<'a>(payload: &'a Value, field: &FieldAliases) -> Option<&'a Value> {
    RawRecord::classify(payload)?.lookup(field)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const ID: FieldAliases = FieldAliases::new("id", "ID", "id");
    const CREATED_AT: FieldAliases = FieldAliases::new("createdAt", "CreatedAt", "created_at");
    const REUSABLE: FieldAliases = FieldAliases::new("reusable", "Reusable", "reusable");
    const TAGS: FieldAliases =
        FieldAliases::new("tags", "Tags", "tags").with_fallbacks(&["validTags"]);

    #[test]
    fn classifies_by_key_spelling() {
        let current = json!({ "id": "1", "createdAt": "x" });
        let legacy = json!({ "ID": "1", "CreatedAt": "x" });
        let snake = json!({ "id": "1", "created_at": "x" });

        assert!(matches!(
            RawRecord::classify(&current),
            Some(RawRecord::Current(_))
        ));
        assert!(matches!(
            RawRecord::classify(&legacy),
            Some(RawRecord::Legacy(_))
        ));
        assert!(matches!(
            RawRecord::classify(&snake),
            Some(RawRecord::Snake(_))
        ));
        assert!(RawRecord::classify(&json!([1, 2])).is_none());
    }

    #[test]
    fn every_shape_resolves_the_same_value() {
        for raw in [
            json!({ "createdAt": "2024-01-01" }),
            json!({ "CreatedAt": "2024-01-01" }),
            json!({ "created_at": "2024-01-01" }),
        ] {
            let rec = RawRecord::classify(&raw).unwrap();
            assert_eq!(rec.string(&CREATED_AT).as_deref(), Some("2024-01-01"));
        }
    }

    #[test]
    fn present_false_is_not_skipped() {
        // A legacy record mixing spellings: own spelling `Reusable: false`
        // must win over the later `reusable: true`.
        let raw = json!({ "ID": "1", "Reusable": false, "reusable": true });
        let rec = RawRecord::classify(&raw).unwrap();
        assert!(!rec.flag(&REUSABLE));
    }

    #[test]
    fn null_counts_as_absent() {
        let raw = json!({ "ID": null, "id": "7" });
        let rec = RawRecord::classify(&raw).unwrap();
        assert_eq!(rec.string(&ID).as_deref(), Some("7"));
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let raw = json!({ "id": 42 });
        let rec = RawRecord::classify(&raw).unwrap();
        assert_eq!(rec.string(&ID).as_deref(), Some("42"));
    }

    #[test]
    fn empty_string_is_absent() {
        let raw = json!({ "id": "" });
        let rec = RawRecord::classify(&raw).unwrap();
        assert_eq!(rec.string(&ID), None);
    }

    #[test]
    fn arrays_default_to_empty() {
        let missing = json!({ "id": "1" });
        let wrong = json!({ "tags": "tag:server" });
        assert!(RawRecord::classify(&missing).unwrap().strings(&TAGS).is_empty());
        assert!(RawRecord::classify(&wrong).unwrap().strings(&TAGS).is_empty());
    }

    #[test]
    fn fallback_alias_is_consulted_last() {
        let raw = json!({ "validTags": ["tag:web"] });
        let rec = RawRecord::classify(&raw).unwrap();
        assert_eq!(rec.strings(&TAGS), vec!["tag:web".to_owned()]);
    }

    #[test]
    fn truthiness_for_non_bool_flags() {
        let raw = json!({ "reusable": 1 });
        assert!(RawRecord::classify(&raw).unwrap().flag(&REUSABLE));
        let raw = json!({ "reusable": "" });
        assert!(!RawRecord::classify(&raw).unwrap().flag(&REUSABLE));
    }

    #[test]
    fn envelope_helpers() {
        let payload = json!({ "pre_auth_keys": [{ "id": "1" }] });
        let list = envelope_list(&payload, &envelope::PRE_AUTH_KEYS).unwrap();
        assert_eq!(list.len(), 1);

        assert!(envelope_list(&json!({}), &envelope::USERS).is_none());
        assert!(
            envelope_list(&json!({ "users": null }), &envelope::USERS).is_none()
        );
        assert!(
            envelope_list(&json!({ "users": { "id": "1" } }), &envelope::USERS).is_none()
        );
        let empty = json!({ "users": [] });
        assert!(envelope_list(&empty, &envelope::USERS).unwrap().is_empty());

        let payload = json!({ "node": { "id": "3" } });
        assert_eq!(
            envelope_item(&payload, &envelope::NODE).unwrap()["id"],
            "3"
        );
    }
}
