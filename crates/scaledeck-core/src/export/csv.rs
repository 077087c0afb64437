// ── CSV serialization ──

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// One CSV row: column name to value, in insertion order.
pub type FlatRecord = IndexMap<String, Value>;

/// Render records as CSV.
///
/// The header is the union of all keys in first-seen order. Missing and
/// null values render empty. A field is quoted only when it contains a
/// comma, a double quote or a newline. Rows are joined with `\n` and there
/// is no trailing newline. No records means no output at all.
pub fn serialize_csv(records: &[FlatRecord]) -> Vec<u8> {
    if records.is_empty() {
        return Vec::new();
    }

    let columns: IndexSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| escape(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|c| record.get(*c).map_or_else(String::new, cell))
            .collect();
        lines.push(row.join(","));
    }
    lines.join("\n").into_bytes()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
