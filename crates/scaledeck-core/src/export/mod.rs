// ── Export Pipeline ──
//
// Serializes cached entities to JSON, YAML or per-kind CSV artifacts.
// Reads only from `DataStore` snapshots; the policy is the one resource
// fetched fresh at export time.

mod csv;
mod flatten;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use scaledeck_api::ApiTransport;

use crate::accessor::Accessor;
use crate::error::CoreError;

pub use csv::{FlatRecord, serialize_csv};
pub use flatten::{flatten_api_key, flatten_node, flatten_pre_auth_key, flatten_user};

const FILE_STEM: &str = "scaledeck";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
        }
    }

    fn media_type(self) -> &'static str {
        match self {
            Self::Json => MEDIA_JSON,
            Self::Csv => MEDIA_CSV,
            Self::Yaml => MEDIA_YAML,
        }
    }
}

const MEDIA_JSON: &str = "application/json";
const MEDIA_CSV: &str = "text/csv;charset=utf-8";
const MEDIA_YAML: &str = "application/yaml";

/// Exportable resource kinds. The display form is the JSON key and the
/// CSV filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ExportResource {
    Users,
    Nodes,
    PreAuthKeys,
    ApiKeys,
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub resources: Vec<ExportResource>,
    pub include_metadata: bool,
    /// Write JSON content into the `.yaml` file, as older consoles did.
    pub yaml_as_json: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            resources: ExportResource::iter().collect(),
            include_metadata: true,
            yaml_as_json: false,
        }
    }
}

/// One file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

// ── Serializers ──────────────────────────────────────────────────────

/// Pretty-printed JSON with two-space indentation.
pub fn serialize_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(value).map_err(|e| CoreError::Serialization {
        message: e.to_string(),
    })
}

pub fn serialize_yaml<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|e| CoreError::Serialization {
            message: e.to_string(),
        })
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Serialization {
        message: e.to_string(),
    })
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

// ── Exporter ─────────────────────────────────────────────────────────

/// Builds export artifacts from an accessor's cache.
pub struct Exporter<'a, T: ApiTransport> {
    accessor: &'a Accessor<T>,
}

impl<'a, T: ApiTransport> Exporter<'a, T> {
    pub fn new(accessor: &'a Accessor<T>) -> Self {
        Self { accessor }
    }

    /// Export the requested resources, stamped with the current time.
    pub async fn export(&self, options: &ExportOptions) -> Result<Vec<ExportArtifact>, CoreError> {
        self.export_at(options, Utc::now()).await
    }

    /// Export with an explicit timestamp.
    pub async fn export_at(
        &self,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExportArtifact>, CoreError> {
        let stamp = timestamp(now);
        let base = format!("{FILE_STEM}-export-{stamp}");

        let artifacts = match options.format {
            ExportFormat::Csv => self.csv_artifacts(options, &base),
            ExportFormat::Json | ExportFormat::Yaml => {
                let document = self.document(options, now).await?;
                let (bytes, media_type) = match options.format {
                    ExportFormat::Yaml if !options.yaml_as_json => {
                        (serialize_yaml(&document)?, MEDIA_YAML)
                    }
                    _ => (serialize_json(&document)?, MEDIA_JSON),
                };
                vec![ExportArtifact {
                    filename: format!("{base}.{}", options.format.extension()),
                    media_type,
                    bytes,
                }]
            }
        };
        debug!(
            format = %options.format,
            files = artifacts.len(),
            "export complete"
        );
        Ok(artifacts)
    }

    /// The composite document for JSON and YAML, keys in a fixed order.
    async fn document(
        &self,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> Result<IndexMap<&'static str, Value>, CoreError> {
        let store = self.accessor.store();
        let mut doc = IndexMap::new();

        if options.include_metadata {
            let resources: Vec<String> =
                options.resources.iter().map(ToString::to_string).collect();
            let api_url = self.accessor.transport().base_url().as_str();
            doc.insert(
                "metadata",
                serde_json::json!({
                    "exportedAt": now.to_rfc3339_opts(SecondsFormat::Millis, true),
                    "apiUrl": api_url.trim_end_matches('/'),
                    "format": options.format.to_string(),
                    "resources": resources,
                }),
            );
        }

        for resource in requested(options) {
            let value = match resource {
                ExportResource::Users => {
                    let snap = store.users_snapshot();
                    to_value(&snap.iter().map(|e| &**e).collect::<Vec<_>>())?
                }
                ExportResource::Nodes => {
                    let snap = store.nodes_snapshot();
                    to_value(&snap.iter().map(|e| &**e).collect::<Vec<_>>())?
                }
                ExportResource::PreAuthKeys => {
                    let snap = store.pre_auth_keys_snapshot();
                    to_value(&snap.iter().map(|e| &**e).collect::<Vec<_>>())?
                }
                ExportResource::ApiKeys => {
                    let snap = store.api_keys_snapshot();
                    to_value(&snap.iter().map(|e| &**e).collect::<Vec<_>>())?
                }
                ExportResource::Policy => match self.accessor.fetch_policy().await {
                    Ok(policy) => Value::String(policy),
                    Err(err) => {
                        warn!(error = %err, "failed to export policy, omitting it");
                        continue;
                    }
                },
            };
            doc.insert(resource_key(resource), value);
        }
        Ok(doc)
    }

    fn csv_artifacts(&self, options: &ExportOptions, base: &str) -> Vec<ExportArtifact> {
        let store = self.accessor.store();
        requested(options)
            .filter_map(|resource| {
                let rows: Vec<FlatRecord> = match resource {
                    ExportResource::Users => {
                        store.users_snapshot().iter().map(|u| flatten_user(u)).collect()
                    }
                    ExportResource::Nodes => {
                        store.nodes_snapshot().iter().map(|n| flatten_node(n)).collect()
                    }
                    ExportResource::PreAuthKeys => store
                        .pre_auth_keys_snapshot()
                        .iter()
                        .map(|k| flatten_pre_auth_key(k))
                        .collect(),
                    ExportResource::ApiKeys => store
                        .api_keys_snapshot()
                        .iter()
                        .map(|k| flatten_api_key(k))
                        .collect(),
                    // Policy has no tabular form.
                    ExportResource::Policy => return None,
                };
                csv_artifact(&format!("{base}-{resource}.csv"), &rows)
            })
            .collect()
    }

    // ── Quick single-resource exports ────────────────────────────────

    /// Export cached users. CSV of an empty collection yields `None`.
    pub fn export_users(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Option<ExportArtifact>, CoreError> {
        let snap = self.accessor.store().users_snapshot();
        let items: Vec<_> = snap.iter().map(|e| &**e).collect();
        quick_export(
            ExportResource::Users,
            format,
            now,
            &items,
            |u| flatten_user(u),
        )
    }

    pub fn export_nodes(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Option<ExportArtifact>, CoreError> {
        let snap = self.accessor.store().nodes_snapshot();
        let items: Vec<_> = snap.iter().map(|e| &**e).collect();
        quick_export(
            ExportResource::Nodes,
            format,
            now,
            &items,
            |n| flatten_node(n),
        )
    }

    pub fn export_pre_auth_keys(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Option<ExportArtifact>, CoreError> {
        let snap = self.accessor.store().pre_auth_keys_snapshot();
        let items: Vec<_> = snap.iter().map(|e| &**e).collect();
        quick_export(
            ExportResource::PreAuthKeys,
            format,
            now,
            &items,
            |k| flatten_pre_auth_key(k),
        )
    }

    /// Fetch the policy and wrap its raw text, unmodified, as a `.json` file.
    pub async fn export_policy(&self, now: DateTime<Utc>) -> Result<ExportArtifact, CoreError> {
        let policy = self.accessor.fetch_policy().await?;
        Ok(ExportArtifact {
            filename: format!("{FILE_STEM}-policy-{}.json", timestamp(now)),
            media_type: MEDIA_JSON,
            bytes: policy.into_bytes(),
        })
    }
}

/// Requested resources in canonical order, each at most once.
fn requested(options: &ExportOptions) -> impl Iterator<Item = ExportResource> + '_ {
    ExportResource::iter().filter(|r| options.resources.contains(r))
}

fn resource_key(resource: ExportResource) -> &'static str {
    match resource {
        ExportResource::Users => "users",
        ExportResource::Nodes => "nodes",
        ExportResource::PreAuthKeys => "preAuthKeys",
        ExportResource::ApiKeys => "apiKeys",
        ExportResource::Policy => "policy",
    }
}

fn csv_artifact(filename: &str, rows: &[FlatRecord]) -> Option<ExportArtifact> {
    if rows.is_empty() {
        debug!(filename, "no rows, skipping CSV file");
        return None;
    }
    Some(ExportArtifact {
        filename: filename.to_owned(),
        media_type: MEDIA_CSV,
        bytes: serialize_csv(rows),
    })
}

fn quick_export<E: Serialize>(
    resource: ExportResource,
    format: ExportFormat,
    now: DateTime<Utc>,
    items: &[&E],
    flatten: impl Fn(&E) -> FlatRecord,
) -> Result<Option<ExportArtifact>, CoreError> {
    let filename = format!(
        "{FILE_STEM}-{resource}-{}.{}",
        timestamp(now),
        format.extension()
    );
    let bytes = match format {
        ExportFormat::Json => serialize_json(items)?,
        ExportFormat::Yaml => serialize_yaml(items)?,
        ExportFormat::Csv => {
            let rows: Vec<FlatRecord> = items.iter().map(|e| flatten(*e)).collect();
            return Ok(csv_artifact(&filename, &rows));
        }
    };
    Ok(Some(ExportArtifact {
        filename,
        media_type: format.media_type(),
        bytes,
    }))
}

/// Write artifacts into `dir`, creating it if needed. Returns the paths written.
pub fn write_artifacts(dir: &Path, artifacts: &[ExportArtifact]) -> Result<Vec<PathBuf>, CoreError> {
    std::fs::create_dir_all(dir)?;
    artifacts
        .iter()
        .map(|artifact| -> Result<PathBuf, CoreError> {
            let path = dir.join(&artifact.filename);
            std::fs::write(&path, &artifact.bytes)?;
            debug!(path = %path.display(), bytes = artifact.bytes.len(), "wrote export file");
            Ok(path)
        })
        .collect()
}
