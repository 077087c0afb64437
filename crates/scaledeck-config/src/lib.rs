//! Configuration for the scaledeck CLI.
//!
//! TOML profiles, API key resolution (env + keyring + plaintext), and
//! translation to `scaledeck_core::ConsoleConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use scaledeck_core::{ConsoleConfig, TlsVerification};

/// Keyring service name; entries are `<profile>/api-key`.
pub const KEYRING_SERVICE: &str = "scaledeck";
/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SCALEDECK_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The active profile name: explicit choice, else the configured default.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory export files are written to.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            export_dir: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Headscale server profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Server root URL (e.g., "https://headscale.example.com").
    pub server: String,

    /// API key in plaintext. Prefer the keyring or `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$SCALEDECK_CONFIG`, else platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("io", "scaledeck", "scaledeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("scaledeck");
    p
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the config from `path` layered under `SCALEDECK_*` env vars.
///
/// Nested keys use a double underscore, e.g. `SCALEDECK_DEFAULTS__TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SCALEDECK_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "loaded config");
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, falling back to defaults when the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/api-key"),
    )?)
}

/// Resolve an API key: profile env var, then keyring, then plaintext.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(val) = profile
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    if let Ok(secret) = keyring_entry(profile_name)
        .and_then(|e| e.get_password().map_err(ConfigError::from)) {
        return Ok(SecretString::from(secret));
    }

    if let Some(key) = profile.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key in the system keyring for `profile_name`.
pub fn store_api_key(profile_name: &str, api_key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(api_key)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Parse and validate a server URL.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Build a `ConsoleConfig` from a profile and an already-resolved key.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
    api_key: SecretString,
) -> Result<ConsoleConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ConsoleConfig::new(url, api_key);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            api_key: Some("plain".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("home".into(), profile("https://hs.example.com"));
        cfg.default_profile = Some("home".into());
        save_config_to(&path, &cfg).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile_name(None), "home");
        assert_eq!(loaded.profiles["home"].server, "https://hs.example.com");
    }

    #[test]
    fn profile_name_prefers_explicit() {
        let cfg = Config::default();
        assert_eq!(cfg.profile_name(Some("work")), "work");
        assert_eq!(cfg.profile_name(None), "default");
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("missing"),
            Err(ConfigError::UnknownProfile { profile }) if profile == "missing"
        ));
    }

    #[test]
    fn console_config_applies_overrides() {
        let mut p = profile("https://hs.example.com");
        p.timeout = Some(5);
        p.ca_cert = Some(PathBuf::from("/etc/ca.pem"));

        let cfg = profile_to_console_config(&p, &Defaults::default(), SecretString::from("k".to_owned()))
            .unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.tls, TlsVerification::CustomCa(PathBuf::from("/etc/ca.pem")));
    }

    #[test]
    fn insecure_default_wins_over_ca() {
        let p = profile("https://hs.example.com");
        let defaults = Defaults {
            insecure: true,
            ..Defaults::default()
        };
        let cfg = profile_to_console_config(&p, &defaults, SecretString::from("k".to_owned())).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_non_http_server() {
        assert!(matches!(
            parse_server_url("ftp://hs.example.com"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_server_url("not a url").is_err());
    }
}
