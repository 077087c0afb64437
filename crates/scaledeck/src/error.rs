//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use scaledeck_config::ConfigError;
use scaledeck_core::{AuthError, CoreError, EnglishCatalog, localize_error};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Headscale at {url}")]
    #[diagnostic(
        code(scaledeck::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(scaledeck::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(scaledeck::auth_failed),
        help(
            "Create a new key with: headscale apikeys create\n\
             Then store it with: scaledeck config set-key --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("Access denied: {message}")]
    #[diagnostic(code(scaledeck::forbidden))]
    Forbidden { message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(scaledeck::no_credentials),
        help(
            "Configure one with: scaledeck config init\n\
             Or set the SCALEDECK_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(scaledeck::not_found),
        help("Run: scaledeck {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server error: {message}")]
    #[diagnostic(code(scaledeck::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(
        code(scaledeck::unexpected_response),
        help("The server returned data scaledeck could not interpret. Re-run with -vv for details.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(scaledeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(scaledeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: scaledeck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(scaledeck::no_config),
        help(
            "Create a profile with: scaledeck config init\n\
             Or pass --server and --api-key. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(scaledeck::config))]
    Config { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(scaledeck::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::Forbidden { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth(AuthError::Unauthorized) => CliError::AuthFailed {
                profile: "current".into(),
            },
            CoreError::Auth(AuthError::Forbidden { message }) => CliError::Forbidden { message },
            CoreError::Mapping(e) => CliError::UnexpectedResponse {
                message: e.to_string(),
            },
            CoreError::ContractViolation { message } => CliError::Validation {
                field: "argument".into(),
                reason: message,
            },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Api { message, status } => CliError::ApiError {
                status,
                message: localize_error(&message, &EnglishCatalog),
            },
            CoreError::Config { message } | CoreError::Serialization { message } => {
                CliError::Config { message }
            }
            CoreError::Io(e) => CliError::Io(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "(none)".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
