// ── Core error types ──
//
// Domain errors from scaledeck-core. Transport failures arrive as
// `scaledeck_api::Error` and are translated here; an HTTP 401 becomes
// `AuthError::Unauthorized`, the one condition the UI reacts to.

use thiserror::Error;

/// Authentication failures.
///
/// `Unauthorized` is the specific case the error classifier surfaces to
/// the user as a session-expired notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized -- the API key is missing, expired or revoked")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

/// A raw payload lacked a field the canonical type requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {entity}: missing {field}")]
pub struct MappingError {
    pub entity: &'static str,
    pub field: &'static str,
}

impl MappingError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self { entity, field }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error(transparent)]
    Auth(#[from] AuthError),

    // ── Payload shape ────────────────────────────────────────────────
    #[error(transparent)]
    Mapping(#[from] MappingError),

    // ── Caller misuse, raised before any request is sent ─────────────
    #[error("Contract violation: {message}")]
    ContractViolation { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Export / serialization ───────────────────────────────────────
    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    /// `true` only for the unauthorized subtype of [`AuthError`].
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth(AuthError::Unauthorized))
    }

    /// HTTP status behind this error, when it came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth(AuthError::Unauthorized) => Some(401),
            Self::Auth(AuthError::Forbidden { .. }) => Some(403),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<scaledeck_api::Error> for CoreError {
    fn from(err: scaledeck_api::Error) -> Self {
        match err {
            scaledeck_api::Error::Unauthorized => CoreError::Auth(AuthError::Unauthorized),
            scaledeck_api::Error::Forbidden { message } => {
                CoreError::Auth(AuthError::Forbidden { message })
            }
            scaledeck_api::Error::InvalidApiKey(message) => CoreError::Config { message },
            scaledeck_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            scaledeck_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(401) {
                    CoreError::Auth(AuthError::Unauthorized)
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            scaledeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            scaledeck_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            scaledeck_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Deserialization error: {message}"),
                status: None,
            },
        }
    }
}
