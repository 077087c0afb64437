use thiserror::Error;

/// Top-level error type for the `scaledeck-api` crate.
///
/// Every non-2xx response surfaces here with its HTTP status.
/// `scaledeck-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the API key (HTTP 401).
    #[error("Unauthorized -- API key missing, expired or revoked")]
    Unauthorized,

    /// The configured API key cannot be sent as a header.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Authenticated but not allowed (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── HTTP ────────────────────────────────────────────────────────
    /// Any other non-2xx response, with the server's message if it sent one.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server signalled an authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
