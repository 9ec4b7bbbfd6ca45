use thiserror::Error;

/// Top-level error type for the `safeops-api` crate.
///
/// Covers every failure mode across the three API surfaces: auth, the
/// relational REST gateway, and the realtime change feed. `safeops-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in/sign-up rejected (wrong credentials, duplicate email, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Access token expired or revoked.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data API ────────────────────────────────────────────────────
    /// Structured error from the data API (unique violation, FK
    /// violation, RLS rejection, malformed filter, ...).
    #[error("Data API error (HTTP {status}): {message}")]
    Api {
        message: String,
        /// SQLSTATE-style code when the backend provides one
        /// (e.g. "23505" unique violation, "23503" FK violation).
        code: Option<String>,
        status: u16,
    },

    /// A single-row request matched no rows.
    #[error("No row in '{relation}' matched the query")]
    RowNotFound { relation: String },

    // ── Realtime ────────────────────────────────────────────────────
    /// Change-feed connection failed.
    #[error("Realtime connection failed: {0}")]
    RealtimeConnect(String),

    /// Change-feed closed by the server.
    #[error("Realtime stream closed (code {code}): {reason}")]
    RealtimeClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the requested row does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RowNotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status, .. } => matches!(status, 404 | 406),
            _ => false,
        }
    }

    /// Returns `true` for uniqueness or foreign-key constraint rejections.
    ///
    /// The backend reports these as HTTP 409 with a `23xxx` SQLSTATE code.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *status == 409 || code.as_deref().is_some_and(|c| c.starts_with("23"))
            }
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::RealtimeConnect(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 502 | 503),
            _ => false,
        }
    }

    /// Extract the backend error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
