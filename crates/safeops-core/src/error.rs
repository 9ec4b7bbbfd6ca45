// ── Core error types ──
//
// User-facing errors from safeops-core. These are NOT transport-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<safeops_api::Error>` impl translates gateway errors into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the SafeOps backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Client is disconnected")]
    Disconnected,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// Uniqueness or foreign-key constraint rejected the write
    /// (e.g. deleting a RAW that still owns hazards).
    #[error("Constraint violation: {message}")]
    Constraint {
        message: String,
        code: Option<String>,
    },

    // ── Lifecycle errors ─────────────────────────────────────────────
    /// A status transition was requested from the wrong current state
    /// (e.g. approving a RAW that was never submitted).
    #[error("RAW {id} cannot move to '{to}': it is not in '{expected}'")]
    InvalidTransition {
        id: String,
        expected: &'static str,
        to: &'static str,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from gateway errors ───────────────────────────────────

impl From<safeops_api::Error> for CoreError {
    fn from(err: safeops_api::Error) -> Self {
        match err {
            safeops_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            safeops_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "session expired -- re-authentication required".into(),
            },
            safeops_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            safeops_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            safeops_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            safeops_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            safeops_api::Error::Api {
                message,
                code,
                status,
            } => {
                if err_code_is_constraint(code.as_deref()) || status == 409 {
                    CoreError::Constraint { message, code }
                } else {
                    CoreError::Api {
                        message,
                        code,
                        status: Some(status),
                    }
                }
            }
            safeops_api::Error::RowNotFound { relation } => CoreError::NotFound {
                entity: relation,
                identifier: "<filter>".into(),
            },
            safeops_api::Error::RealtimeConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("change feed connection failed: {reason}"),
            },
            safeops_api::Error::RealtimeClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("change feed closed (code {code}): {reason}"),
            },
            safeops_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}

/// SQLSTATE class 23 covers integrity-constraint violations.
fn err_code_is_constraint(code: Option<&str>) -> bool {
    code.is_some_and(|c| c.starts_with("23"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fk_violation_becomes_constraint() {
        let err = CoreError::from(safeops_api::Error::Api {
            message: "violates foreign key constraint".into(),
            code: Some("23503".into()),
            status: 409,
        });
        assert!(matches!(err, CoreError::Constraint { .. }));
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = CoreError::from(safeops_api::Error::RowNotFound {
            relation: "venues".into(),
        });
        assert!(matches!(err, CoreError::NotFound { ref entity, .. } if entity == "venues"));
    }
}
