//! CLI error types with miette diagnostics.
//!
//! The single user-facing error path: every command funnels its failures
//! through `CliError`, which renders one diagnostic and maps to a stable
//! exit code. No call site prints errors ad hoc.

use miette::Diagnostic;
use thiserror::Error;

use safeops_core::CoreError;

/// Exit codes per the CLI contract.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const LIFECYCLE: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the SafeOps backend at {url}")]
    #[diagnostic(
        code(safeops::connection_failed),
        help(
            "Check that the backend URL is correct and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(safeops::auth_failed),
        help(
            "Verify your API key.\n\
             Run: safeops config set-key --profile {profile}\n\
             Or set the SAFEOPS_API_KEY environment variable."
        )
    )]
    AuthFailed { profile: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(safeops::no_credentials),
        help(
            "Store one with: safeops config set-key --profile {profile}\n\
             Or set the SAFEOPS_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(safeops::not_found),
        help("Run: safeops {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("The backend rejected the write: {message}")]
    #[diagnostic(
        code(safeops::constraint),
        help("A uniqueness or ownership constraint blocked this change.")
    )]
    Constraint { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────

    #[error("RAW {id} is not in '{expected}' -- cannot move it to '{to}'")]
    #[diagnostic(
        code(safeops::invalid_transition),
        help(
            "The approval lifecycle is draft → submitted → approved/rejected.\n\
             Run: safeops raws get {id} to see the current status."
        )
    )]
    InvalidTransition {
        id: String,
        expected: &'static str,
        to: &'static str,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Backend error ({code}): {message}")]
    #[diagnostic(code(safeops::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(safeops::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(safeops::profile_not_found),
        help("Check: safeops config show")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(safeops::no_config),
        help(
            "Expected at: {path}\n\
             Pass --backend and --api-key, or create the file."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(safeops::config))]
    Config(#[from] safeops_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(safeops::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(safeops::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(safeops::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidTransition { .. } => exit_code::LIFECYCLE,
            Self::Constraint { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Disconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "the backend connection was lost".into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                list_command: match entity.as_str() {
                    "venue" => "venues list".into(),
                    "RAW" => "raws list".into(),
                    other => format!("{other}s list"),
                },
                resource_type: entity,
                identifier,
            },

            CoreError::Constraint { message, code: _ } => CliError::Constraint { message },

            CoreError::InvalidTransition { id, expected, to } => {
                CliError::InvalidTransition { id, expected, to }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api {
                message,
                code,
                status: _,
            } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}
