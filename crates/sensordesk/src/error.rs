//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sensordesk_config::ConfigError;
use sensordesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the backend at {url}")]
    #[diagnostic(
        code(sensordesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(sensordesk::timeout),
        help("Increase the timeout with --timeout or check the backend's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sensordesk::auth_failed),
        help(
            "Verify your email and password.\n\
             Store the password with: sensordesk config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(code(sensordesk::no_session), help("Run: sensordesk login"))]
    NotSignedIn,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(sensordesk::forbidden),
        help("This operation needs an administrator account.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sensordesk::not_found),
        help("Run: sensordesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    /// A best-effort operation failed; its notice is already on stderr.
    #[error("{operation} did not complete")]
    #[diagnostic(code(sensordesk::incomplete))]
    Incomplete { operation: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(sensordesk::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sensordesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sensordesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sensordesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(sensordesk::no_config),
        help(
            "Create a profile with: sensordesk config init\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sensordesk::config))]
    Config(#[from] ConfigError),

    #[error("Session error: {message}")]
    #[diagnostic(
        code(sensordesk::session),
        help("Sign in again with: sensordesk login")
    )]
    Session { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(sensordesk::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
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
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Forbidden { message } => CliError::Forbidden { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::InvalidEmail { email } => CliError::Validation {
                field: "email".into(),
                reason: format!("'{email}' is not a valid address"),
            },

            CoreError::InvalidPassword { reason } => CliError::Validation {
                field: "password".into(),
                reason,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::NoSession => CliError::NotSignedIn,

            CoreError::Session { message } => CliError::Session { message },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
