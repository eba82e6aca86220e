// ── Core error types ──
//
// User-facing errors from sensordesk-core. Consumers never see raw HTTP
// statuses or JSON parse failures; the `From<sensordesk_api::Error>` impl
// translates transport-layer errors into domain variants.
//
// Best-effort operations do not return these at all (see `Outcome`);
// authentication and session management do.

use thiserror::Error;

use crate::validate::ValidationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    #[error("Request to the backend timed out")]
    Timeout,

    // ── Local validation ─────────────────────────────────────────────
    #[error("Invalid email address: '{email}'")]
    InvalidEmail { email: String },

    #[error("Invalid password: {reason}")]
    InvalidPassword { reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    NoSession,

    #[error("Session storage error: {message}")]
    Session { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidEmail(email) => CoreError::InvalidEmail { email },
            ValidationError::Password(reason) => CoreError::InvalidPassword { reason },
            other => CoreError::ValidationFailed {
                message: other.to_string(),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sensordesk_api::Error> for CoreError {
    fn from(err: sensordesk_api::Error) -> Self {
        use sensordesk_api::Error as ApiError;

        if err.is_timeout() {
            return CoreError::Timeout;
        }
        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Forbidden { message } => CoreError::Forbidden { message },
            ApiError::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            ApiError::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Session {
            message: err.to_string(),
        }
    }
}
