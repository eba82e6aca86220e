use thiserror::Error;

/// Top-level error type for the `sensordesk-api` crate.
///
/// Every failure the raw client can produce. Nothing here is swallowed:
/// `sensordesk-core` decides which operations degrade to a fallback and
/// which ones surface the error.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the bearer token was refused (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The caller is authenticated but not allowed to do this (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server responses ────────────────────────────────────────────
    /// The requested record does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server refused the credentials or token.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out on the wire.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified() {
        let err = Error::NotFound {
            path: "/api/sensors/9".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "maintenance".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn authentication_means_expired() {
        let err = Error::Authentication {
            message: "invalid token".into(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));
    }
}
