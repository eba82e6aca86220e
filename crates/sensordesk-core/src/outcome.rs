// ── Best-effort results ──
//
// Resource operations never fail loudly. They resolve to an `Outcome`,
// which keeps "the backend had nothing" apart from "the call failed"
// while still letting callers collapse both into a default.

use thiserror::Error;

/// Why a best-effort operation produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("not signed in")]
    NoSession,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl Failure {
    /// Short stable label, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "invalid",
            Self::NoSession => "no_session",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Unreachable(_) => "unreachable",
            Self::Timeout => "timeout",
            Self::Server { .. } => "server",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<&sensordesk_api::Error> for Failure {
    fn from(err: &sensordesk_api::Error) -> Self {
        use sensordesk_api::Error as ApiError;

        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            ApiError::Authentication { message } => Self::Unauthorized(message.clone()),
            ApiError::Forbidden { message } => Self::Forbidden(message.clone()),
            ApiError::Transport(e) if e.is_decode() => Self::Decode(e.to_string()),
            ApiError::Transport(e) => match e.status() {
                Some(status) => Self::Server {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => Self::Unreachable(e.to_string()),
            },
            ApiError::InvalidUrl(e) => Self::Unreachable(format!("invalid URL: {e}")),
            ApiError::Tls(msg) => Self::Unreachable(format!("TLS error: {msg}")),
            ApiError::NotFound { path } => Self::Server {
                status: 404,
                message: format!("not found: {path}"),
            },
            ApiError::Api { status, message } => Self::Server {
                status: *status,
                message: message.clone(),
            },
            ApiError::Deserialization { message, .. } => Self::Decode(message.clone()),
        }
    }
}

/// Result of a best-effort operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// The backend answered with a value.
    Ok(T),
    /// The backend answered, but there was nothing to return.
    Empty,
    /// The call failed. A notice has already been reported.
    Failed(Failure),
}

impl<T> Outcome<Vec<T>> {
    /// `Empty` for an empty collection, `Ok` otherwise.
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Ok(items)
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The value, if there is one.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Ok(_) | Self::Empty => None,
        }
    }

    /// Collapse `Empty` and `Failed` into the given fallback.
    pub fn into_fallback(self, fallback: T) -> T {
        self.ok().unwrap_or(fallback)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Empty => Outcome::Empty,
            Self::Failed(failure) => Outcome::Failed(failure),
        }
    }
}

impl<T: Default> Outcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.ok().unwrap_or_default()
    }
}
