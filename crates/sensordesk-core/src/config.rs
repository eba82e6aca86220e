// ── Runtime client configuration ──
//
// Describes how to reach the backend and the local policies applied
// before any request is made. Never touches disk; the CLI builds a
// `ClientConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::validate::PasswordPolicy;

/// Default quiescence window for the live search.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Default page size for sensor listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. `http://localhost:8080`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Rule applied to passwords before a login request is sent.
    pub password_policy: PasswordPolicy,
    /// Quiescence window for the live search.
    pub search_debounce: Duration,
    /// Page size used when the caller does not pick one.
    pub page_size: u32,
}

impl ClientConfig {
    /// A config for `url` with every other field at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            password_policy: PasswordPolicy::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
