// ── Local input validation ──
//
// Checks that run before any network call. Cheap, synchronous, and
// shared by the auth flow, sensor creation, and user management.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("invalid email regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("invalid phone regex"));

/// A local validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email format: '{0}'")]
    InvalidEmail(String),

    #[error("invalid phone number format: '{0}'")]
    InvalidPhone(String),

    #[error("{0}")]
    Password(String),

    #[error("{0} is required")]
    Required(&'static str),
}

/// Conventional address check: `local@domain.tld`, at least 5 chars.
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.len() < 5 || !EMAIL.is_match(value) {
        return Err(ValidationError::InvalidEmail(value.to_owned()));
    }
    Ok(())
}

/// E.164-ish phone check: optional `+`, no leading zero, 2 to 15 digits.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE.is_match(value) {
        return Err(ValidationError::InvalidPhone(value.to_owned()));
    }
    Ok(())
}

/// Non-empty after trimming.
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

// ── Password policy ─────────────────────────────────────────────────

/// Length rule applied to passwords before login.
///
/// Lengths count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// Exactly this many characters.
    Exact(usize),
    /// At least this many characters.
    AtLeast(usize),
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::Exact(12)
    }
}

impl PasswordPolicy {
    pub fn check(self, password: &str) -> Result<(), ValidationError> {
        let len = password.chars().count();
        match self {
            Self::Exact(n) if len != n => Err(ValidationError::Password(format!(
                "password must be exactly {n} characters long (got {len})"
            ))),
            Self::AtLeast(n) if len < n => Err(ValidationError::Password(format!(
                "password must be at least {n} characters long (got {len})"
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exact:{n}"),
            Self::AtLeast(n) => write!(f, "min:{n}"),
        }
    }
}

impl FromStr for PasswordPolicy {
    type Err = String;

    /// Parses `exact:N` or `min:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, n) = s
            .split_once(':')
            .ok_or_else(|| format!("expected 'exact:N' or 'min:N', got '{s}'"))?;
        let n: usize = n
            .trim()
            .parse()
            .map_err(|_| format!("invalid length in password policy '{s}'"))?;
        match kind.trim() {
            "exact" => Ok(Self::Exact(n)),
            "min" => Ok(Self::AtLeast(n)),
            other => Err(format!("unknown password policy '{other}'")),
        }
    }
}
