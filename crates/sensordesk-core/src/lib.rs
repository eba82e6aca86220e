//! Domain layer between `sensordesk-api` and the command-line front-end.
//!
//! - **[`Backend`]**: Facade over one server. Owns the HTTP client, the
//!   [`SessionContext`] and the [`NoticeSink`], and vends the services.
//!
//! - **[`SensorService`] / [`UserService`]**: Best-effort resource
//!   clients. Every operation resolves to an [`Outcome`]; failures are
//!   logged and broadcast as [`Notice`]s instead of being returned as
//!   errors.
//!
//! - **[`AuthService`]**: Login and logout. These fail loudly with
//!   [`CoreError`], and a successful login is persisted through the
//!   session's [`SessionStore`].
//!
//! - **[`SearchDebouncer`]**: Debounced, distinct-until-changed,
//!   switch-to-latest search over any async query.

pub mod auth;
pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod notice;
pub mod outcome;
pub mod search;
pub mod sensors;
pub mod session;
pub mod users;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::AuthService;
pub use backend::Backend;
pub use config::{ClientConfig, TlsVerification};
pub use error::CoreError;
pub use notice::{Notice, NoticeSink};
pub use outcome::{Failure, Outcome};
pub use search::{SearchDebouncer, SearchResult};
pub use sensors::SensorService;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionContext, SessionStore};
pub use users::UserService;
pub use validate::{PasswordPolicy, ValidationError};

pub use model::{
    NewSensor, NewUser, Role, Sensor, SensorCategory, SensorColor, SensorDraft, SensorId,
    SortOrder, User, UserQuery, Visibility,
};
