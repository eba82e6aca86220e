// ── User resource client ──
//
// Best-effort user management. Everything except `get` acts on behalf of
// the signed-in user and carries the session headers.

use sensordesk_api::models::{NewUserDto, UserDto, UserListRequest};
use sensordesk_api::{ApiClient, AuthHeaders, Error as ApiError};
use tracing::{debug, warn};

use crate::model::{NewUser, User, UserQuery};
use crate::notice::NoticeSink;
use crate::outcome::{Failure, Outcome};
use crate::session::SessionContext;

/// Best-effort user operations.
#[derive(Debug, Clone)]
pub struct UserService {
    api: ApiClient,
    notices: NoticeSink,
    session: SessionContext,
}

impl UserService {
    pub fn new(api: ApiClient, notices: NoticeSink, session: SessionContext) -> Self {
        Self {
            api,
            notices,
            session,
        }
    }

    pub async fn get(&self, uuid: &str) -> Outcome<User> {
        const OP: &str = "users.get";
        if uuid.trim().is_empty() {
            return self
                .notices
                .best_effort(OP, Failure::Invalid("uuid is required".into()));
        }
        match self.api.get_user(uuid).await {
            Ok(dto) => Outcome::Ok(User::from(dto)),
            Err(e) if e.is_not_found() => Outcome::Empty,
            // No token was sent, so a 401 says nothing about the session.
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    /// Create a user and return the backend-assigned uuid.
    pub async fn create(&self, user: &NewUser) -> Outcome<String> {
        const OP: &str = "users.create";
        if let Err(e) = user.validate() {
            return self.notices.best_effort(OP, Failure::Invalid(e.to_string()));
        }
        let Some(auth) = self.headers(OP) else {
            return Outcome::Failed(Failure::NoSession);
        };
        match self.api.create_user(&NewUserDto::from(user), &auth).await {
            Ok(uuid) => {
                debug!(%uuid, "user created");
                Outcome::Ok(uuid)
            }
            Err(e) => self.fail(OP, &e),
        }
    }

    pub async fn list(&self, query: &UserQuery) -> Outcome<Vec<User>> {
        const OP: &str = "users.list";
        let Some(auth) = self.headers(OP) else {
            return Outcome::Failed(Failure::NoSession);
        };
        match self.api.list_users(&UserListRequest::from(query), &auth).await {
            Ok(dtos) => Outcome::from_vec(dtos.into_iter().map(User::from).collect()),
            Err(e) => self.fail(OP, &e),
        }
    }

    /// Save changes to `user`. The backend allows this for admins and for
    /// the user themself.
    pub async fn edit(&self, user: &User) -> Outcome<()> {
        const OP: &str = "users.edit";
        if let Err(e) = user.validate() {
            return self.notices.best_effort(OP, Failure::Invalid(e.to_string()));
        }
        let Some(auth) = self.headers(OP) else {
            return Outcome::Failed(Failure::NoSession);
        };
        match self.api.edit_user(&UserDto::from(user), &auth).await {
            Ok(()) => Outcome::Ok(()),
            Err(e) => self.fail(OP, &e),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Session headers, or a reported `NoSession` failure.
    fn headers(&self, op: &'static str) -> Option<AuthHeaders> {
        let headers = self.session.auth_headers();
        if headers.is_none() {
            self.notices.report(op, Failure::NoSession);
        }
        headers
    }

    /// Report `err` from a call that carried the session headers. A
    /// rejected token also ends the local session.
    fn fail<T>(&self, op: &'static str, err: &ApiError) -> Outcome<T> {
        if err.is_auth_expired() && self.session.is_signed_in() {
            warn!(operation = op, "token rejected, clearing session");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear session");
            }
        }
        self.notices.best_effort(op, Failure::from(err))
    }
}
