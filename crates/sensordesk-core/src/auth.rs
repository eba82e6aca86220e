// ── Authentication flow ──
//
// Unlike the resource services, authentication fails loudly: the caller
// needs to know why a login did not happen.

use secrecy::{ExposeSecret, SecretString};
use sensordesk_api::ApiClient;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::User;
use crate::session::{Session, SessionContext};
use crate::validate::{self, PasswordPolicy};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionContext,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionContext, policy: PasswordPolicy) -> Self {
        Self {
            api,
            session,
            policy,
        }
    }

    /// Sign in and make the new session current.
    ///
    /// The email is checked before the password, and both before any
    /// request is sent.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        let email = email.trim();
        validate::email(email)?;
        self.policy.check(password.expose_secret())?;

        let resp = self.api.login(email, password).await?;
        let session = Session::new(SecretString::from(resp.token), User::from(resp.user));
        self.session.set(session.clone())?;

        info!(user = %session.user.email, role = %session.user.role, "signed in");
        Ok(session)
    }

    /// Sign out.
    ///
    /// The local session is cleared even when the backend call fails; that
    /// failure is still returned.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let Some(headers) = self.session.auth_headers() else {
            return Err(CoreError::NoSession);
        };
        let remote = self.api.logout(&headers).await;
        self.session.clear()?;

        match remote {
            Ok(()) => {
                info!("signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "backend logout failed, local session cleared");
                Err(e.into())
            }
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.current()
    }
}
