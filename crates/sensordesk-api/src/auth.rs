// Authentication endpoints
//
// Token-based login/logout. The login response carries the bearer token
// and the user record; storing them is the caller's business.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, AuthHeaders};
use crate::error::Error;
use crate::models::LoginResponse;

impl ApiClient {
    /// Exchange email + password for a session token.
    ///
    /// `POST /v1/auth/login` with `{"email", "password"}`. Any non-success
    /// status is returned as an error; a 401 becomes
    /// [`Error::Authentication`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.url("v1/auth/login")?;
        debug!(email, "logging in");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp: LoginResponse = self.post(url, &body, None).await?;
        debug!(user = %resp.user.uuid, "login successful");
        Ok(resp)
    }

    /// Invalidate the token server-side.
    ///
    /// `POST /v1/auth/logout` with the bearer token.
    pub async fn logout(&self, auth: &AuthHeaders) -> Result<(), Error> {
        let url = self.url("v1/auth/logout")?;
        debug!("logging out");
        self.post_discard(url, None::<&()>, Some(auth)).await?;
        debug!("logout complete");
        Ok(())
    }
}
