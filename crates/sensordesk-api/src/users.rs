// User endpoints
//
// Everything under `/v1/users`. Create, list and edit are POSTs guarded by
// the `Authorization` / `Role` headers; the backend lets admins through and,
// for edit, the user themself (matched via the `uuid` header).

use tracing::debug;

use crate::client::{ApiClient, AuthHeaders};
use crate::error::Error;
use crate::models::{CreatedUser, NewUserDto, UserDto, UserListRequest};

impl ApiClient {
    /// Fetch one user.
    ///
    /// `GET /v1/users/{uuid}`
    pub async fn get_user(&self, uuid: &str) -> Result<UserDto, Error> {
        let url = self.url(&format!("v1/users/{uuid}"))?;
        debug!(uuid, "fetching user");
        self.get(url, None).await
    }

    /// Create a user (admin only). Returns the new uuid.
    ///
    /// `POST /v1/users/create`
    pub async fn create_user(&self, user: &NewUserDto, auth: &AuthHeaders) -> Result<String, Error> {
        let url = self.url("v1/users/create")?;
        debug!(email = %user.email, "creating user");
        let created: CreatedUser = self.post(url, user, Some(auth)).await?;
        Ok(created.uuid)
    }

    /// Search and sort users by name/email.
    ///
    /// `POST /v1/users/list` with `{"search": "...", "sort": -1|0|1}`
    pub async fn list_users(
        &self,
        query: &UserListRequest,
        auth: &AuthHeaders,
    ) -> Result<Vec<UserDto>, Error> {
        let url = self.url("v1/users/list")?;
        debug!(search = %query.search, sort = query.sort, "listing users");
        self.post(url, query, Some(auth)).await
    }

    /// Update a user's details.
    ///
    /// `POST /v1/users/edit` with the full user record.
    pub async fn edit_user(&self, user: &UserDto, auth: &AuthHeaders) -> Result<(), Error> {
        let url = self.url("v1/users/edit")?;
        debug!(uuid = %user.uuid, "editing user");
        self.post_discard(url, Some(user), Some(auth)).await
    }
}
