// Wire types for the sensordesk REST API.
//
// These mirror the JSON the backend speaks and nothing more. Enum-typed
// fields (category, color, visibility) are carried as strings here and
// given meaning in `sensordesk-core`.

use serde::{Deserialize, Serialize};

/// A sensor record as returned by `/api/sensors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDto {
    pub id: u32,
    pub name: String,
    pub category: String,
    /// Older backends do not store a color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub description: String,
    pub visibility: String,
}

/// Body for `POST /api/sensors`. Has no `id` by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSensorDto {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub description: String,
    pub visibility: String,
}

/// A user record.
///
/// The users endpoints key the identity as `uuid`; the login response
/// uses `id`. Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(rename = "uuid", alias = "id", default)]
    pub uuid: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// `true` for administrators.
    #[serde(default)]
    pub role: bool,
}

/// Body for `POST /v1/users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUserDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub role: bool,
}

/// Body for `POST /v1/users/list`.
///
/// `sort` is `1` for ascending by name, `-1` for descending, `0` for none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListRequest {
    pub search: String,
    pub sort: i8,
}

/// Response of `POST /v1/users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedUser {
    #[serde(alias = "userId")]
    pub uuid: String,
}

/// Response of `POST /v1/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

/// Error body shape used by the backend: `{"error": "..."}`, sometimes
/// with an additional `message`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        match (self.message, self.error) {
            (Some(message), Some(error)) => Some(format!("{message}: {error}")),
            (message, error) => message.or(error),
        }
    }
}
