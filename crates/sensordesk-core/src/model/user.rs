// ── User domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::validate::{self, ValidationError};

/// Account role. The backend stores it as a boolean.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<bool> for Role {
    fn from(admin: bool) -> Self {
        if admin { Self::Admin } else { Self::User }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub picture: Option<String>,
    pub role: Role,
}

/// Input for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub picture: Option<String>,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("name", &self.name)?;
        validate::email(&self.email)?;
        validate::phone(&self.phone)
    }
}

impl User {
    /// Same rules as creation; edits may not blank out required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("uuid", &self.uuid)?;
        validate::required("name", &self.name)?;
        validate::email(&self.email)?;
        validate::phone(&self.phone)
    }
}

/// Ordering of a user listing, by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[strum(serialize = "asc")]
    Ascending,
    #[strum(serialize = "desc")]
    Descending,
    #[default]
    #[strum(serialize = "none")]
    Unordered,
}

impl SortOrder {
    /// Wire encoding used by `/v1/users/list`.
    pub fn as_wire(self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
            Self::Unordered => 0,
        }
    }
}

/// A user search: substring over name and email, plus ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub search: String,
    pub sort: SortOrder,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            name: "Rui".into(),
            email: "rui@x.com".into(),
            phone: "+351911111111".into(),
            picture: None,
            role: Role::User,
        }
    }

    #[test]
    fn valid_new_user_passes() {
        assert!(new_user().validate().is_ok());
    }

    #[test]
    fn new_user_field_checks() {
        let mut user = new_user();
        user.name = String::new();
        assert_eq!(user.validate(), Err(ValidationError::Required("name")));

        let mut user = new_user();
        user.email = "rui".into();
        assert!(matches!(user.validate(), Err(ValidationError::InvalidEmail(_))));

        let mut user = new_user();
        user.phone = "phone".into();
        assert!(matches!(user.validate(), Err(ValidationError::InvalidPhone(_))));
    }

    #[test]
    fn sort_order_encoding() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.as_wire(), -1);
        assert_eq!(SortOrder::default().as_wire(), 0);
        assert_eq!(SortOrder::Ascending.to_string(), "asc");
    }

    #[test]
    fn role_from_flag() {
        assert!(Role::from(true).is_admin());
        assert_eq!(Role::from(false), Role::User);
    }
}
