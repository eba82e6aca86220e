// ── Wire ↔ domain conversions ──
//
// `sensordesk_api::models` carries enum fields as strings. Parsing them
// here means a record with an unknown category is a decode failure, not
// a silently mislabelled sensor.

use sensordesk_api::models::{NewSensorDto, NewUserDto, SensorDto, UserDto, UserListRequest};
use thiserror::Error;

use crate::model::{NewSensor, NewUser, Role, Sensor, User, UserQuery};

/// A wire field held a value the domain model does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

fn parse<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, UnknownVariant> {
    value.parse().map_err(|_| UnknownVariant {
        field,
        value: value.to_owned(),
    })
}

// ── Sensors ──────────────────────────────────────────────────────────

impl TryFrom<SensorDto> for Sensor {
    type Error = UnknownVariant;

    fn try_from(dto: SensorDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            category: parse("category", &dto.category)?,
            color: dto
                .color
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| parse("color", c))
                .transpose()?,
            visibility: parse("visibility", &dto.visibility)?,
            name: dto.name,
            description: dto.description,
        })
    }
}

impl From<&Sensor> for SensorDto {
    fn from(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id,
            name: sensor.name.clone(),
            category: sensor.category.to_string(),
            color: sensor.color.map(|c| c.to_string()),
            description: sensor.description.clone(),
            visibility: sensor.visibility.to_string(),
        }
    }
}

impl From<&NewSensor> for NewSensorDto {
    fn from(sensor: &NewSensor) -> Self {
        Self {
            name: sensor.name.clone(),
            category: sensor.category.to_string(),
            color: sensor.color.map(|c| c.to_string()),
            description: sensor.description.clone(),
            visibility: sensor.visibility.to_string(),
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            uuid: dto.uuid,
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            picture: dto.picture.filter(|p| !p.is_empty()),
            role: Role::from(dto.role),
        }
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
            role: user.role.is_admin(),
        }
    }
}

impl From<&NewUser> for NewUserDto {
    fn from(user: &NewUser) -> Self {
        Self {
            name: user.name.trim().to_owned(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
            role: user.role.is_admin(),
        }
    }
}

impl From<&UserQuery> for UserListRequest {
    fn from(query: &UserQuery) -> Self {
        Self {
            search: query.search.clone(),
            sort: query.sort.as_wire(),
        }
    }
}
