// ── Sensor domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

use crate::validate::{self, ValidationError};

/// Backend-assigned sensor identity.
pub type SensorId = u32;

/// What a sensor measures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum SensorCategory {
    Temperature,
    Humidity,
    Pressure,
}

/// Display color used by the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum SensorColor {
    Red,
    Green,
    Blue,
    Yellow,
}

/// Who can see a sensor.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// A sensor as stored by the backend. Always carries its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub category: SensorCategory,
    pub color: Option<SensorColor>,
    pub description: String,
    pub visibility: Visibility,
}

/// Unvalidated creation input, as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorDraft {
    pub name: String,
    pub category: Option<SensorCategory>,
    pub color: Option<SensorColor>,
    pub description: String,
    pub visibility: Visibility,
}

/// A validated creation request. Has no id by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSensor {
    pub name: String,
    pub category: SensorCategory,
    pub color: Option<SensorColor>,
    pub description: String,
    pub visibility: Visibility,
}

impl SensorDraft {
    /// Check the required fields: a non-blank name and a category.
    pub fn validate(&self) -> Result<NewSensor, ValidationError> {
        validate::required("name", &self.name)?;
        let category = self.category.ok_or(ValidationError::Required("category"))?;
        Ok(NewSensor {
            name: self.name.trim().to_owned(),
            category,
            color: self.color,
            description: self.description.clone(),
            visibility: self.visibility,
        })
    }
}
