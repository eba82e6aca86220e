// ── Domain model ──
//
// Canonical, strongly typed versions of the backend records. Wire types
// live in `sensordesk_api::models`; `crate::convert` maps between them.

pub mod sensor;
pub mod user;

pub use sensor::{
    NewSensor, Sensor, SensorCategory, SensorColor, SensorDraft, SensorId, Visibility,
};
pub use user::{NewUser, Role, SortOrder, User, UserQuery};
