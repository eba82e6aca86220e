// sensordesk-api: async client for the sensor and user administration REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod sensors;
pub mod transport;
pub mod users;

pub use client::{ApiClient, AuthHeaders};
pub use error::Error;
pub use models::{
    CreatedUser, LoginResponse, NewSensorDto, NewUserDto, SensorDto, UserDto, UserListRequest,
};
pub use transport::{TlsMode, TransportConfig};
