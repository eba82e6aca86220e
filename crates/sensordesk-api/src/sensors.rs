// Sensor endpoints
//
// Plain CRUD under `/api/sensors`. No auth headers are sent; the sensor
// routes are public on the backend.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{NewSensorDto, SensorDto};

impl ApiClient {
    /// List one page of sensors ordered by `sort`.
    ///
    /// `GET /api/sensors?page={page}&size={size}&sort={sort}`
    pub async fn list_sensors(
        &self,
        page: u32,
        size: u32,
        sort: &str,
    ) -> Result<Vec<SensorDto>, Error> {
        let mut url = self.url("api/sensors")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string())
            .append_pair("sort", sort);
        debug!(page, size, sort, "listing sensors");
        self.get(url, None).await
    }

    /// Fetch one sensor.
    ///
    /// `GET /api/sensors/{id}`
    pub async fn get_sensor(&self, id: u32) -> Result<SensorDto, Error> {
        let url = self.url(&format!("api/sensors/{id}"))?;
        debug!(id, "fetching sensor");
        self.get(url, None).await
    }

    /// Full-text search by term. The term is sent as-is (URL-encoded).
    ///
    /// `GET /api/sensors/search?term={term}`
    pub async fn search_sensors(&self, term: &str) -> Result<Vec<SensorDto>, Error> {
        let mut url = self.url("api/sensors/search")?;
        url.query_pairs_mut().append_pair("term", term);
        debug!(term, "searching sensors");
        self.get(url, None).await
    }

    /// Create a sensor. The backend assigns the id.
    ///
    /// `POST /api/sensors`
    pub async fn create_sensor(&self, sensor: &NewSensorDto) -> Result<SensorDto, Error> {
        let url = self.url("api/sensors")?;
        debug!(name = %sensor.name, "creating sensor");
        self.post(url, sensor, None).await
    }

    /// Replace a sensor record.
    ///
    /// `PUT /api/sensors/{id}` with the full record.
    pub async fn update_sensor(&self, sensor: &SensorDto) -> Result<SensorDto, Error> {
        let url = self.url(&format!("api/sensors/{}", sensor.id))?;
        debug!(id = sensor.id, "updating sensor");
        self.put(url, sensor, None).await
    }
}
