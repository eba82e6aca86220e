// ── Sensor resource client ──
//
// Best-effort CRUD over `/api/sensors`. Each operation makes at most one
// request and always resolves; failures become notices.

use sensordesk_api::models::{NewSensorDto, SensorDto};
use sensordesk_api::ApiClient;
use tracing::debug;

use crate::model::{Sensor, SensorDraft, SensorId};
use crate::notice::NoticeSink;
use crate::outcome::{Failure, Outcome};

/// Default sort key for listings.
pub const DEFAULT_SORT: &str = "name";

/// Best-effort sensor operations.
#[derive(Debug, Clone)]
pub struct SensorService {
    api: ApiClient,
    notices: NoticeSink,
    page_size: u32,
}

impl SensorService {
    pub fn new(api: ApiClient, notices: NoticeSink, page_size: u32) -> Self {
        Self {
            api,
            notices,
            page_size,
        }
    }

    /// One page of sensors. Pages start at 1.
    pub async fn list(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        sort: Option<&str>,
    ) -> Outcome<Vec<Sensor>> {
        const OP: &str = "sensors.list";
        let page = page.unwrap_or(1).max(1);
        let size = page_size.unwrap_or(self.page_size);
        let sort = sort.unwrap_or(DEFAULT_SORT);

        match self.api.list_sensors(page, size, sort).await {
            Ok(dtos) => self.decode_all(OP, dtos),
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    /// A single sensor. A 404 is `Empty`, not a failure.
    pub async fn get_by_id(&self, id: SensorId) -> Outcome<Sensor> {
        const OP: &str = "sensors.get";
        match self.api.get_sensor(id).await {
            Ok(dto) => self.decode(OP, dto),
            Err(e) if e.is_not_found() => {
                debug!(id, "sensor not found");
                Outcome::Empty
            }
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    /// Sensors matching `term`. A blank term matches nothing and makes no
    /// request.
    pub async fn search(&self, term: &str) -> Outcome<Vec<Sensor>> {
        const OP: &str = "sensors.search";
        let term = term.trim();
        if term.is_empty() {
            return Outcome::Empty;
        }
        match self.api.search_sensors(term).await {
            Ok(dtos) => self.decode_all(OP, dtos),
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    /// Validate `draft` locally, then create it. Invalid drafts never
    /// reach the backend.
    pub async fn create(&self, draft: &SensorDraft) -> Outcome<Sensor> {
        const OP: &str = "sensors.create";
        let new = match draft.validate() {
            Ok(new) => new,
            Err(e) => return self.notices.best_effort(OP, Failure::Invalid(e.to_string())),
        };
        match self.api.create_sensor(&NewSensorDto::from(&new)).await {
            Ok(dto) => self.decode(OP, dto),
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    /// Replace the stored record for `sensor.id` with `sensor`.
    pub async fn update(&self, sensor: &Sensor) -> Outcome<Sensor> {
        const OP: &str = "sensors.update";
        if let Err(e) = crate::validate::required("name", &sensor.name) {
            return self.notices.best_effort(OP, Failure::Invalid(e.to_string()));
        }
        match self.api.update_sensor(&SensorDto::from(sensor)).await {
            Ok(dto) => self.decode(OP, dto),
            Err(e) => self.notices.best_effort(OP, Failure::from(&e)),
        }
    }

    // ── Decoding ─────────────────────────────────────────────────────

    fn decode(&self, op: &'static str, dto: SensorDto) -> Outcome<Sensor> {
        match Sensor::try_from(dto) {
            Ok(sensor) => Outcome::Ok(sensor),
            Err(e) => self.notices.best_effort(op, Failure::Decode(e.to_string())),
        }
    }

    /// Decode each row on its own. Rows the domain cannot represent are
    /// skipped and reported in one notice; the rest are kept.
    fn decode_all(&self, op: &'static str, dtos: Vec<SensorDto>) -> Outcome<Vec<Sensor>> {
        let total = dtos.len();
        let mut sensors = Vec::with_capacity(total);
        let mut skipped = Vec::new();
        let mut first_error = None;
        for dto in dtos {
            let id = dto.id;
            match Sensor::try_from(dto) {
                Ok(sensor) => sensors.push(sensor),
                Err(e) => {
                    skipped.push(id.to_string());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        let Some(error) = first_error else {
            return Outcome::from_vec(sensors);
        };
        let failure = Failure::Decode(format!(
            "skipped sensor(s) {} of {total}: {error}",
            skipped.join(", ")
        ));
        if sensors.is_empty() {
            return self.notices.best_effort(op, failure);
        }
        self.notices.report(op, failure);
        Outcome::Ok(sensors)
    }
}
