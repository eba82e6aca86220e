// ── Backend facade ──
//
// One `Backend` per configured server. It owns the HTTP client, the
// session and the notice channel, and hands out services that share them.

use std::sync::Arc;

use sensordesk_api::{ApiClient, TlsMode, TransportConfig};
use tracing::debug;

use crate::auth::AuthService;
use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::Sensor;
use crate::notice::NoticeSink;
use crate::outcome::Outcome;
use crate::search::SearchDebouncer;
use crate::sensors::SensorService;
use crate::session::SessionContext;
use crate::users::UserService;

/// Cheaply cloneable handle to one backend.
#[derive(Debug, Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

#[derive(Debug)]
struct BackendInner {
    config: ClientConfig,
    api: ApiClient,
    session: SessionContext,
    notices: NoticeSink,
}

impl Backend {
    /// Build the HTTP client from `config`.
    pub fn new(config: ClientConfig, session: SessionContext) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let api = ApiClient::new(config.url.clone(), &transport)?;
        debug!(url = %config.url, timeout = ?config.timeout, "backend client ready");
        Ok(Self::with_api(config, api, session))
    }

    /// Use an already built client.
    pub fn with_api(config: ClientConfig, api: ApiClient, session: SessionContext) -> Self {
        Self {
            inner: Arc::new(BackendInner {
                config,
                api,
                session,
                notices: NoticeSink::new(),
            }),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    pub fn notices(&self) -> &NoticeSink {
        &self.inner.notices
    }

    pub fn sensors(&self) -> SensorService {
        SensorService::new(
            self.inner.api.clone(),
            self.inner.notices.clone(),
            self.inner.config.page_size,
        )
    }

    pub fn users(&self) -> UserService {
        UserService::new(
            self.inner.api.clone(),
            self.inner.notices.clone(),
            self.inner.session.clone(),
        )
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.inner.api.clone(),
            self.inner.session.clone(),
            self.inner.config.password_policy,
        )
    }

    /// A live sensor search using the configured quiescence window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn sensor_search(&self) -> SearchDebouncer<Outcome<Vec<Sensor>>> {
        let sensors = self.sensors();
        SearchDebouncer::spawn(self.inner.config.search_debounce, move |term, _cancel| {
            let sensors = sensors.clone();
            async move { sensors.search(&term).await }
        })
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
