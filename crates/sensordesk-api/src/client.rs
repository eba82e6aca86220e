// sensordesk HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining, bearer/role headers,
// and status-to-error mapping. The endpoint modules (auth, sensors, users)
// are inherent methods in separate files so this one stays focused on
// transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Headers the user endpoints expect from an authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    /// Session token, sent as `Authorization: Bearer <token>`.
    pub token: SecretString,
    /// Sent as `Role: true|false`.
    pub admin: bool,
    /// Caller's own uuid, sent as `uuid` where the backend checks
    /// "admin or the user themself".
    pub uuid: Option<String>,
}

/// Raw HTTP client for the sensordesk backend.
///
/// Stateless with respect to sessions: callers pass [`AuthHeaders`] where
/// an endpoint needs them. Every method returns the decoded payload or an
/// [`Error`]; no fallback values are produced at this layer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:8080`); a
    /// path prefix such as `https://host/backend` is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a backend path, e.g. `api/sensors/3`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: Option<&AuthHeaders>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let builder = apply_auth(self.http.get(url), auth);
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        auth: Option<&AuthHeaders>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let builder = apply_auth(self.http.post(url).json(body), auth);
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a PUT request with a JSON body and decode the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        auth: Option<&AuthHeaders>,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let builder = apply_auth(self.http.put(url).json(body), auth);
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a POST request whose response body is not needed.
    pub(crate) async fn post_discard(
        &self,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
        auth: Option<&AuthHeaders>,
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = apply_auth(builder, auth).send().await?;
        check_status(resp).await.map(drop)
    }
}

fn apply_auth(
    builder: reqwest::RequestBuilder,
    auth: Option<&AuthHeaders>,
) -> reqwest::RequestBuilder {
    let Some(auth) = auth else {
        return builder;
    };
    let mut builder = builder
        .bearer_auth(auth.token.expose_secret())
        .header("Role", if auth.admin { "true" } else { "false" });
    if let Some(ref uuid) = auth.uuid {
        builder = builder.header("uuid", uuid);
    }
    builder
}

/// Map non-success statuses to typed errors, passing successful
/// responses through untouched.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_owned();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| preview(&body).to_owned());

    trace!(%status, %path, "request failed");

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED => Error::Authentication {
            message: if message.is_empty() {
                "invalid or expired token".into()
            } else {
                message
            },
        },
        reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
        reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    })
}

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
