#![allow(clippy::unwrap_used)]
// Integration tests for the sensordesk-core services against a mock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use url::Url;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sensordesk_api::ApiClient;
use sensordesk_core::{
    Backend, ClientConfig, CoreError, Failure, FileSessionStore, NewUser, Outcome, Role,
    SensorCategory, SensorColor, SensorDraft, SessionContext, SortOrder, UserQuery, Visibility,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn backend_for(base: &str, session: SessionContext) -> Backend {
    let url = Url::parse(base).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), url.clone());
    Backend::with_api(ClientConfig::new(url), api, session)
}

async fn setup() -> (MockServer, Backend) {
    let server = MockServer::start().await;
    let backend = backend_for(&server.uri(), SessionContext::in_memory());
    (server, backend)
}

/// A backend URL nothing listens on.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn sensor_json(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id, "name": name, "category": "Humidity", "color": "Blue",
        "description": "", "visibility": "public"
    })
}

fn login_body() -> serde_json::Value {
    json!({
        "token": "jwt-abc",
        "user": {
            "id": "u-1", "name": "Ana", "email": "ana@x.com",
            "phone": "+351912345678", "role": true
        }
    })
}

async fn sign_in(server: &MockServer, backend: &Backend) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(server)
        .await;
    backend
        .auth()
        .login("ana@x.com", &SecretString::from("abcdefghijkl".to_string()))
        .await
        .unwrap();
}

fn new_user() -> NewUser {
    NewUser {
        name: "Rui".into(),
        email: "rui@x.com".into(),
        phone: "+351911111111".into(),
        picture: None,
        role: Role::User,
    }
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_search_makes_no_request() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;
    let sensors = backend.sensors();

    assert_eq!(sensors.search("").await, Outcome::Empty);
    assert_eq!(sensors.search("   ").await, Outcome::Empty);
}

#[tokio::test]
async fn search_sends_trimmed_term() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .and(query_param("term", "attic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sensor_json(4, "Attic")])))
        .expect(1)
        .mount(&server)
        .await;

    let found = backend.sensors().search("  attic ").await.ok().unwrap();
    assert_eq!(found[0].name, "Attic");
    assert_eq!(found[0].color, Some(SensorColor::Blue));
}

#[tokio::test]
async fn invalid_draft_makes_no_request() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;
    let sensors = backend.sensors();
    let mut notices = backend.notices().subscribe();

    let blank_name = SensorDraft {
        name: "  ".into(),
        category: Some(SensorCategory::Pressure),
        ..SensorDraft::default()
    };
    let no_category = SensorDraft {
        name: "Boiler".into(),
        ..SensorDraft::default()
    };

    for draft in [blank_name, no_category] {
        let outcome = sensors.create(&draft).await;
        assert!(matches!(outcome, Outcome::Failed(Failure::Invalid(_))));
        assert_eq!(notices.recv().await.unwrap().operation, "sensors.create");
    }
}

#[tokio::test]
async fn create_posts_without_id() {
    let (server, backend) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/sensors"))
        .and(body_json(json!({
            "name": "Attic", "category": "Humidity", "color": "Blue",
            "description": "", "visibility": "public"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(sensor_json(11, "Attic")))
        .expect(1)
        .mount(&server)
        .await;

    let draft = SensorDraft {
        name: "Attic".into(),
        category: Some(SensorCategory::Humidity),
        color: Some(SensorColor::Blue),
        description: String::new(),
        visibility: Visibility::Public,
    };
    let created = backend.sensors().create(&draft).await.ok().unwrap();
    assert_eq!(created.id, 11);
}

#[tokio::test]
async fn list_uses_defaults_and_reports_empty() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(backend.sensors().list(None, None, None).await, Outcome::Empty);
}

#[tokio::test]
async fn get_by_id_tells_missing_from_broken() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/500"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;
    let mut notices = backend.notices().subscribe();
    let sensors = backend.sensors();

    assert_eq!(sensors.get_by_id(404).await, Outcome::Empty);
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

    let broken = sensors.get_by_id(500).await;
    assert_eq!(
        broken.failure(),
        Some(&Failure::Server {
            status: 500,
            message: "db down".into()
        })
    );
    assert_eq!(notices.recv().await.unwrap().operation, "sensors.get");
}

#[tokio::test]
async fn unknown_category_is_a_decode_failure() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Meter", "category": "Voltage",
            "description": "", "visibility": "private"
        })))
        .mount(&server)
        .await;

    let outcome = backend.sensors().get_by_id(3).await;
    assert!(matches!(outcome, Outcome::Failed(Failure::Decode(_))));
}

#[tokio::test]
async fn list_keeps_rows_that_decode() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sensor_json(1, "Porch"),
            { "id": 2, "name": "Lamp", "category": "Light", "description": "", "visibility": "public" },
            sensor_json(3, "Cellar"),
        ])))
        .mount(&server)
        .await;
    let mut notices = backend.notices().subscribe();

    let sensors = backend.sensors().list(None, None, None).await.ok().unwrap();
    let names: Vec<_> = sensors.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Porch", "Cellar"]);

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.operation, "sensors.list");
    assert!(matches!(&notice.failure, Failure::Decode(msg) if msg.contains("sensor(s) 2 of 3")));
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn search_fails_when_no_row_decodes() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "name": "Lamp", "category": "Light", "description": "", "visibility": "public" },
        ])))
        .mount(&server)
        .await;

    let outcome = backend.sensors().search("lamp").await;
    assert!(matches!(outcome, Outcome::Failed(Failure::Decode(_))));
}

#[tokio::test]
async fn update_puts_full_record() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sensor_json(4, "Attic")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/sensors/4"))
        .and(body_json(json!({
            "id": 4, "name": "Loft", "category": "Humidity", "color": "Blue",
            "description": "", "visibility": "public"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sensor_json(4, "Loft")))
        .expect(1)
        .mount(&server)
        .await;

    let sensors = backend.sensors();
    let mut sensor = sensors.get_by_id(4).await.ok().unwrap();
    sensor.name = "Loft".into();
    assert_eq!(sensors.update(&sensor).await.ok().unwrap().name, "Loft");
}

// ── Best-effort vs. authentication ──────────────────────────────────

#[tokio::test]
async fn transport_failure_resolves_lists_but_fails_login() {
    let backend = backend_for(&dead_url(), SessionContext::in_memory());
    let mut notices = backend.notices().subscribe();

    let listed = backend.sensors().list(None, None, None).await;
    assert!(matches!(listed, Outcome::Failed(Failure::Unreachable(_))));
    assert!(listed.into_fallback(Vec::new()).is_empty());
    assert_eq!(notices.recv().await.unwrap().operation, "sensors.list");
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

    let login = backend
        .auth()
        .login("user@x.com", &SecretString::from("validpasswd1".to_string()))
        .await;
    assert!(matches!(login, Err(CoreError::ConnectionFailed { .. })));
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn slow_backend_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let url = Url::parse(&server.uri()).unwrap();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let api = ApiClient::with_client(http, url.clone());
    let backend = Backend::with_api(ClientConfig::new(url), api, SessionContext::in_memory());

    let outcome = backend.sensors().list(None, None, None).await;
    assert_eq!(outcome.failure(), Some(&Failure::Timeout));

    let err = backend
        .auth()
        .login("ana@x.com", &SecretString::from("abcdefghijkl".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Timeout));
}

#[tokio::test]
async fn login_rejects_bad_email_before_password() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;

    let err = backend
        .auth()
        .login("not-an-email", &SecretString::from("validpassword12".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidEmail { .. }));
}

#[tokio::test]
async fn login_rejects_short_password() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;

    let err = backend
        .auth()
        .login("user@x.com", &SecretString::from("short".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidPassword { .. }));
}

#[tokio::test]
async fn login_failure_is_an_error_and_keeps_signed_out() {
    let (server, backend) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = backend
        .auth()
        .login("ana@x.com", &SecretString::from("abcdefghijkl".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(!backend.session().is_signed_in());
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path_on_disk = dir.path().join("session.json");

    let backend = backend_for(
        &server.uri(),
        SessionContext::restore(FileSessionStore::new(&path_on_disk)),
    );
    sign_in(&server, &backend).await;
    assert!(path_on_disk.exists());

    let restarted = backend_for(
        &server.uri(),
        SessionContext::restore(FileSessionStore::new(&path_on_disk)),
    );
    let session = restarted.auth().current().unwrap();
    assert_eq!(session.user.uuid, "u-1");
    assert_eq!(session.user.role, Role::Admin);

    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    restarted.auth().logout().await.unwrap();
    assert!(!path_on_disk.exists());
    assert!(restarted.auth().current().is_none());
}

#[tokio::test]
async fn logout_clears_locally_when_backend_fails() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend.auth().logout().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    assert!(!backend.session().is_signed_in());
}

#[tokio::test]
async fn logout_without_session_is_an_error() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;
    assert!(matches!(backend.auth().logout().await, Err(CoreError::NoSession)));
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn user_create_without_session_fails_locally() {
    let (server, backend) = setup().await;
    expect_no_requests(&server).await;
    let mut notices = backend.notices().subscribe();

    let outcome = backend.users().create(&new_user()).await;
    assert_eq!(outcome, Outcome::Failed(Failure::NoSession));
    assert_eq!(notices.recv().await.unwrap().failure, Failure::NoSession);
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn user_create_sends_session_headers() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/create"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(header("role", "true"))
        .and(body_json(json!({
            "name": "Rui", "email": "rui@x.com", "phone": "+351911111111", "role": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "userId": "u-2" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(backend.users().create(&new_user()).await, Outcome::Ok("u-2".into()));
}

#[tokio::test]
async fn user_list_encodes_query() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/list"))
        .and(body_json(json!({ "search": "an", "sort": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "uuid": "u-1", "name": "Ana", "email": "ana@x.com", "phone": "+351900", "role": true },
            { "uuid": "u-3", "name": "Joana", "email": "jo@x.com", "phone": "+351901", "role": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = UserQuery {
        search: "an".into(),
        sort: SortOrder::Ascending,
    };
    let users = backend.users().list(&query).await.ok().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].role, Role::User);
}

#[tokio::test]
async fn rejected_token_ends_the_session() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "token expired" })))
        .mount(&server)
        .await;

    let outcome = backend.users().list(&UserQuery::default()).await;
    assert_eq!(
        outcome.failure(),
        Some(&Failure::Unauthorized("token expired".into()))
    );
    assert!(!backend.session().is_signed_in());
}

#[tokio::test]
async fn unauthenticated_lookup_keeps_the_session() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("GET"))
        .and(path("/v1/users/other"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let outcome = backend.users().get("other").await;
    assert_eq!(outcome.failure(), Some(&Failure::Unauthorized("nope".into())));
    assert!(backend.session().is_signed_in());
}

#[tokio::test]
async fn user_edit_sends_uuid_header() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("GET"))
        .and(path("/v1/users/u-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u-3", "name": "Joana", "email": "jo@x.com", "phone": "+351901", "role": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users/edit"))
        .and(header("uuid", "u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let users = backend.users();
    let mut user = users.get("u-3").await.ok().unwrap();
    user.phone = "+351902".into();
    assert_eq!(users.edit(&user).await, Outcome::Ok(()));
}

#[tokio::test]
async fn forbidden_create_is_reported_once() {
    let (server, backend) = setup().await;
    sign_in(&server, &backend).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/create"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "admins only" })))
        .mount(&server)
        .await;
    let mut notices = backend.notices().subscribe();

    let outcome = backend.users().create(&new_user()).await;
    assert!(matches!(outcome, Outcome::Failed(Failure::Forbidden(_))));
    assert_eq!(notices.recv().await.unwrap().operation, "users.create");
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
    assert!(backend.session().is_signed_in());
}
