#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sensordesk_api::{ApiClient, AuthHeaders, Error, NewSensorDto, UserListRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn admin_headers() -> AuthHeaders {
    AuthHeaders {
        token: SecretString::from("tok-123".to_string()),
        admin: true,
        uuid: Some("u-1".into()),
    }
}

fn sensor_json(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "category": "Temperature",
        "color": "Red",
        "description": "boiler room",
        "visibility": "private"
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(body_json(json!({ "email": "ana@x.com", "password": "abcdefghijkl" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "user": {
                "id": "4a1c", "name": "Ana", "email": "ana@x.com",
                "phone": "+351912345678", "role": true, "picture": ""
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = SecretString::from("abcdefghijkl".to_string());
    let resp = client.login("ana@x.com", &secret).await.unwrap();

    assert_eq!(resp.token, "jwt-abc");
    assert_eq!(resp.user.uuid, "4a1c");
    assert!(resp.user.role);
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid email or password" })),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong-passwd".to_string());
    let result = client.login("ana@x.com", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "invalid email or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.logout(&admin_headers()).await.unwrap();
}

// ── Sensor tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sensors_sends_paging() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "name"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([sensor_json(1, "Boiler"), sensor_json(2, "Attic")])),
        )
        .mount(&server)
        .await;

    let sensors = client.list_sensors(2, 5, "name").await.unwrap();

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].name, "Boiler");
    assert_eq!(sensors[1].id, 2);
}

#[tokio::test]
async fn test_get_sensor_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_sensor(42).await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
}

#[tokio::test]
async fn test_search_sensors_encodes_term() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .and(query_param("term", "boiler room"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sensor_json(1, "Boiler")])))
        .expect(1)
        .mount(&server)
        .await;

    let found = client.search_sensors("boiler room").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_create_sensor_posts_without_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sensors"))
        .and(body_json(json!({
            "name": "Attic",
            "category": "Humidity",
            "description": "",
            "visibility": "public"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "name": "Attic", "category": "Humidity",
            "description": "", "visibility": "public"
        })))
        .mount(&server)
        .await;

    let created = client
        .create_sensor(&NewSensorDto {
            name: "Attic".into(),
            category: "Humidity".into(),
            color: None,
            description: String::new(),
            visibility: "public".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.color, None);
}

#[tokio::test]
async fn test_update_sensor_puts_full_record() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/sensors/1"))
        .and(body_json(sensor_json(1, "Boiler 2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(sensor_json(1, "Boiler 2")))
        .expect(1)
        .mount(&server)
        .await;

    let sensor = serde_json::from_value(sensor_json(1, "Boiler 2")).unwrap();
    let updated = client.update_sensor(&sensor).await.unwrap();
    assert_eq!(updated.name, "Boiler 2");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    match client.get_sensor(1).await {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── User tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_users_sends_headers_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/users/list"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(header("Role", "true"))
        .and(body_json(json!({ "search": "ana", "sort": -1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "uuid": "4a1c", "name": "Ana", "email": "ana@x.com", "phone": "+351912345678", "role": false
        }])))
        .mount(&server)
        .await;

    let users = client
        .list_users(
            &UserListRequest {
                search: "ana".into(),
                sort: -1,
            },
            &admin_headers(),
        )
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ana@x.com");
}

#[tokio::test]
async fn test_create_user_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/users/create"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "error": "only admins can access this route" })),
        )
        .mount(&server)
        .await;

    let user = sensordesk_api::NewUserDto {
        name: "Rui".into(),
        email: "rui@x.com".into(),
        phone: "+351911111111".into(),
        picture: None,
        role: false,
    };
    let result = client.create_user(&user, &admin_headers()).await;

    match result {
        Err(Error::Forbidden { ref message }) => {
            assert!(message.contains("only admins"), "got: {message}");
        }
        other => panic!("expected Forbidden error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match client.get_user("4a1c").await {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
