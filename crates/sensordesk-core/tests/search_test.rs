#![allow(clippy::unwrap_used)]
// Live sensor search against a mock backend, on the real clock.

use std::time::Duration;

use serde_json::json;
use tokio_stream::StreamExt;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sensordesk_api::ApiClient;
use sensordesk_core::{Backend, ClientConfig, Outcome, SessionContext};

async fn setup(window: Duration) -> (MockServer, Backend) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), url.clone());
    let mut config = ClientConfig::new(url);
    config.search_debounce = window;
    (server, Backend::with_api(config, api, SessionContext::in_memory()))
}

fn hit(id: u32, name: &str) -> serde_json::Value {
    json!([{
        "id": id, "name": name, "category": "Temperature",
        "description": "", "visibility": "private"
    }])
}

#[tokio::test]
async fn typing_burst_issues_one_search() {
    let (server, backend) = setup(Duration::from_millis(50)).await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .and(query_param("term", "boi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hit(1, "Boiler")))
        .expect(1)
        .mount(&server)
        .await;

    let search = backend.sensor_search();
    let mut results = Box::pin(search.subscribe());
    for term in ["b", "bo", "boi"] {
        search.push(term);
    }

    let result = tokio::time::timeout(Duration::from_secs(5), results.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.term, "boi");
    let sensors = result.value.ok().unwrap();
    assert_eq!(sensors[0].name, "Boiler");
}

#[tokio::test]
async fn slow_response_is_superseded() {
    let (server, backend) = setup(Duration::from_millis(20)).await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .and(query_param("term", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hit(1, "Slow"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/search"))
        .and(query_param("term", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hit(2, "Fast")))
        .mount(&server)
        .await;

    let search = backend.sensor_search();
    let mut results = Box::pin(search.subscribe());

    search.push("slow");
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.push("fast");

    let result = tokio::time::timeout(Duration::from_secs(5), results.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.term, "fast");

    tokio::time::sleep(Duration::from_millis(600)).await;
    drop(search);
    let rest: Vec<_> = results.collect().await;
    assert!(rest.is_empty());
}

#[tokio::test]
async fn blank_term_settles_empty_without_request() {
    let (server, backend) = setup(Duration::from_millis(20)).await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let search = backend.sensor_search();
    let mut results = Box::pin(search.subscribe());
    search.push("   ");

    let result = tokio::time::timeout(Duration::from_secs(5), results.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.value, Outcome::Empty);
}
