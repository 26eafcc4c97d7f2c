use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{GeocodeError, Geocoder, GeocoderConfig, NominatimClient};

fn test_client(server: &MockServer) -> NominatimClient {
    let config = GeocoderConfig {
        base_url: server.uri(),
        user_agent: "assetdb-test".to_owned(),
        timeout: Duration::from_secs(5),
        max_attempts: 3,
        backoff_base: Duration::from_millis(10),
        min_interval: Duration::ZERO,
    };
    NominatimClient::new(config).unwrap()
}

fn place_body() -> serde_json::Value {
    serde_json::json!([{
        "lat": "13.7465",
        "lon": "100.4930",
        "display_name": "Wat Pho, Phra Nakhon, Bangkok"
    }])
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Wat Pho, Bangkok"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("User-Agent", "assetdb-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place_body()))
        .expect(1)
        .mount(&server)
        .await;

    let point = client.geocode("Wat Pho, Bangkok").await.unwrap().unwrap();
    assert_eq!(point.latitude(), 13.7465);
    assert_eq!(point.longitude(), 100.4930);
}

#[tokio::test]
async fn test_empty_result_is_none() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.geocode("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn test_retry_on_503_then_success() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.geocode("Wat Pho").await.unwrap().is_some());
}

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;

    assert!(client.geocode("Wat Pho").await.unwrap().is_some());
}

#[tokio::test]
async fn test_no_retry_on_400() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.geocode("Wat Pho").await.unwrap_err();
    assert!(matches!(err, GeocodeError::HttpStatus { code: 400, .. }));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client.geocode("Wat Pho").await.unwrap_err();
    match err {
        GeocodeError::RetriesExhausted(inner) => {
            assert!(matches!(*inner, GeocodeError::HttpStatus { code: 502, .. }));
        },
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.geocode("Wat Pho").await.unwrap_err();
    assert!(matches!(err, GeocodeError::JsonParse { .. }));
}
