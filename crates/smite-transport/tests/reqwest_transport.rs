//! Integration tests for `ReqwestTransport` against a local mock server.

use std::time::Duration;

use smite_transport::{HttpTransport, ReqwestTransport, TransportError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_returns_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smiteapi.svc/pingJson"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"pong\""))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let resp = transport
        .get(&format!("{}/smiteapi.svc/pingJson", server.uri()))
        .await
        .expect("request should succeed");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body_text(), "\"pong\"");
}

#[tokio::test]
async fn test_get_non_200_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let resp = transport.get(&server.uri()).await.unwrap();

    assert_eq!(resp.status, 500);
    assert!(!resp.is_ok());
    assert_eq!(resp.body_text(), "boom");
}

#[tokio::test]
async fn test_get_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(Duration::from_millis(100)).unwrap();
    let err = transport.get(&server.uri()).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_get_refused_connection_is_transport_error() {
    // Bind then drop a listener to get a port nobody is serving.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let err = transport
        .get(&format!("http://{addr}/smiteapi.svc/pingJson"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, TransportError::Connect(_) | TransportError::Request(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_error_message_does_not_leak_url() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let err = transport
        .get(&format!("http://{addr}/getgodsjson/1/deadbeefsignature/tok/20240101000000"))
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("deadbeefsignature"));
}
