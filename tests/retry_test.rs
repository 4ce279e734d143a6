//! Retry behaviour of event type calls against a flaky broker.

use std::time::Duration;

use nakadi_client::{Client, Error, EventApi, RetryOptions};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

async fn mount_failures(server: &MockServer, http_method: &str, times: u64) {
    Mock::given(method(http_method))
        .and(path("/event-types"))
        .respond_with(common::problem(503, "Service Unavailable", "broker restarting"))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_disabled_retry_makes_single_attempt() {
    let server = MockServer::start().await;
    mount_failures(&server, "GET", 1).await;

    let api = common::api(&server, RetryOptions::default());
    let err = api.list().await.unwrap_err();

    assert!(matches!(err, Error::Remote { .. }), "unexpected error: {err:?}");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_succeeds_after_transient_failures() {
    let server = MockServer::start().await;
    mount_failures(&server, "GET", 3).await;
    Mock::given(method("GET"))
        .and(path("/event-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api(&server, common::fast_retries(Duration::from_secs(5)));
    let event_types = api.list().await.unwrap();

    assert!(event_types.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_retried_until_created() {
    let server = MockServer::start().await;
    mount_failures(&server, "POST", 2).await;
    Mock::given(method("POST"))
        .and(path("/event-types"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api(&server, common::fast_retries(Duration::from_secs(5)));
    api.create(&common::sample_event_type("order.created"))
        .await
        .unwrap();

    let flow_ids: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.headers.get("X-Flow-Id"))
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    assert_eq!(flow_ids.len(), 3);
    assert_ne!(flow_ids[0], flow_ids[1]);
}

#[tokio::test]
async fn test_permanent_failure_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event-types/order.unknown"))
        .respond_with(common::problem(404, "Not Found", "EventType \"order.unknown\" does not exist."))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api(&server, common::fast_retries(Duration::from_secs(5)));
    let err = api.get("order.unknown").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_budget_exhaustion_returns_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event-types"))
        .respond_with(common::problem(500, "Internal Server Error", "partition leader unavailable"))
        .mount(&server)
        .await;

    let api = common::api(&server, common::fast_retries(Duration::from_millis(300)));
    let err = api.list().await.unwrap_err();

    let attempts = server.received_requests().await.unwrap().len() as u32;
    assert!(attempts > 1, "expected several attempts, got {attempts}");
    match &err {
        Error::RetryExhausted { attempts: reported, last } => {
            assert_eq!(*reported, attempts);
            assert!(matches!(**last, Error::Remote { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("partition leader unavailable"));
}

#[tokio::test]
async fn test_connection_failures_are_retried() {
    // Reserve a port, then free it so connections are refused.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = Client::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let api = EventApi::new(client, common::fast_retries(Duration::from_millis(200)));
    let err = api.list().await.unwrap_err();

    match err {
        Error::RetryExhausted { attempts, last } => {
            assert!(attempts > 1);
            assert!(matches!(*last, Error::Transport { .. }), "unexpected error: {last:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_calls_keep_separate_budgets() {
    let server = MockServer::start().await;
    mount_failures(&server, "GET", 4).await;
    Mock::given(method("GET"))
        .and(path("/event-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let api = common::api(&server, common::fast_retries(Duration::from_secs(5)));
    let (first, second) = tokio::join!(api.list(), api.list());

    assert!(first.unwrap().is_empty());
    assert!(second.unwrap().is_empty());
}
