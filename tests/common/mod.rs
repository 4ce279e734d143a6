//! Shared utilities for integration tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nakadi_client::event_types::{Category, EventTypeSchema, PartitionStrategy};
use nakadi_client::{Client, EventApi, EventType, RetryOptions};
use serde_json::{json, Value};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const BROKER_TIMESTAMP: &str = "2024-03-01T12:00:00Z";

/// In-memory stand-in for the broker's event type endpoints.
#[derive(Clone, Default)]
pub struct FakeBroker {
    event_types: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl FakeBroker {
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.event_types.lock().unwrap().len()
    }
}

impl Respond for FakeBroker {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().trim_start_matches('/').to_string();
        let segments: Vec<&str> = path.split('/').collect();
        let mut store = self.event_types.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["event-types"]) => {
                let all: Vec<&Value> = store.values().collect();
                ResponseTemplate::new(200).set_body_json(all)
            }
            ("POST", ["event-types"]) => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return problem(400, "Bad Request", "malformed JSON");
                };
                let Some(name) = body["name"].as_str().map(str::to_string) else {
                    return problem(422, "Unprocessable Entity", "Field \"name\" may not be null");
                };
                if store.contains_key(&name) {
                    return problem(
                        409,
                        "Conflict",
                        &format!("EventType with name {name} already exists"),
                    );
                }
                body["created_at"] = json!(BROKER_TIMESTAMP);
                body["updated_at"] = json!(BROKER_TIMESTAMP);
                store.insert(name, body);
                ResponseTemplate::new(201)
            }
            ("GET", ["event-types", name]) => match store.get(*name) {
                Some(event_type) => ResponseTemplate::new(200).set_body_json(event_type),
                None => not_found(name),
            },
            ("PUT", ["event-types", name]) => {
                let Some(existing) = store.get(*name) else {
                    return not_found(name);
                };
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return problem(400, "Bad Request", "malformed JSON");
                };
                if body["name"].as_str() != Some(*name) {
                    return problem(422, "Unprocessable Entity", "path does not match resource name");
                }
                body["created_at"] = existing["created_at"].clone();
                body["updated_at"] = json!("2024-03-02T08:30:00Z");
                store.insert(name.to_string(), body);
                ResponseTemplate::new(200)
            }
            ("DELETE", ["event-types", name]) => match store.remove(*name) {
                Some(_) => ResponseTemplate::new(200),
                None => not_found(name),
            },
            _ => problem(405, "Method Not Allowed", "unsupported request"),
        }
    }
}

/// Problem payload response as the broker formats it.
pub fn problem(status: u16, title: &str, detail: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "type": format!("http://httpstatus.es/{status}"),
        "title": title,
        "status": status,
        "detail": detail,
    }))
}

fn not_found(name: &str) -> ResponseTemplate {
    problem(404, "Not Found", &format!("EventType \"{name}\" does not exist."))
}

/// Start a mock server answering event type requests from a fresh fake broker.
#[allow(dead_code)]
pub async fn start_broker() -> (MockServer, FakeBroker) {
    let server = MockServer::start().await;
    let broker = FakeBroker::default();

    Mock::given(path_regex(r"^/event-types(/[^/]+)?$"))
        .respond_with(broker.clone())
        .mount(&server)
        .await;

    (server, broker)
}

pub fn api(server: &MockServer, options: RetryOptions) -> EventApi {
    let client = Client::new(&server.uri()).unwrap();
    EventApi::new(client, options)
}

/// Retries with intervals short enough for tests.
#[allow(dead_code)]
pub fn fast_retries(max_elapsed: Duration) -> RetryOptions {
    RetryOptions {
        retry: true,
        initial_retry_interval: Duration::from_millis(10),
        max_retry_interval: Duration::from_millis(50),
        max_elapsed_time: max_elapsed,
    }
}

pub fn sample_event_type(name: &str) -> EventType {
    let mut event_type = EventType::new(
        name,
        "order-service",
        Category::Business,
        EventTypeSchema::json_schema(r#"{"properties":{"order_number":{"type":"string"}}}"#),
    );
    event_type.partition_strategy = Some(PartitionStrategy::Hash);
    event_type.partition_key_fields = vec!["order_number".to_string()];
    event_type
}
