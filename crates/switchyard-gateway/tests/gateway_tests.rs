// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests: requests go through the axum app, upstream is mocked.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use switchyard_config::SwitchyardConfig;
use switchyard_core::{Complexity, LedgerEntry, NoopLedger, SwitchyardError, UsageLedger};
use switchyard_gateway::{build_router, GatewayState, HealthState};
use switchyard_test_utils::{content_chunk, finish_chunk, sse_body, usage_chunk};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default, Clone)]
struct CapturingLedger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl CapturingLedger {
    async fn wait_for_entry(&self) -> LedgerEntry {
        for _ in 0..100 {
            if let Some(entry) = self.entries.lock().unwrap().first() {
                return entry.clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no ledger entry recorded");
    }
}

#[async_trait]
impl UsageLedger for CapturingLedger {
    fn name(&self) -> &str {
        "capturing"
    }

    async fn record(&self, entry: &LedgerEntry) -> Result<(), SwitchyardError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

fn config_for(server: &MockServer) -> SwitchyardConfig {
    let mut config = SwitchyardConfig::default();
    config.provider.base_url = server.uri();
    config.provider.api_key = Some("sk-config".to_string());
    config.routing.simple_model = "small-model".to_string();
    config.routing.moderate_model = "mid-model".to_string();
    config.routing.complex_model = "large-model".to_string();
    config
}

fn app(config: &SwitchyardConfig, ledger: Arc<dyn UsageLedger>) -> Router {
    let state = GatewayState::from_config(config, ledger, HealthState::new(None)).unwrap();
    build_router(state)
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn upstream_stream() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(sse_body(&[
            content_chunk("Hi"),
            content_chunk(" there"),
            finish_chunk("stop"),
            usage_chunk(9, 2),
        ]))
}

fn hello() -> Value {
    json!({
        "model": "client-model",
        "messages": [{"role": "user", "content": "hello"}]
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(&SwitchyardConfig::default(), Arc::new(NoopLedger));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn metrics_404_without_recorder() {
    let app = app(&SwitchyardConfig::default(), Arc::new(NoopLedger));
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_renders_when_enabled() {
    let render: Arc<dyn Fn() -> String + Send + Sync> =
        Arc::new(|| "switchyard_requests_total 3\n".to_string());
    let state = GatewayState::from_config(
        &SwitchyardConfig::default(),
        Arc::new(NoopLedger),
        HealthState::new(Some(render)),
    )
    .unwrap();
    let response = build_router(state)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_text(response).await, "switchyard_requests_total 3\n");
}

#[tokio::test]
async fn simple_request_is_rewritten_and_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header_is("authorization", "Bearer sk-config"))
        .and(header_is("accept", "text/event-stream"))
        .and(body_partial_json(json!({"model": "small-model", "stream": true})))
        .respond_with(upstream_stream())
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&config_for(&server), Arc::new(NoopLedger))
        .oneshot(chat_request(hello()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(response.headers()["x-switchyard-model"], "small-model");
    assert_eq!(response.headers()["x-switchyard-tier"], "simple");

    let body = body_text(response).await;
    assert!(body.contains("\"content\":\"Hi\""));
    assert!(body.contains("\"content\":\" there\""));
    assert!(body.ends_with("data: [DONE]\n\n"));
    assert_eq!(body.matches("[DONE]").count(), 1);
}

#[tokio::test]
async fn client_authorization_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_is("authorization", "Bearer sk-client"))
        .respond_with(upstream_stream())
        .expect(1)
        .mount(&server)
        .await;

    let mut request = chat_request(hello());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer sk-client".parse().unwrap(),
    );
    let response = app(&config_for(&server), Arc::new(NoopLedger))
        .oneshot(request)
        .await
        .unwrap();
    assert!(body_text(response).await.contains("[DONE]"));
}

#[tokio::test]
async fn complex_request_routes_to_large_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "large-model"})))
        .respond_with(upstream_stream())
        .expect(1)
        .mount(&server)
        .await;

    let body = json!({
        "messages": [{
            "role": "user",
            "content": "First analyze the algorithm, then calculate its complexity and design a refactor of the architecture"
        }],
        "tools": [{"type": "function", "function": {"name": "run"}}]
    });
    let response = app(&config_for(&server), Arc::new(NoopLedger))
        .oneshot(chat_request(body))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-switchyard-tier"], "complex");
    body_text(response).await;
}

#[tokio::test]
async fn force_model_overrides_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "pinned"})))
        .respond_with(upstream_stream())
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.routing.force_model = Some("pinned".to_string());
    let response = app(&config, Arc::new(NoopLedger))
        .oneshot(chat_request(hello()))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-switchyard-model"], "pinned");
    body_text(response).await;
}

#[tokio::test]
async fn offline_mode_never_calls_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(upstream_stream())
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.proxy.offline = true;
    let response = app(&config, Arc::new(NoopLedger))
        .oneshot(chat_request(hello()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.starts_with("event: error\n"));
    assert!(body.contains("offline mode"));
    assert!(body.ends_with("data: [DONE]\n\n"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app(&SwitchyardConfig::default(), Arc::new(NoopLedger));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(chat_request(json!({"model": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("messages"));
}

#[tokio::test]
async fn upstream_failure_becomes_error_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": {"message": "provider exploded"}})),
        )
        .mount(&server)
        .await;

    let response = app(&config_for(&server), Arc::new(NoopLedger))
        .oneshot(chat_request(hello()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("event: error"));
    assert!(body.contains("provider exploded"));
    assert!(body.contains("\"status\":500"));
    assert!(body.ends_with("data: [DONE]\n\n"));
}

#[tokio::test]
async fn ledger_records_relay_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(upstream_stream())
        .mount(&server)
        .await;

    let ledger = CapturingLedger::default();
    let response = app(&config_for(&server), Arc::new(ledger.clone()))
        .oneshot(chat_request(hello()))
        .await
        .unwrap();
    body_text(response).await;

    let entry = ledger.wait_for_entry().await;
    assert!(entry.success);
    assert_eq!(entry.tier, Complexity::Simple);
    // the upstream-reported model wins over the routed one
    assert_eq!(entry.model, "gpt-test");
    assert_eq!(entry.chunks, 4);
    assert_eq!(entry.usage.map(|u| u.total_tokens), Some(11));
    assert!(entry.ttft_ms.is_some());
    assert!(!entry.request_id.is_empty());
}
