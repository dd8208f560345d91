// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the proxy.
//!
//! Handles POST /v1/chat/completions, GET /health, GET /metrics.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use switchyard_core::{
    ContentBlock, ConversationMessage, LedgerEntry, MessageContent, StreamChunk, SwitchyardError,
};
use switchyard_router::RoutingDecision;
use switchyard_stream::{
    aggregate_streaming_response, start_keep_alive, stream_provider_response, RelayObserver,
    SseMessage, SseWriter,
};

use crate::server::GatewayState;
use crate::sse::{sse_response, ChannelTransport};

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// Error response body for requests rejected before streaming starts.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// The parts of a chat-completion body the classifier looks at.
#[derive(Debug)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
    pub tools: Option<Vec<Value>>,
    pub system: Option<String>,
    pub model: Option<String>,
}

impl ChatRequest {
    /// Pull classifier inputs out of a raw request body.
    ///
    /// `system` is read from a top-level `system` field (string or text
    /// blocks), falling back to the text of any `system`-role messages.
    pub fn from_body(body: &Value) -> Result<Self, SwitchyardError> {
        let Some(object) = body.as_object() else {
            return Err(SwitchyardError::Serialization {
                message: "request body must be a JSON object".to_string(),
                source: None,
            });
        };
        let Some(messages) = object.get("messages").filter(|m| m.is_array()) else {
            return Err(SwitchyardError::Serialization {
                message: "request body must contain a `messages` array".to_string(),
                source: None,
            });
        };
        let messages = messages
            .as_array()
            .into_iter()
            .flatten()
            .map(conversation_message)
            .collect::<Result<Vec<_>, _>>()?;

        let tools = object.get("tools").and_then(Value::as_array).cloned();

        let system = object
            .get("system")
            .map(|v| MessageContent::from_value(v.clone()).extract_text())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                let parts: Vec<String> = messages
                    .iter()
                    .filter(|m| m.role.as_deref() == Some("system"))
                    .map(|m| m.content.extract_text())
                    .filter(|s| !s.is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join("\n"))
            });

        let model = object
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            messages,
            tools,
            system,
            model,
        })
    }
}

/// Read one chat-completion message, lifting OpenAI tool bookkeeping into
/// content blocks.
///
/// A `tool` (or legacy `function`) message becomes a single tool-result block
/// and each entry of an assistant's `tool_calls` becomes a tool-use block, so
/// neither is mistaken for authored text.
fn conversation_message(raw: &Value) -> Result<ConversationMessage, SwitchyardError> {
    let mut message: ConversationMessage = serde_json::from_value(raw.clone())?;

    if matches!(message.role.as_deref(), Some("tool" | "function")) {
        let output = match std::mem::take(&mut message.content) {
            MessageContent::Text(text) => text,
            blocks => blocks.extract_text(),
        };
        message.content = MessageContent::Blocks(vec![ContentBlock::ToolResult {
            tool_use_id: raw
                .get("tool_call_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            content: Some(Value::String(output)),
        }]);
        return Ok(message);
    }

    let calls = raw
        .get("tool_calls")
        .and_then(Value::as_array)
        .filter(|calls| !calls.is_empty());
    if let Some(calls) = calls {
        let mut blocks = match std::mem::take(&mut message.content) {
            MessageContent::Text(text) if text.is_empty() => Vec::new(),
            MessageContent::Text(text) => vec![ContentBlock::text(text)],
            MessageContent::Blocks(blocks) => blocks,
        };
        blocks.extend(calls.iter().map(|call| ContentBlock::ToolUse {
            id: call.get("id").and_then(Value::as_str).map(str::to_string),
            name: call
                .pointer("/function/name")
                .and_then(Value::as_str)
                .map(str::to_string),
            input: call.pointer("/function/arguments").cloned(),
        }));
        message.content = MessageContent::Blocks(blocks);
    }

    Ok(message)
}

/// Per-request relay observer feeding metrics.
struct RequestObserver<'a> {
    request_id: &'a str,
}

impl RelayObserver for RequestObserver<'_> {
    fn on_chunk(&mut self, _chunk: &StreamChunk) {
        switchyard_prometheus::record_chunk();
    }

    fn on_error(&mut self, error: &SwitchyardError) {
        warn!(
            request_id = self.request_id,
            status = error.status_code(),
            error = %error,
            "relay failed"
        );
    }
}

/// POST /v1/chat/completions
///
/// Classifies the request, rewrites its `model`, and relays the upstream
/// stream back as SSE. Every accepted request is answered with a stream.
pub async fn post_chat_completions(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Json<Value>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Json(mut body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let request = match ChatRequest::from_body(&body) {
        Ok(request) => request,
        Err(err) => return bad_request(err.to_string()),
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    let decision = state.router.route(
        &request.messages,
        request.tools.as_deref(),
        request.system.as_deref(),
        request.model.as_deref(),
    );
    switchyard_prometheus::record_request(decision.tier);

    if state.ctx.audit {
        info!(
            request_id = request_id.as_str(),
            model = decision.model.as_str(),
            tier = %decision.tier,
            score = decision.score,
            reason = decision.reason.as_str(),
            "routed request"
        );
    } else {
        debug!(
            request_id = request_id.as_str(),
            model = decision.model.as_str(),
            tier = %decision.tier,
            "routed request"
        );
    }

    if let Some(object) = body.as_object_mut() {
        object.insert("model".to_string(), Value::String(decision.model.clone()));
        object.insert("stream".to_string(), Value::Bool(true));
    }

    let (transport, rx) = ChannelTransport::channel();
    let writer = SseWriter::new(transport);
    let upstream_headers = upstream_headers(&headers, state.api_key.as_deref());

    let mut response = sse_response(rx);
    if let Ok(value) = HeaderValue::from_str(&decision.model) {
        response.headers_mut().insert("x-switchyard-model", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.tier.to_string()) {
        response.headers_mut().insert("x-switchyard-tier", value);
    }

    tokio::spawn(relay_request(state, request_id, decision, body, upstream_headers, writer));

    response
}

/// Run one relay to completion, then record metrics and a ledger entry.
async fn relay_request(
    state: GatewayState,
    request_id: String,
    decision: RoutingDecision,
    body: Value,
    headers: reqwest::header::HeaderMap,
    writer: SseWriter<ChannelTransport>,
) {
    if state.ctx.offline {
        info!(request_id = request_id.as_str(), "offline mode, upstream call refused");
        let payload = serde_json::json!({
            "error": {"message": "offline mode: upstream calls are disabled", "status": 503}
        });
        writer.write(&SseMessage::event("error", payload)).await;
        writer.close().await;
        switchyard_prometheus::record_relay(false);
        return;
    }

    let keep_alive = start_keep_alive(writer.clone(), state.keepalive);
    let mut observer = RequestObserver {
        request_id: &request_id,
    };
    let outcome = stream_provider_response(
        &state.client,
        &state.upstream_url,
        &body,
        headers,
        &writer,
        &mut observer,
    )
    .await;
    keep_alive.cancel();

    let aggregate = aggregate_streaming_response(&outcome.chunks);
    switchyard_prometheus::record_relay(outcome.success);
    if let Some(ttft_ms) = outcome.ttft_ms {
        switchyard_prometheus::record_ttft(ttft_ms);
    }
    if let Some(usage) = &aggregate.usage {
        switchyard_prometheus::record_usage(usage);
    }

    if state.ctx.audit {
        info!(
            request_id = request_id.as_str(),
            success = outcome.success,
            chunks = outcome.chunks.len(),
            ttft_ms = outcome.ttft_ms,
            finish_reason = aggregate.finish_reason.as_deref(),
            content_chars = aggregate.content.chars().count(),
            "relay finished"
        );
    }

    let entry = LedgerEntry {
        request_id,
        model: aggregate.model.unwrap_or(decision.model),
        tier: decision.tier,
        success: outcome.success,
        ttft_ms: outcome.ttft_ms,
        chunks: outcome.chunks.len(),
        usage: aggregate.usage,
    };
    if let Err(e) = state.ledger.record(&entry).await {
        warn!(
            ledger = state.ledger.name(),
            error = %e,
            "failed to record ledger entry"
        );
    }
}

/// Headers sent upstream: the client's `Authorization`, or the configured key.
pub fn upstream_headers(
    client_headers: &HeaderMap,
    api_key: Option<&str>,
) -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(auth) = client_headers.get(header::AUTHORIZATION) {
        headers.insert(reqwest::header::AUTHORIZATION, auth.clone());
    } else if let Some(value) =
        api_key.and_then(|key| HeaderValue::from_str(&format!("Bearer {key}")).ok())
    {
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }
    headers
}

/// GET /health
///
/// Public health check; no authentication.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when no recorder is installed.
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics not enabled").into_response(),
    }
}
