// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream-to-client SSE relay.
//!
//! [`stream_provider_response`] makes one streaming chat-completion call and
//! drains it line by line, forwarding every decoded chunk to the client while
//! collecting the sequence for aggregation. Every exit path closes the sink,
//! so the client always sees a terminated stream.

use std::error::Error as StdError;
use std::pin::pin;

use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use switchyard_core::{SseTransport, StreamChunk, SwitchyardError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::decoder::Utf8Decoder;
use crate::sse::{SseMessage, SseWriter, DONE};

const DATA_PREFIX: &str = "data:";

/// Hooks invoked as a relay progresses. Every method defaults to a no-op.
pub trait RelayObserver: Send {
    /// A chunk was parsed, before it is forwarded to the client.
    fn on_chunk(&mut self, _chunk: &StreamChunk) {}

    /// The upstream stream was fully drained.
    fn on_complete(&mut self, _chunks: &[StreamChunk]) {}

    /// The relay failed. Client disconnects are not reported here.
    fn on_error(&mut self, _error: &SwitchyardError) {}
}

impl RelayObserver for () {}

/// Result of one relay call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayOutcome {
    /// Whether the upstream stream was drained to the end.
    pub success: bool,
    /// Every chunk parsed, in arrival order.
    pub chunks: Vec<StreamChunk>,
    /// Milliseconds from call start to the first successful body read.
    pub ttft_ms: Option<u64>,
}

impl RelayOutcome {
    fn failed(chunks: Vec<StreamChunk>, ttft_ms: Option<u64>) -> Self {
        Self {
            success: false,
            chunks,
            ttft_ms,
        }
    }
}

/// POST `body` to `url` and relay the streamed response into `sink`.
///
/// Never returns an error: failures are reported to `observer` and to the
/// client as an `error` event, and reflected in [`RelayOutcome::success`].
pub async fn stream_provider_response<T, B, O>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    mut headers: HeaderMap,
    sink: &SseWriter<T>,
    observer: &mut O,
) -> RelayOutcome
where
    T: SseTransport,
    B: Serialize + ?Sized,
    O: RelayObserver,
{
    let started = Instant::now();
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

    let response = match client.post(url).headers(headers).json(body).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, url, "upstream request failed");
            let error = SwitchyardError::transport(format!("upstream request failed: {err}"), err);
            return fail_transport(error, sink, observer, Vec::new(), None).await;
        }
    };

    let status = response.status();
    debug!(status = %status, "upstream responded");

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = upstream_error_message(status, &text);
        warn!(status = status.as_u16(), message = message.as_str(), "upstream rejected request");

        let payload = json!({"error": {"message": message, "status": status.as_u16()}});
        sink.write(&SseMessage::event("error", payload)).await;
        observer.on_error(&SwitchyardError::UpstreamRejected {
            status: status.as_u16(),
            message,
        });
        sink.close().await;
        return RelayOutcome::failed(Vec::new(), None);
    }

    if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
        warn!("upstream response has no body");
        observer.on_error(&SwitchyardError::NoBody);
        sink.close().await;
        return RelayOutcome::failed(Vec::new(), None);
    }

    drain_sse_stream(response.bytes_stream(), sink, observer, started).await
}

/// Drain an upstream SSE byte stream into `sink`.
///
/// `started` is the instant the upstream call began; time to first token is
/// measured from it.
pub async fn drain_sse_stream<S, C, E, T, O>(
    stream: S,
    sink: &SseWriter<T>,
    observer: &mut O,
    started: Instant,
) -> RelayOutcome
where
    S: Stream<Item = Result<C, E>>,
    C: AsRef<[u8]>,
    E: Into<Box<dyn StdError + Send + Sync>>,
    T: SseTransport,
    O: RelayObserver,
{
    let mut stream = pin!(stream);
    let mut decoder = Utf8Decoder::new();
    let mut buffer = String::new();
    let mut chunks = Vec::new();
    let mut ttft_ms = None;

    while let Some(read) = stream.next().await {
        let bytes = match read {
            Ok(bytes) => bytes,
            Err(err) => {
                let source: Box<dyn StdError + Send + Sync> = err.into();
                let error = SwitchyardError::Transport {
                    message: format!("upstream stream interrupted: {source}"),
                    source: Some(source),
                };
                warn!(error = %error, chunks = chunks.len(), "relay aborted");
                return fail_transport(error, sink, observer, chunks, ttft_ms).await;
            }
        };

        if ttft_ms.is_none() {
            ttft_ms = Some(started.elapsed().as_millis() as u64);
        }

        buffer.push_str(&decoder.decode(bytes.as_ref()));
        let Some(last_newline) = buffer.rfind('\n') else {
            continue;
        };
        let tail = buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut buffer, tail);

        for line in complete.lines() {
            let Some(chunk) = parse_data_line(line) else {
                continue;
            };
            if !forward(chunk, &mut chunks, sink, observer).await {
                debug!(chunks = chunks.len(), "client gone, abandoning upstream");
                sink.close().await;
                return RelayOutcome::failed(chunks, ttft_ms);
            }
        }
    }

    buffer.push_str(&decoder.finish());
    if let Some(chunk) = parse_data_line(buffer.trim()) {
        if !forward(chunk, &mut chunks, sink, observer).await {
            debug!(chunks = chunks.len(), "client gone on final line");
            sink.close().await;
            return RelayOutcome::failed(chunks, ttft_ms);
        }
    }

    info!(chunks = chunks.len(), ttft_ms, "relay complete");
    observer.on_complete(&chunks);
    sink.close().await;
    RelayOutcome {
        success: true,
        chunks,
        ttft_ms,
    }
}

/// Parse one SSE line into a chunk.
///
/// Non-`data:` lines, the `[DONE]` sentinel, and payloads that are not JSON
/// all yield `None`.
pub fn parse_data_line(line: &str) -> Option<StreamChunk> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == DONE {
        return None;
    }
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => Some(StreamChunk::new(value)),
        Err(err) => {
            debug!(error = %err, "skipping malformed upstream frame");
            None
        }
    }
}

/// Record and forward one chunk. Returns `false` once the client is gone.
async fn forward<T, O>(
    chunk: StreamChunk,
    chunks: &mut Vec<StreamChunk>,
    sink: &SseWriter<T>,
    observer: &mut O,
) -> bool
where
    T: SseTransport,
    O: RelayObserver,
{
    observer.on_chunk(&chunk);
    let message = SseMessage::data(chunk.as_value().clone());
    chunks.push(chunk);
    sink.write(&message).await
}

async fn fail_transport<T, O>(
    error: SwitchyardError,
    sink: &SseWriter<T>,
    observer: &mut O,
    chunks: Vec<StreamChunk>,
    ttft_ms: Option<u64>,
) -> RelayOutcome
where
    T: SseTransport,
    O: RelayObserver,
{
    observer.on_error(&error);
    if sink.is_open().await {
        let payload = json!({"error": {"message": error.to_string(), "status": error.status_code()}});
        sink.write(&SseMessage::event("error", payload)).await;
    }
    sink.close().await;
    RelayOutcome::failed(chunks, ttft_ms)
}

/// Best human-readable message for a rejected upstream call: the provider's
/// `error.message` when present, else the raw body, else the status reason.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("upstream error")
                .to_string()
        })
}
