// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound Server-Sent Events: message framing and the per-connection writer.
//!
//! [`SseWriter`] owns one client connection. It is `open` until it is closed
//! explicitly, a transport write fails, or the transport reports that the
//! peer went away; `closed` is terminal.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use switchyard_core::SseTransport;
use tokio::sync::Mutex;
use tracing::debug;

/// Sentinel data payload that terminates every client-facing stream.
pub const DONE: &str = "[DONE]";

/// Response headers for a client-facing SSE stream.
pub const SSE_HEADERS: [(&str, &str); 3] = [
    ("content-type", "text/event-stream"),
    ("cache-control", "no-cache"),
    ("connection", "keep-alive"),
];

/// Payload of an outbound SSE message.
#[derive(Debug, Clone, PartialEq)]
pub enum SseData {
    /// Sent as-is.
    Text(String),
    /// Sent as compact JSON.
    Json(Value),
}

impl SseData {
    /// Serialize any value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<Value> for SseData {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for SseData {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SseData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// One outbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseMessage {
    pub event: Option<String>,
    pub data: SseData,
    pub id: Option<String>,
    /// Reconnection delay hint in milliseconds.
    pub retry: Option<u64>,
}

impl SseMessage {
    /// A message with only a data payload.
    pub fn data(data: impl Into<SseData>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    /// A named event.
    pub fn event(name: impl Into<String>, data: impl Into<SseData>) -> Self {
        Self {
            event: Some(name.into()),
            ..Self::data(data)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_retry(mut self, retry_ms: u64) -> Self {
        self.retry = Some(retry_ms);
        self
    }

    /// Wire encoding: `event:`, `id:`, `retry:` when present, one `data:` line
    /// per payload line, then a blank line.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(event) = &self.event {
            out.push_str(&format!("event: {event}\n"));
        }
        if let Some(id) = &self.id {
            out.push_str(&format!("id: {id}\n"));
        }
        if let Some(retry) = self.retry {
            out.push_str(&format!("retry: {retry}\n"));
        }
        for line in self.data.render().split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

struct WriterState<T> {
    transport: T,
    closed: bool,
}

impl<T: SseTransport> WriterState<T> {
    /// Folds an asynchronous peer disconnect into the closed flag.
    fn is_open(&mut self) -> bool {
        if !self.closed && self.transport.is_disconnected() {
            debug!("sse client disconnected");
            self.closed = true;
        }
        !self.closed
    }

    async fn send(&mut self, frame: String) -> bool {
        if !self.is_open() {
            return false;
        }
        if self.transport.write(frame).await {
            true
        } else {
            debug!("sse transport rejected write, closing");
            self.closed = true;
            false
        }
    }
}

/// Writer for one outbound SSE connection.
///
/// Clones share the same connection, so a keep-alive task and the relay can
/// both write; frames never interleave.
pub struct SseWriter<T> {
    state: Arc<Mutex<WriterState<T>>>,
}

impl<T> Clone for SseWriter<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: SseTransport> SseWriter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(WriterState {
                transport,
                closed: false,
            })),
        }
    }

    /// Encode and deliver a message. Returns `false` if the writer is closed
    /// or the transport rejected the write (which closes the writer).
    pub async fn write(&self, message: &SseMessage) -> bool {
        self.state.lock().await.send(message.encode()).await
    }

    /// Shorthand for writing a data-only message.
    pub async fn write_data(&self, data: impl Into<SseData>) -> bool {
        self.write(&SseMessage::data(data)).await
    }

    /// Write a `: text` comment line, used for keep-alive.
    pub async fn comment(&self, text: &str) -> bool {
        self.state.lock().await.send(format!(": {text}\n\n")).await
    }

    /// Send the `[DONE]` sentinel and end the transport. Idempotent.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if !state.is_open() {
            return;
        }
        state
            .transport
            .write(SseMessage::data(DONE).encode())
            .await;
        state.transport.end().await;
        state.closed = true;
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.is_open()
    }
}
