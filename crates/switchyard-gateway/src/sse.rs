// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-backed SSE transport feeding an axum response body.
//!
//! The handler hands the receiving half to the response body and the relay
//! task writes into the sending half. When the client goes away hyper drops
//! the body, the receiver goes with it, and the sender observes the closure.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use futures::{Stream, StreamExt};
use switchyard_core::SseTransport;
use switchyard_stream::SSE_HEADERS;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Frames buffered between the relay task and the response body.
pub const CHANNEL_CAPACITY: usize = 64;

/// [`SseTransport`] over a tokio mpsc channel.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: Option<mpsc::Sender<String>>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the response body will drain.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { tx: Some(tx) }, rx)
    }
}

#[async_trait]
impl SseTransport for ChannelTransport {
    async fn write(&mut self, frame: String) -> bool {
        match &self.tx {
            Some(tx) => tx.send(frame).await.is_ok(),
            None => false,
        }
    }

    fn is_disconnected(&self) -> bool {
        self.tx.as_ref().is_none_or(mpsc::Sender::is_closed)
    }

    async fn end(&mut self) {
        // Dropping the sender ends the body stream once buffered frames drain.
        self.tx.take();
    }
}

/// Turn the receiving half of a [`ChannelTransport`] into a body stream.
pub fn frame_stream(rx: mpsc::Receiver<String>) -> impl Stream<Item = Result<String, Infallible>> {
    ReceiverStream::new(rx).map(Ok)
}

/// A 200 response with the SSE headers whose body is fed by `rx`.
pub fn sse_response(rx: mpsc::Receiver<String>) -> Response {
    let mut response = Response::new(Body::from_stream(frame_stream(rx)));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    for (name, value) in SSE_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}
