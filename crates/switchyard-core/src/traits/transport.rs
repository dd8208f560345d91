// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-facing byte transport the SSE writer streams into.

use async_trait::async_trait;

/// Minimal capability set the SSE writer needs from the hosting HTTP layer.
///
/// Response headers are fixed for SSE and sent by the host before the first
/// write, so the transport only deals with the body.
#[async_trait]
pub trait SseTransport: Send + 'static {
    /// Push one serialized frame to the client.
    ///
    /// Returns `false` when the client can no longer receive (broken pipe,
    /// dropped response body).
    async fn write(&mut self, frame: String) -> bool;

    /// Whether the remote peer has gone away since the last write.
    fn is_disconnected(&self) -> bool;

    /// Finish the response body. Called at most once.
    async fn end(&mut self);
}
