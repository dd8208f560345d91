// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides an in-memory SSE transport and upstream payload builders for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`RecordingTransport`] - transport that records frames and can simulate disconnects
//! - [`sse`] - chat-completion chunk builders and SSE body/stream fixtures

pub mod recording_transport;
pub mod sse;

pub use recording_transport::RecordingTransport;
pub use sse::{content_chunk, finish_chunk, sse_body, timed_byte_stream, usage_chunk};
