// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming relay between an upstream chat-completion provider and a client.
//!
//! - [`SseWriter`]: one client-facing SSE connection with open/closed state
//! - [`stream_provider_response`]: performs the upstream call and relays its
//!   SSE body chunk by chunk, returning a [`RelayOutcome`]
//! - [`aggregate_streaming_response`]: folds the relayed chunks into a single
//!   response
//! - [`start_keep_alive`]: periodic comment pings for idle connections

pub mod aggregate;
pub mod decoder;
pub mod keepalive;
pub mod relay;
pub mod sse;

pub use aggregate::{aggregate_streaming_response, AggregateResult, Aggregator};
pub use keepalive::{start_keep_alive, KeepAlive, DEFAULT_KEEPALIVE_INTERVAL};
pub use relay::{drain_sse_stream, stream_provider_response, RelayObserver, RelayOutcome};
pub use sse::{SseData, SseMessage, SseWriter, DONE, SSE_HEADERS};
