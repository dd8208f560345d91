// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP front end of the Switchyard proxy.
//!
//! Accepts OpenAI-style chat-completion requests, routes each one to a model
//! tier with [`switchyard_router::ModelRouter`], and relays the upstream SSE
//! stream back through a channel-backed [`switchyard_stream::SseWriter`].

pub mod handlers;
pub mod server;
pub mod sse;

pub use handlers::{ChatRequest, ErrorResponse, HealthResponse};
pub use server::{build_router, start_server, GatewayState, HealthState};
pub use sse::{sse_response, ChannelTransport};
