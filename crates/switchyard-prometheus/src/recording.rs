// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder can collect these metrics.
//! Without an installed recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};
use switchyard_core::{Complexity, Usage};

/// Register all Switchyard metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "switchyard_requests_total",
        "Chat-completion requests received, by routed tier"
    );
    describe_counter!(
        "switchyard_relays_total",
        "Finished upstream relays, by outcome"
    );
    describe_counter!(
        "switchyard_chunks_total",
        "Upstream chunks forwarded to clients"
    );
    describe_counter!(
        "switchyard_tokens_total",
        "Tokens reported by upstream usage, by type"
    );
    describe_histogram!(
        "switchyard_ttft_seconds",
        "Time from upstream call start to first body read, in seconds"
    );
}

/// Record an incoming request routed to `tier`.
pub fn record_request(tier: Complexity) {
    metrics::counter!("switchyard_requests_total", "tier" => tier.to_string()).increment(1);
}

/// Record a finished relay.
pub fn record_relay(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("switchyard_relays_total", "outcome" => outcome).increment(1);
}

/// Record one forwarded chunk.
pub fn record_chunk() {
    metrics::counter!("switchyard_chunks_total").increment(1);
}

/// Record upstream-reported token usage.
pub fn record_usage(usage: &Usage) {
    metrics::counter!("switchyard_tokens_total", "type" => "prompt").increment(usage.prompt_tokens);
    metrics::counter!("switchyard_tokens_total", "type" => "completion")
        .increment(usage.completion_tokens);
}

/// Record time to first token.
pub fn record_ttft(ttft_ms: u64) {
    metrics::histogram!("switchyard_ttft_seconds").record(ttft_ms as f64 / 1000.0);
}
