// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduction of streamed chunks into one aggregate response.

use serde::Serialize;
use switchyard_core::{StreamChunk, Usage};

/// The single response reconstructed from a chunk sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    /// Concatenated `delta.content` of the first choice.
    pub content: String,
    /// Last usage counts seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Last model identifier seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Last finish reason seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental aggregator; feed chunks in arrival order.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AggregateResult,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk in. Fields with the wrong shape are ignored.
    pub fn push(&mut self, chunk: &StreamChunk) {
        if let Some(model) = chunk.model() {
            self.result.model = Some(model.to_string());
        }
        if let Some(content) = chunk.delta_content() {
            self.result.content.push_str(content);
        }
        if let Some(reason) = chunk.finish_reason() {
            self.result.finish_reason = Some(reason.to_string());
        }
        if let Some(usage) = chunk.usage() {
            self.result.usage = Some(usage);
        }
    }

    pub fn finish(self) -> AggregateResult {
        self.result
    }
}

/// Aggregate a complete chunk sequence.
pub fn aggregate_streaming_response(chunks: &[StreamChunk]) -> AggregateResult {
    let mut aggregator = Aggregator::new();
    for chunk in chunks {
        aggregator.push(chunk);
    }
    aggregator.finish()
}
