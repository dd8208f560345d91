// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completion chunk builders and upstream SSE fixtures.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use futures::Stream;
use serde_json::{json, Value};

/// Model name stamped on fixture chunks.
pub const FIXTURE_MODEL: &str = "gpt-test";

/// A delta chunk carrying a fragment of assistant text.
pub fn content_chunk(text: &str) -> Value {
    json!({
        "object": "chat.completion.chunk",
        "model": FIXTURE_MODEL,
        "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]
    })
}

/// A final chunk carrying only a finish reason.
pub fn finish_chunk(reason: &str) -> Value {
    json!({
        "object": "chat.completion.chunk",
        "model": FIXTURE_MODEL,
        "choices": [{"index": 0, "delta": {}, "finish_reason": reason}]
    })
}

/// A usage-only chunk, as sent when `stream_options.include_usage` is set.
pub fn usage_chunk(prompt_tokens: u64, completion_tokens: u64) -> Value {
    json!({
        "object": "chat.completion.chunk",
        "model": FIXTURE_MODEL,
        "choices": [],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

/// Upstream SSE body: one `data:` event per payload, then the `[DONE]` sentinel.
pub fn sse_body(payloads: &[Value]) -> String {
    let mut body: String = payloads
        .iter()
        .map(|payload| format!("data: {payload}\n\n"))
        .collect();
    body.push_str("data: [DONE]\n\n");
    body
}

/// A byte stream that yields each part after its delay.
///
/// Delays are measured with `tokio::time`, so tests running with paused time
/// see exact, deterministic timings.
pub fn timed_byte_stream(
    parts: Vec<(Duration, Vec<u8>)>,
) -> impl Stream<Item = Result<Vec<u8>, io::Error>> {
    futures::stream::unfold(VecDeque::from(parts), |mut parts| async move {
        let (delay, bytes) = parts.pop_front()?;
        tokio::time::sleep(delay).await;
        Some((Ok(bytes), parts))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn sse_body_ends_with_done() {
        let body = sse_body(&[content_chunk("hi")]);
        assert!(body.starts_with("data: {"));
        assert!(body.ends_with("data: [DONE]\n\n"));
        assert_eq!(body.matches("\n\n").count(), 2);
    }

    #[test]
    fn usage_chunk_totals() {
        let chunk = usage_chunk(10, 5);
        assert_eq!(chunk["usage"]["total_tokens"], 15);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_stream_respects_delays() {
        let start = tokio::time::Instant::now();
        let parts = vec![
            (Duration::from_millis(100), b"a".to_vec()),
            (Duration::from_millis(50), b"b".to_vec()),
        ];
        let items: Vec<_> = timed_byte_stream(parts).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(150));
    }
}
