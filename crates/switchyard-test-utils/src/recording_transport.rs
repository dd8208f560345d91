// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory SSE transport for deterministic writer and relay tests.
//!
//! `RecordingTransport` implements `SseTransport`, capturing every frame it
//! accepts. Clones share state, so a test keeps one handle for inspection
//! while the writer owns the other.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use switchyard_core::SseTransport;

#[derive(Debug, Default)]
struct State {
    frames: Vec<String>,
    write_calls: usize,
    end_calls: usize,
    fail_on_write: Option<usize>,
    disconnected: bool,
}

/// A transport that records frames and can be told to fail or disconnect.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    /// Create a transport that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose `n`th write (1-based) is rejected, as a broken
    /// pipe would be. Later writes are rejected too.
    pub fn failing_on_write(n: usize) -> Self {
        let transport = Self::new();
        transport.state().fail_on_write = Some(n);
        transport
    }

    /// Simulate the remote peer going away.
    pub fn disconnect(&self) {
        self.state().disconnected = true;
    }

    /// Frames accepted so far, in order.
    pub fn frames(&self) -> Vec<String> {
        self.state().frames.clone()
    }

    /// All accepted frames concatenated, as the client would read them.
    pub fn body(&self) -> String {
        self.state().frames.concat()
    }

    /// Payloads of every `data:` line the client received.
    pub fn data_lines(&self) -> Vec<String> {
        self.body()
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(str::to_string)
            .collect()
    }

    /// Number of times `write` was invoked, including rejected attempts.
    pub fn write_calls(&self) -> usize {
        self.state().write_calls
    }

    /// Number of times `end` was invoked.
    pub fn end_calls(&self) -> usize {
        self.state().end_calls
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SseTransport for RecordingTransport {
    async fn write(&mut self, frame: String) -> bool {
        let mut state = self.state();
        state.write_calls += 1;
        if state.disconnected {
            return false;
        }
        if state
            .fail_on_write
            .is_some_and(|n| state.write_calls >= n)
        {
            state.disconnected = true;
            return false;
        }
        state.frames.push(frame);
        true
    }

    fn is_disconnected(&self) -> bool {
        self.state().disconnected
    }

    async fn end(&mut self) {
        self.state().end_calls += 1;
    }
}
