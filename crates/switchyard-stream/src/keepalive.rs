// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic SSE comment pings that keep idle connections from timing out.

use std::time::Duration;

use switchyard_core::SseTransport;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::sse::SseWriter;

/// Default interval between pings.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Handle to a running keep-alive task. Dropping it cancels the task.
#[derive(Debug)]
pub struct KeepAlive {
    token: CancellationToken,
}

impl KeepAlive {
    /// Stop pinging. Safe to call more than once.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Write a `: ping` comment to `writer` every `interval` until cancelled.
///
/// The task stops on its own the first time it finds the writer closed.
/// Must be called from within a Tokio runtime.
pub fn start_keep_alive<T: SseTransport>(writer: SseWriter<T>, interval: Duration) -> KeepAlive {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => {
                    if !writer.is_open().await || !writer.comment("ping").await {
                        trace!("keep-alive stopping, writer closed");
                        cancelled.cancel();
                        break;
                    }
                }
            }
        }
    });

    KeepAlive { token }
}
