// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage ledger capability: receives one entry per relayed request.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SwitchyardError;
use crate::types::{Complexity, Usage};

/// Summary of one relayed request, handed to the ledger after the relay returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Proxy-assigned request identifier.
    pub request_id: String,
    /// Model the request was routed to.
    pub model: String,
    /// Tier the classifier picked.
    pub tier: Complexity,
    /// Whether the upstream stream was fully drained.
    pub success: bool,
    /// Time to first upstream read, in milliseconds.
    pub ttft_ms: Option<u64>,
    /// Number of chunks forwarded.
    pub chunks: usize,
    /// Last usage counts reported upstream.
    pub usage: Option<Usage>,
}

/// Destination for per-request usage records.
#[async_trait]
pub trait UsageLedger: Send + Sync + 'static {
    /// Human-readable name of this ledger implementation.
    fn name(&self) -> &str;

    /// Records one entry. Failures are reported but never abort a request.
    async fn record(&self, entry: &LedgerEntry) -> Result<(), SwitchyardError>;
}

/// Ledger used when no ledger is configured. Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLedger;

#[async_trait]
impl UsageLedger for NoopLedger {
    fn name(&self) -> &str {
        "noop"
    }

    async fn record(&self, _entry: &LedgerEntry) -> Result<(), SwitchyardError> {
        Ok(())
    }
}

/// Ledger that emits each entry as a structured tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLedger;

#[async_trait]
impl UsageLedger for LogLedger {
    fn name(&self) -> &str {
        "log"
    }

    async fn record(&self, entry: &LedgerEntry) -> Result<(), SwitchyardError> {
        tracing::info!(
            request_id = %entry.request_id,
            model = %entry.model,
            tier = %entry.tier,
            success = entry.success,
            ttft_ms = entry.ttft_ms,
            chunks = entry.chunks,
            prompt_tokens = entry.usage.map(|u| u.prompt_tokens),
            completion_tokens = entry.usage.map(|u| u.completion_tokens),
            "relay recorded"
        );
        Ok(())
    }
}
