// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for collaborators that live outside the proxy core.
//!
//! The usage ledger ships with a no-op implementation so the proxy runs
//! unchanged when it is switched off in configuration.

pub mod ledger;
pub mod transport;

pub use ledger::{LedgerEntry, LogLedger, NoopLedger, UsageLedger};
pub use transport::SseTransport;
