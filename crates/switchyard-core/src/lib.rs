// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchyard LLM proxy.
//!
//! This crate provides the error type, the conversation and stream data model,
//! and the capability traits for external collaborators. The classifier,
//! relay, and gateway crates all build on the types defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchyardError;
pub use traits::{LedgerEntry, LogLedger, NoopLedger, SseTransport, UsageLedger};
pub use types::{
    Complexity, ContentBlock, ConversationMessage, MessageContent, RequestContext, StreamChunk,
    Usage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switchyard_error_has_all_variants() {
        let _config = SwitchyardError::Config("test".into());
        let _rejected = SwitchyardError::UpstreamRejected {
            status: 429,
            message: "slow down".into(),
        };
        let _no_body = SwitchyardError::NoBody;
        let _transport = SwitchyardError::transport("reset", std::io::Error::other("test"));
        let _gone = SwitchyardError::ClientDisconnected;
        let _ser = SwitchyardError::Serialization {
            message: "test".into(),
            source: None,
        };
        let _server = SwitchyardError::Server {
            message: "test".into(),
            source: None,
        };
        let _internal = SwitchyardError::Internal("test".into());
    }

    #[test]
    fn error_status_codes() {
        let rejected = SwitchyardError::UpstreamRejected {
            status: 401,
            message: "bad key".into(),
        };
        assert_eq!(rejected.status_code(), 401);
        assert_eq!(SwitchyardError::NoBody.status_code(), 502);
        assert_eq!(
            SwitchyardError::transport("reset", std::io::Error::other("x")).status_code(),
            502
        );
        assert_eq!(SwitchyardError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn error_display_mentions_status() {
        let err = SwitchyardError::UpstreamRejected {
            status: 503,
            message: "overloaded".into(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("overloaded"));
    }

    #[test]
    fn json_errors_convert_to_serialization() {
        let err: SwitchyardError = serde_json::from_str::<serde_json::Value>("{nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, SwitchyardError::Serialization { .. }));
    }

    #[test]
    fn ledger_traits_are_exported() {
        fn _assert_ledger<T: UsageLedger>() {}
        _assert_ledger::<NoopLedger>();
        _assert_ledger::<LogLedger>();
    }

    #[test]
    fn request_context_defaults_to_online_without_audit() {
        let ctx = RequestContext::default();
        assert!(!ctx.audit);
        assert!(!ctx.offline);
    }
}
