// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchyard proxy.

use thiserror::Error;

/// The primary error type used across Switchyard crates.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Configuration errors (invalid values, unusable header material).
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream provider answered with a non-success status.
    #[error("upstream rejected request with status {status}: {message}")]
    UpstreamRejected { status: u16, message: String },

    /// The upstream provider answered without a readable body.
    #[error("upstream response has no readable body")]
    NoBody,

    /// Network or decode failure while talking to the upstream provider.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The downstream client went away while a response was being streamed.
    #[error("client disconnected")]
    ClientDisconnected,

    /// JSON encoding or decoding failed.
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchyardError {
    /// Shorthand for a [`SwitchyardError::Transport`] wrapping a source error.
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status code that best describes this error when surfaced to a client.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamRejected { status, .. } => *status,
            Self::NoBody | Self::Transport { .. } => 502,
            Self::ClientDisconnected => 499,
            Self::Serialization { .. } => 400,
            Self::Config(_) | Self::Server { .. } | Self::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for SwitchyardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
