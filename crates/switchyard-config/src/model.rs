// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Switchyard proxy.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Switchyard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Listener settings for the local HTTP server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream provider endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Complexity-based model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Per-request behavior switches.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Usage ledger selection.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the proxy to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the proxy to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interval between SSE keep-alive comments, in seconds.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_keepalive_secs() -> u64 {
    15
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the chat-completion provider.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the streaming chat-completion endpoint, appended to `base_url`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// API key sent as a bearer token when the client supplies no `Authorization` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Full URL of the chat-completion endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_path)
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_path() -> String {
    "/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Model routing configuration.
///
/// Controls automatic complexity classification and model tier selection.
/// When enabled, requests are routed to the simple, moderate, or complex
/// model based on the current turn of the conversation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Enable model routing. When false, the client's requested model is used.
    #[serde(default = "default_routing_enabled")]
    pub enabled: bool,

    /// Force all requests to a specific model, bypassing classification.
    #[serde(default)]
    pub force_model: Option<String>,

    /// Model identifier for simple requests.
    #[serde(default = "default_simple_model")]
    pub simple_model: String,

    /// Model identifier for moderate requests.
    #[serde(default = "default_moderate_model")]
    pub moderate_model: String,

    /// Model identifier for complex requests.
    #[serde(default = "default_complex_model")]
    pub complex_model: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: default_routing_enabled(),
            force_model: None,
            simple_model: default_simple_model(),
            moderate_model: default_moderate_model(),
            complex_model: default_complex_model(),
        }
    }
}

fn default_routing_enabled() -> bool {
    true
}

fn default_simple_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_moderate_model() -> String {
    "gpt-4o".to_string()
}

fn default_complex_model() -> String {
    "o3".to_string()
}

/// Per-request behavior switches, threaded into handlers as a request context.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Log every routing decision and aggregated response at info level.
    #[serde(default)]
    pub audit: bool,

    /// Refuse all upstream calls.
    #[serde(default)]
    pub offline: bool,
}

/// Which usage ledger implementation receives per-request records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMode {
    /// Discard usage records.
    #[default]
    Off,
    /// Emit usage records as tracing events.
    Log,
}

/// Usage ledger configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default)]
    pub mode: LedgerMode,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
