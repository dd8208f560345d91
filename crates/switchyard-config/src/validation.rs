// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: usable bind addresses,
//! well-formed provider URLs, non-empty model names.

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be between 1 and 65535".to_string());
    }

    if config.server.keepalive_secs == 0 {
        fail("server.keepalive_secs must be at least 1".to_string());
    }

    let base_url = config.provider.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "provider.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if !config.provider.chat_path.starts_with('/') {
        fail(format!(
            "provider.chat_path `{}` must start with `/`",
            config.provider.chat_path
        ));
    }

    if config.provider.timeout_secs == 0 {
        fail("provider.timeout_secs must be at least 1".to_string());
    }

    for (key, model) in [
        ("routing.simple_model", &config.routing.simple_model),
        ("routing.moderate_model", &config.routing.moderate_model),
        ("routing.complex_model", &config.routing.complex_model),
    ] {
        if model.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    if config
        .routing
        .force_model
        .as_deref()
        .is_some_and(|forced| forced.trim().is_empty())
    {
        fail("routing.force_model must not be empty when set".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
