// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./switchyard.toml` > `~/.config/switchyard/switchyard.toml`
//! > `/etc/switchyard/switchyard.toml` with environment variable overrides via
//! the `SWITCHYARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SwitchyardConfig;

/// Name of the config file looked up in each directory of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "switchyard.toml";

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/switchyard/switchyard.toml";

/// Sections that `SWITCHYARD_<SECTION>_<KEY>` variables map onto.
const ENV_SECTIONS: &[&str] = &["server", "provider", "routing", "proxy", "ledger", "logging"];

/// User config file location under the XDG config directory.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("switchyard").join(CONFIG_FILE_NAME))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchyard/switchyard.toml` (system-wide)
/// 3. `~/.config/switchyard/switchyard.toml` (user XDG config)
/// 4. `./switchyard.toml` (local directory)
/// 5. `SWITCHYARD_*` environment variables
pub fn load_config() -> Result<SwitchyardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `SWITCHYARD_PROVIDER_BASE_URL` maps to `provider.base_url` rather than
/// `provider.base.url`.
pub fn env_provider() -> Env {
    Env::prefixed("SWITCHYARD_")
        .filter(|key| is_section_key(&key.as_str().to_ascii_lowercase()))
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Whether a prefix-stripped env key belongs to one of the config sections.
fn is_section_key(key: &str) -> bool {
    ENV_SECTIONS.iter().any(|section| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

/// Map a lowercased, prefix-stripped env key onto its dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("provider_base_url"), "provider.base_url");
        assert_eq!(map_env_key("routing_force_model"), "routing.force_model");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn unknown_env_sections_pass_through() {
        assert_eq!(map_env_key("unrelated_key"), "unrelated_key");
    }

    #[test]
    fn only_section_keys_are_read_from_env() {
        assert!(is_section_key("provider_api_key"));
        assert!(is_section_key("proxy_offline"));
        assert!(!is_section_key("config"));
        assert!(!is_section_key("providers_x"));
    }
}
