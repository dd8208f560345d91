// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard status` command implementation.
//!
//! Connects to the proxy's health endpoint to display state and uptime.
//! Falls back gracefully when the proxy is not running.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use switchyard_config::SwitchyardConfig;
use switchyard_core::SwitchyardError;

/// Health endpoint response from the proxy.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub host: String,
    pub port: u16,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

async fn fetch_status(host: &str, port: u16) -> Result<StatusResponse, SwitchyardError> {
    let url = format!("http://{host}:{port}/health");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| SwitchyardError::Internal(format!("failed to create HTTP client: {e}")))?;

    let mut status = StatusResponse {
        running: false,
        status: "not running".to_string(),
        version: None,
        uptime_secs: None,
        uptime_human: None,
        host: host.to_string(),
        port,
    };

    let response = client
        .get(&url)
        .send()
        .await
        .ok()
        .filter(|resp| resp.status().is_success());
    if let Some(resp) = response {
        let health: HealthResponse = resp.json().await.map_err(|e| {
            SwitchyardError::Internal(format!("failed to parse health response: {e}"))
        })?;
        status.running = true;
        status.status = health.status;
        status.version = Some(health.version);
        status.uptime_human = Some(format_uptime(health.uptime_secs));
        status.uptime_secs = Some(health.uptime_secs);
    }

    Ok(status)
}

/// Run the `switchyard status` command.
///
/// If `json` is set, outputs structured JSON for scripting.
pub async fn run_status(config: &SwitchyardConfig, json: bool) -> Result<(), SwitchyardError> {
    let status = fetch_status(&config.server.host, config.server.port).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  switchyard status");
    println!("  {}", "-".repeat(35));
    if status.running {
        println!(
            "    State:    [OK] {} (uptime: {})",
            status.status,
            status.uptime_human.as_deref().unwrap_or("?")
        );
        println!("    Version:  {}", status.version.as_deref().unwrap_or("?"));
    } else {
        println!("    State:    [--] not running");
    }
    println!("    Address:  {}:{}", status.host, status.port);
    println!();
    Ok(())
}
