// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard classify` command implementation.
//!
//! Runs the router over a saved request body without contacting upstream.

use std::path::Path;

use serde_json::Value;
use switchyard_config::SwitchyardConfig;
use switchyard_core::SwitchyardError;
use switchyard_gateway::ChatRequest;
use switchyard_router::{ModelRouter, RoutingDecision};

/// Route the request body stored at `path` with the configured router.
pub fn classify_file(
    config: &SwitchyardConfig,
    path: &Path,
) -> Result<RoutingDecision, SwitchyardError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        SwitchyardError::Internal(format!("failed to read {}: {e}", path.display()))
    })?;
    let body: Value = serde_json::from_str(&text)?;
    let request = ChatRequest::from_body(&body)?;

    let router = ModelRouter::new(config.routing.clone());
    Ok(router.route(
        &request.messages,
        request.tools.as_deref(),
        request.system.as_deref(),
        request.model.as_deref(),
    ))
}

/// Run the `switchyard classify` command.
pub fn run_classify(
    config: &SwitchyardConfig,
    path: &Path,
    json: bool,
) -> Result<(), SwitchyardError> {
    let decision = classify_file(config, path)?;

    if json {
        let out = serde_json::json!({
            "model": decision.model,
            "tier": decision.tier,
            "score": decision.score,
            "reason": decision.reason,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("tier:   {}", decision.tier);
        println!("score:  {}", decision.score);
        println!("model:  {}", decision.model);
        println!("reason: {}", decision.reason);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn classifies_saved_request() {
        let file = request_file(r#"{"messages": [{"role": "user", "content": "hello"}]}"#);
        let config = SwitchyardConfig::default();
        let decision = classify_file(&config, file.path()).unwrap();
        assert_eq!(decision.tier, switchyard_core::Complexity::Simple);
        assert_eq!(decision.model, config.routing.simple_model);
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let file = request_file("{oops");
        let err = classify_file(&SwitchyardConfig::default(), file.path()).unwrap_err();
        assert!(matches!(err, SwitchyardError::Serialization { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = classify_file(
            &SwitchyardConfig::default(),
            Path::new("/nonexistent/request.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
