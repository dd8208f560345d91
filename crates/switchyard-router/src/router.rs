// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing on top of the complexity classifier.
//!
//! Orchestrates model selection: global force > routing disabled > classify.

use serde_json::Value;
use switchyard_config::model::RoutingConfig;
use switchyard_core::{Complexity, ConversationMessage};
use tracing::debug;

use crate::classifier::{tier_for_score, ComplexityClassifier};

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Model the upstream request is sent with.
    pub model: String,
    /// Classified complexity tier.
    pub tier: Complexity,
    /// Raw classifier score behind `tier`.
    pub score: u32,
    /// Human-readable reason for the decision.
    pub reason: String,
}

/// Maps requests onto the configured model for their complexity tier.
pub struct ModelRouter {
    classifier: ComplexityClassifier,
    config: RoutingConfig,
}

impl ModelRouter {
    /// Create a new model router with the given configuration.
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            classifier: ComplexityClassifier::new(),
            config,
        }
    }

    /// The routing configuration in effect.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Route a request to a model.
    ///
    /// The request is always classified so the tier is available for metrics,
    /// even when the model itself comes from `force_model` or the client.
    pub fn route(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[Value]>,
        system: Option<&str>,
        requested_model: Option<&str>,
    ) -> RoutingDecision {
        let score = self.classifier.score(messages, tools, system);
        let tier = tier_for_score(score);

        let (model, reason) = if let Some(forced) = &self.config.force_model {
            (forced.clone(), "global force_model config".to_string())
        } else if !self.config.enabled {
            match requested_model {
                Some(requested) if !requested.trim().is_empty() => (
                    requested.to_string(),
                    "routing disabled, client model".to_string(),
                ),
                _ => (
                    self.config.moderate_model.clone(),
                    "routing disabled, default model".to_string(),
                ),
            }
        } else {
            (
                self.model_for_tier(tier).to_string(),
                format!("classified {tier} (score {score})"),
            )
        };

        debug!(
            model = model.as_str(),
            tier = %tier,
            score,
            reason = reason.as_str(),
            "routing decision"
        );

        RoutingDecision {
            model,
            tier,
            score,
            reason,
        }
    }

    /// Configured model identifier for a tier.
    pub fn model_for_tier(&self, tier: Complexity) -> &str {
        match tier {
            Complexity::Simple => &self.config.simple_model,
            Complexity::Moderate => &self.config.moderate_model,
            Complexity::Complex => &self.config.complex_model,
        }
    }
}
