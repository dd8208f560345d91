// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request complexity classification and model routing for the Switchyard proxy.
//!
//! This crate provides:
//! - [`ComplexityClassifier`]: deterministic current-turn scoring (no I/O, no state)
//! - [`ModelRouter`]: maps a classified tier onto the configured model, honoring
//!   a forced model and the routing on/off switch
//!
//! The gateway calls the router once per request before relaying upstream.

pub mod classifier;
pub mod router;

pub use classifier::{current_turn_text, estimate_tokens, tier_for_score, ComplexityClassifier};
pub use router::{ModelRouter, RoutingDecision};
