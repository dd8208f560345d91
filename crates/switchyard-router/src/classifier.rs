// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic request complexity classification.
//!
//! Scores the *current turn* of a conversation (the most recent message that
//! carries text) plus a few capped session-wide signals, and maps the score to
//! a [`Complexity`] tier. No LLM pre-call, no network, no shared state.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use switchyard_core::{Complexity, ConversationMessage};

/// Minimum score for the complex tier.
pub const COMPLEX_THRESHOLD: u32 = 5;

/// Minimum score for the moderate tier.
pub const MODERATE_THRESHOLD: u32 = 3;

/// How many trailing messages are inspected for recent tool results.
const RECENT_WINDOW: usize = 6;

/// Tool results within [`RECENT_WINDOW`] needed to count as heavy tool use.
const RECENT_TOOL_RESULTS: usize = 3;

/// Fenced code block marker, checked against the original-case text.
const CODE_FENCE: &str = "```";

/// A weighted vocabulary signal matched against the lower-cased current turn.
struct Signal {
    name: &'static str,
    pattern: Regex,
    weight: u32,
}

impl Signal {
    fn new(name: &'static str, pattern: &str, weight: u32) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("signal patterns are valid regexes"),
            weight,
        }
    }
}

static CODE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:function|class|const|import)\s").expect("code pattern is a valid regex")
});

static SIGNALS: LazyLock<Vec<Signal>> = LazyLock::new(|| {
    vec![
        Signal::new(
            "analytical",
            r"\b(?:analyze|compare|evaluate|assess|review|audit)\b",
            1,
        ),
        Signal::new(
            "computational",
            r"\b(?:calculate|compute|solve|equation|prove|derive)\b",
            2,
        ),
        Signal::new(
            "multi_step",
            r"\bfirst\b.*\bthen\b|\bstep\s*\d|\b1\).*\b2\)|\bphase\s*\d",
            1,
        ),
        Signal::new(
            "creative",
            r"\b(?:write\s+an?\s+(?:story|essay|article|report)|(?:create|design|build)\s+an?)\b",
            1,
        ),
        Signal::new(
            "engineering",
            r"\b(?:refactor|migrate|architect|implement|integrate)\b",
            1,
        ),
    ]
});

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Map a raw score onto a tier.
pub fn tier_for_score(score: u32) -> Complexity {
    if score >= COMPLEX_THRESHOLD {
        Complexity::Complex
    } else if score >= MODERATE_THRESHOLD {
        Complexity::Moderate
    } else {
        Complexity::Simple
    }
}

/// Text of the most recent message that carries any text, or empty.
///
/// Messages made only of tool invocations or results are skipped so agentic
/// bookkeeping never stands in for what the user actually asked.
pub fn current_turn_text(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .rev()
        .map(|m| m.content.extract_text())
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Deterministic, side-effect free complexity classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComplexityClassifier;

impl ComplexityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a request into a complexity tier.
    pub fn classify(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[Value]>,
        system: Option<&str>,
    ) -> Complexity {
        tier_for_score(self.score(messages, tools, system))
    }

    /// Sum of all signal weights for a request. Signals only ever add.
    pub fn score(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[Value]>,
        system: Option<&str>,
    ) -> u32 {
        let text = current_turn_text(messages);
        let mut score = Self::turn_score(&text);

        // Session-wide tool usage
        let tool_count = tools.map_or(0, <[Value]>::len);
        if tool_count > 0 || messages.iter().any(ConversationMessage::has_tool_activity) {
            score += 2;
        }
        if tool_count >= 5 {
            score += 1;
        }
        if tool_count >= 15 {
            score += 1;
        }

        // Recent agentic activity, capped to the trailing window
        let start = messages.len().saturating_sub(RECENT_WINDOW);
        let recent_results: usize = messages[start..]
            .iter()
            .map(ConversationMessage::tool_result_count)
            .sum();
        if recent_results >= RECENT_TOOL_RESULTS {
            score += 1;
        }

        if let Some(system) = system {
            let tokens = estimate_tokens(system);
            if tokens > 3000 {
                score += 1;
            }
            if tokens > 8000 {
                score += 2;
            }
        }

        score
    }

    /// Score contributed by the current turn's own text.
    fn turn_score(text: &str) -> u32 {
        let mut score = 0;
        let lower = text.to_lowercase();

        if text.contains(CODE_FENCE) || CODE_KEYWORDS.is_match(&lower) {
            score += 2;
        }

        score += SIGNALS
            .iter()
            .filter(|signal| signal.pattern.is_match(&lower))
            .map(|signal| {
                tracing::trace!(signal = signal.name, weight = signal.weight, "signal matched");
                signal.weight
            })
            .sum::<u32>();

        let tokens = estimate_tokens(text);
        if tokens > 2000 {
            score += 1;
        }
        if tokens > 5000 {
            score += 2;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_core::ContentBlock;

    fn user(text: &str) -> ConversationMessage {
        ConversationMessage::new("user", text)
    }

    fn score_text(text: &str) -> u32 {
        ComplexityClassifier::new().score(&[user(text)], None, None)
    }

    #[test]
    fn classify_empty_history_is_simple() {
        let c = ComplexityClassifier::new();
        assert_eq!(c.score(&[], None, None), 0);
        assert_eq!(c.classify(&[], None, None), Complexity::Simple);
    }

    #[test]
    fn classify_simple_greeting() {
        let c = ComplexityClassifier::new();
        assert_eq!(c.classify(&[user("hello")], None, None), Complexity::Simple);
    }

    #[test]
    fn classify_analysis_with_and_without_tools() {
        let c = ComplexityClassifier::new();
        let messages = [user("analyze this codebase")];
        assert_eq!(c.score(&messages, None, None), 1);
        assert_eq!(c.classify(&messages, None, None), Complexity::Simple);

        let tools = [json!({"type": "function", "function": {"name": "read_file"}})];
        assert_eq!(c.score(&messages, Some(&tools), None), 3);
        assert_eq!(c.classify(&messages, Some(&tools), None), Complexity::Moderate);
    }

    #[test]
    fn classify_fenced_code_counts_once() {
        let c = ComplexityClassifier::new();
        let messages = [user("```\nconst x = 1;\n```")];
        assert_eq!(c.score(&messages, None, None), 2);
        assert_eq!(c.classify(&messages, None, None), Complexity::Simple);
    }

    #[test]
    fn classify_very_long_turn_stacks_length_signals() {
        let text = "a".repeat(20_100);
        assert_eq!(estimate_tokens(&text), 5025);
        assert_eq!(score_text(&text), 3);
        assert_eq!(
            ComplexityClassifier::new().classify(&[user(&text)], None, None),
            Complexity::Moderate
        );
    }

    #[test]
    fn length_thresholds_are_strict() {
        assert_eq!(score_text(&"a".repeat(8000)), 0);
        assert_eq!(score_text(&"a".repeat(8001)), 1);
        assert_eq!(score_text(&"a".repeat(20_000)), 1);
        assert_eq!(score_text(&"a".repeat(20_001)), 3);
    }

    #[test]
    fn let_is_not_a_code_keyword() {
        assert_eq!(score_text("let me fix it"), 0);
    }

    #[test]
    fn code_keywords_match_case_insensitively() {
        assert_eq!(score_text("Import numpy as np"), 2);
        assert_eq!(score_text("a Function that returns"), 2);
    }

    #[test]
    fn categories_stack_but_do_not_double_count() {
        // analytical (+1) once despite two hits, computational (+2), engineering (+1)
        assert_eq!(score_text("review and audit, then calculate and implement"), 4);
    }

    #[test]
    fn multi_step_markers() {
        assert_eq!(score_text("first do x then do y"), 1);
        assert_eq!(score_text("see step 2 below"), 1);
        assert_eq!(score_text("1) parse 2) emit"), 1);
        assert_eq!(score_text("phase 3 rollout"), 1);
    }

    #[test]
    fn creative_requests() {
        assert_eq!(score_text("write a story about owls"), 1);
        assert_eq!(score_text("please build a landing page"), 1);
        assert_eq!(score_text("create an api for invoices"), 1);
        assert_eq!(score_text("design an index"), 1);
        assert_eq!(score_text("create api docs"), 0);
    }

    #[test]
    fn current_turn_skips_tool_only_messages() {
        let messages = vec![
            user("calculate the orbit"),
            ConversationMessage::with_blocks("assistant", vec![ContentBlock::tool_use("calc")]),
            ConversationMessage::with_blocks("user", vec![ContentBlock::tool_result("42")]),
        ];
        assert_eq!(current_turn_text(&messages), "calculate the orbit");
        // computational +2, tool activity in history +2
        assert_eq!(ComplexityClassifier::new().score(&messages, None, None), 4);
    }

    #[test]
    fn current_turn_is_only_the_latest_text() {
        let messages = vec![user("calculate and prove the theorem"), user("thanks")];
        assert_eq!(current_turn_text(&messages), "thanks");
        assert_eq!(ComplexityClassifier::new().score(&messages, None, None), 0);
    }

    #[test]
    fn text_blocks_are_joined_with_space() {
        let messages = vec![ConversationMessage::with_blocks(
            "user",
            vec![
                ContentBlock::text("step"),
                ContentBlock::tool_result("ignored"),
                ContentBlock::text("4 please"),
            ],
        )];
        assert_eq!(current_turn_text(&messages), "step 4 please");
    }

    #[test]
    fn tool_inventory_size_stacks() {
        let c = ComplexityClassifier::new();
        let messages = [user("hi")];
        let tools: Vec<Value> = (0..15).map(|i| json!({"name": format!("t{i}")})).collect();
        assert_eq!(c.score(&messages, Some(&tools[..1]), None), 2);
        assert_eq!(c.score(&messages, Some(&tools[..5]), None), 3);
        assert_eq!(c.score(&messages, Some(&tools), None), 4);
        assert_eq!(c.score(&messages, Some(&[]), None), 0);
    }

    #[test]
    fn recent_tool_results_only_counts_last_six() {
        let c = ComplexityClassifier::new();
        let result = || ConversationMessage::with_blocks("tool", vec![ContentBlock::tool_result("ok")]);

        let mut messages = vec![result(), result(), result()];
        messages.extend((0..6).map(|_| user("hi")));
        // tool activity anywhere in history +2, but none of the results are recent
        assert_eq!(c.score(&messages, None, None), 2);

        let recent = vec![user("hi"), result(), result(), result()];
        assert_eq!(c.score(&recent, None, None), 3);
    }

    #[test]
    fn system_prompt_size_stacks() {
        let c = ComplexityClassifier::new();
        let messages = [user("hi")];
        assert_eq!(c.score(&messages, None, Some(&"s".repeat(12_000))), 0);
        assert_eq!(c.score(&messages, None, Some(&"s".repeat(12_004))), 1);
        assert_eq!(c.score(&messages, None, Some(&"s".repeat(32_004))), 3);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for_score(0), Complexity::Simple);
        assert_eq!(tier_for_score(2), Complexity::Simple);
        assert_eq!(tier_for_score(3), Complexity::Moderate);
        assert_eq!(tier_for_score(4), Complexity::Moderate);
        assert_eq!(tier_for_score(5), Complexity::Complex);
        assert_eq!(tier_for_score(11), Complexity::Complex);
    }

    #[test]
    fn classify_complex_agentic_turn() {
        let c = ComplexityClassifier::new();
        let messages = [user("first refactor this module, then compute the diff")];
        let tools = [json!({"name": "edit"})];
        // engineering +1, multi-step +1, computational +2, tools +2
        assert_eq!(c.score(&messages, Some(&tools), None), 6);
        assert_eq!(c.classify(&messages, Some(&tools), None), Complexity::Complex);
    }
}
