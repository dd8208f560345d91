// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the classifier, the relay, and the gateway.
//!
//! Provider payloads are treated as loosely shaped JSON: every accessor
//! validates the field it reads and reports a missing or mistyped field as
//! `None` rather than failing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Routing tier chosen for a request, ordered by ascending resource cost.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// One block of structured message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// User- or assistant-authored text.
    Text {
        #[serde(default)]
        text: String,
    },
    /// A tool invocation emitted by the model.
    ToolUse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Value>,
    },
    /// The result of a tool invocation, fed back to the model.
    ToolResult {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_use_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Value>,
    },
    /// Any block type the proxy does not interpret (images, documents, ...).
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// Builds a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Builds a bare tool-use block.
    pub fn tool_use(name: impl Into<String>) -> Self {
        Self::ToolUse {
            id: None,
            name: Some(name.into()),
            input: None,
        }
    }

    /// Builds a bare tool-result block.
    pub fn tool_result(content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: None,
            content: Some(Value::String(content.into())),
        }
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, Self::ToolUse { .. })
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Self::ToolResult { .. })
    }
}

/// Message content: either a plain string or an ordered list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

impl MessageContent {
    /// Lenient conversion from raw JSON.
    ///
    /// Strings become text, arrays become blocks (unparseable elements become
    /// [`ContentBlock::Other`]), anything else becomes empty text.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Blocks(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or(ContentBlock::Other))
                    .collect(),
            ),
            _ => Self::default(),
        }
    }

    /// Text extracted from this content: the string itself, or all text blocks
    /// joined with a single space in block order.
    pub fn extract_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// The content blocks, or an empty slice for plain-string content.
    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            Self::Text(_) => &[],
            Self::Blocks(blocks) => blocks,
        }
    }
}

/// One turn in a chat history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: MessageContent,
}

impl ConversationMessage {
    /// A message with plain-string content.
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A message with block content.
    pub fn with_blocks(role: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Some(role.into()),
            content: MessageContent::Blocks(blocks),
        }
    }

    pub fn has_tool_activity(&self) -> bool {
        self.content
            .blocks()
            .iter()
            .any(|b| b.is_tool_use() || b.is_tool_result())
    }

    pub fn tool_result_count(&self) -> usize {
        self.content
            .blocks()
            .iter()
            .filter(|b| b.is_tool_result())
            .count()
    }
}

/// Token usage counts reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A single decoded upstream JSON payload (a partial chat-completion object).
///
/// The raw value is kept intact so it can be forwarded to the client byte for
/// byte; the accessors below read individual fields defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamChunk(Value);

impl StreamChunk {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `model` field, if it is a string.
    pub fn model(&self) -> Option<&str> {
        self.0.get("model")?.as_str()
    }

    /// `choices[0]`, if `choices` is a non-empty array whose first element is an object.
    pub fn first_choice(&self) -> Option<&Map<String, Value>> {
        self.0.get("choices")?.as_array()?.first()?.as_object()
    }

    /// `choices[0].delta.content`, if it is a string.
    pub fn delta_content(&self) -> Option<&str> {
        self.first_choice()?.get("delta")?.get("content")?.as_str()
    }

    /// `choices[0].finish_reason`, if it is a string.
    pub fn finish_reason(&self) -> Option<&str> {
        self.first_choice()?.get("finish_reason")?.as_str()
    }

    /// The `usage` object, when both prompt and completion counts are numeric.
    ///
    /// `total_tokens` falls back to the sum of the two when absent.
    pub fn usage(&self) -> Option<Usage> {
        let usage = self.0.get("usage")?.as_object()?;
        let prompt_tokens = usage.get("prompt_tokens")?.as_u64()?;
        let completion_tokens = usage.get("completion_tokens")?.as_u64()?;
        let total_tokens = usage
            .get("total_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(prompt_tokens + completion_tokens);
        Some(Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        })
    }
}

impl From<Value> for StreamChunk {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Per-request settings threaded from configuration into every handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Log routing decisions and aggregated responses at info level.
    pub audit: bool,
    /// Refuse upstream calls; clients receive an error event instead.
    pub offline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_content_extracts_verbatim() {
        let msg: ConversationMessage =
            serde_json::from_value(json!({"role": "user", "content": "hello"})).unwrap();
        assert_eq!(msg.content.extract_text(), "hello");
        assert!(!msg.has_tool_activity());
    }

    #[test]
    fn block_content_joins_text_blocks_with_space() {
        let msg: ConversationMessage = serde_json::from_value(json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "first"},
                {"type": "tool_result", "tool_use_id": "t1", "content": "ok"},
                {"type": "text", "text": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(msg.content.extract_text(), "first second");
        assert!(msg.has_tool_activity());
        assert_eq!(msg.tool_result_count(), 1);
    }

    #[test]
    fn unknown_block_types_are_tolerated() {
        let msg: ConversationMessage = serde_json::from_value(json!({
            "content": [
                {"type": "image", "source": {"data": "..."}},
                {"no_type": true},
                {"type": "text", "text": "caption"}
            ]
        }))
        .unwrap();
        assert_eq!(msg.role, None);
        assert_eq!(msg.content.blocks()[0], ContentBlock::Other);
        assert_eq!(msg.content.blocks()[1], ContentBlock::Other);
        assert_eq!(msg.content.extract_text(), "caption");
    }

    #[test]
    fn null_or_missing_content_is_empty_text() {
        let msg: ConversationMessage =
            serde_json::from_value(json!({"role": "assistant", "content": null})).unwrap();
        assert_eq!(msg.content, MessageContent::Text(String::new()));
        let msg: ConversationMessage =
            serde_json::from_value(json!({"role": "assistant"})).unwrap();
        assert_eq!(msg.content.extract_text(), "");
    }

    #[test]
    fn complexity_is_ordered_by_cost() {
        assert!(Complexity::Simple < Complexity::Moderate);
        assert!(Complexity::Moderate < Complexity::Complex);
        assert_eq!(Complexity::Moderate.to_string(), "moderate");
        assert_eq!(
            "complex".parse::<Complexity>().unwrap(),
            Complexity::Complex
        );
        assert_eq!(
            serde_json::to_string(&Complexity::Simple).unwrap(),
            "\"simple\""
        );
    }

    #[test]
    fn chunk_accessors_read_openai_delta() {
        let chunk = StreamChunk::new(json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{"index": 0, "delta": {"content": "Hi"}, "finish_reason": null}]
        }));
        assert_eq!(chunk.model(), Some("gpt-4o"));
        assert_eq!(chunk.delta_content(), Some("Hi"));
        assert_eq!(chunk.finish_reason(), None);
        assert_eq!(chunk.usage(), None);
    }

    #[test]
    fn chunk_accessors_reject_wrong_shapes() {
        let chunk = StreamChunk::new(json!({
            "model": 42,
            "choices": [],
            "usage": {"prompt_tokens": "ten", "completion_tokens": 2}
        }));
        assert_eq!(chunk.model(), None);
        assert!(chunk.first_choice().is_none());
        assert_eq!(chunk.usage(), None);

        let chunk = StreamChunk::new(json!({"choices": "nope"}));
        assert!(chunk.first_choice().is_none());
        assert_eq!(chunk.delta_content(), None);
    }

    #[test]
    fn usage_total_defaults_to_sum() {
        let chunk = StreamChunk::new(json!({
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }));
        assert_eq!(
            chunk.usage(),
            Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15
            })
        );

        let chunk = StreamChunk::new(json!({
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 20}
        }));
        assert_eq!(chunk.usage().map(|u| u.total_tokens), Some(20));
    }

    #[test]
    fn chunk_serializes_transparently() {
        let raw = json!({"choices": [{"delta": {"content": "x"}}]});
        let chunk = StreamChunk::new(raw.clone());
        assert_eq!(serde_json::to_value(&chunk).unwrap(), raw);
    }
}
