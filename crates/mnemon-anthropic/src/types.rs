// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Anthropic Messages API (non-streaming subset).

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

/// One message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Response body for a successful non-streaming call.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// A content block in the response. Only text blocks are consumed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessageResponse {
    /// Concatenated text of all text content blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_blocks() {
        let response: MessageResponse = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "model": "claude-haiku-4-5",
                "content": [
                    {"type": "text", "text": "Hello "},
                    {"type": "text", "text": "world"}
                ],
                "stop_reason": "end_turn"
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Hello world");
    }

    #[test]
    fn unknown_content_block_is_tolerated() {
        let response: MessageResponse = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "model": "claude-haiku-4-5",
                "content": [
                    {"type": "thinking", "thinking": "..."},
                    {"type": "text", "text": "answer"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), "answer");
    }

    #[test]
    fn error_body_parses() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"error": {"type": "rate_limit_error", "message": "slow down"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.error_type, "rate_limit_error");
    }
}
