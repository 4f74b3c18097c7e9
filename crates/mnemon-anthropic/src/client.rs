// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! Implements [`CompletionAdapter`] with non-streaming requests,
//! authentication headers, and single-retry on transient errors. Safe to
//! retry from the caller side: a completion request has no caller-visible
//! side effects.

use std::time::Duration;

use async_trait::async_trait;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::CompletionAdapter;
use mnemon_core::types::{CompletionRequest, CompletionResponse};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, Message, MessageRequest, MessageResponse};

/// Base URL for the Anthropic Messages API.
const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

fn analysis_err(message: String) -> MnemonError {
    MnemonError::Analysis {
        message,
        source: None,
    }
}

/// Anthropic-backed completion adapter.
#[derive(Debug, Clone)]
pub struct AnthropicCompletion {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl AnthropicCompletion {
    /// Creates a new adapter.
    ///
    /// # Arguments
    /// * `api_key` - Anthropic API key for authentication
    /// * `api_version` - API version string (e.g., "2023-06-01")
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, MnemonError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                MnemonError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                MnemonError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| analysis_err(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn send_once(&self, body: &MessageRequest) -> Result<MessageResponse, SendError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(body)
            .send()
            .await
            .map_err(|e| SendError::Fatal(analysis_err(format!("HTTP request failed: {e}"))))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<MessageResponse>()
                .await
                .map_err(|e| SendError::Fatal(analysis_err(format!("malformed response: {e}"))));
        }

        let body_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body_text)
            .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
            .unwrap_or_else(|_| format!("HTTP {status}"));

        // 429/5xx are worth one retry; everything else is not.
        if status.as_u16() == 429 || status.is_server_error() {
            Err(SendError::Transient(analysis_err(message)))
        } else {
            Err(SendError::Fatal(analysis_err(message)))
        }
    }
}

enum SendError {
    Transient(MnemonError),
    Fatal(MnemonError),
}

#[async_trait]
impl CompletionAdapter for AnthropicCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, MnemonError> {
        let body = MessageRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            match self.send_once(&body).await {
                Ok(response) => {
                    debug!(model = %response.model, id = %response.id, "completion succeeded");
                    return Ok(CompletionResponse {
                        content: response.text(),
                        model: response.model,
                        stop_reason: response.stop_reason,
                    });
                }
                Err(SendError::Transient(e)) => last_error = Some(e),
                Err(SendError::Fatal(e)) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| analysis_err("completion failed without response".to_string())))
    }
}
