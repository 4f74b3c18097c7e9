// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemon_core::error::MnemonError;
use mnemon_core::traits::CompletionAdapter;
use mnemon_core::types::{CompletionRequest, CompletionResponse};

/// A mock completion adapter that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned. Set `fail_all` to force every
/// call into an analysis-unavailable error.
pub struct MockCompletion {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: AtomicUsize,
    fail_all: bool,
}

impl MockCompletion {
    /// Create a new mock adapter with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            fail_all: false,
        }
    }

    /// Create a mock adapter pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: AtomicUsize::new(0),
            fail_all: false,
        }
    }

    /// Create a mock adapter where every call fails with an analysis error.
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            fail_all: true,
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, MnemonError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(MnemonError::Analysis {
                message: "mock completion configured to fail".to_string(),
                source: None,
            });
        }
        let text = self.next_response().await;
        Ok(CompletionResponse {
            content: text,
            model: request.model,
            stop_reason: Some("end_turn".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            prompt: "prompt".to_string(),
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let adapter = MockCompletion::new();
        let response = adapter.complete(make_request()).await.unwrap();
        assert_eq!(response.content, "mock response");
        assert_eq!(adapter.call_count(), 1);
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let adapter =
            MockCompletion::with_responses(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(
            adapter.complete(make_request()).await.unwrap().content,
            "first"
        );
        assert_eq!(
            adapter.complete(make_request()).await.unwrap().content,
            "second"
        );
        // Queue exhausted, falls back to default
        assert_eq!(
            adapter.complete(make_request()).await.unwrap().content,
            "mock response"
        );
    }

    #[tokio::test]
    async fn failing_adapter_always_errors() {
        let adapter = MockCompletion::failing();
        let result = adapter.complete(make_request()).await;
        assert!(matches!(result, Err(MnemonError::Analysis { .. })));
        assert_eq!(adapter.call_count(), 1);
    }
}
