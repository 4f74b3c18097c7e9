// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM completion contract consumed by the semantic analyzer.

use async_trait::async_trait;

use crate::error::MnemonError;
use crate::types::{CompletionRequest, CompletionResponse};

/// Single-turn LLM completion.
///
/// Implementations must be safely retryable: a retried call must not cause
/// caller-side side effects.
#[async_trait]
pub trait CompletionAdapter: Send + Sync + 'static {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, MnemonError>;
}
