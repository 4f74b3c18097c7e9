// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API adapter for Mnemon.
//!
//! Provides [`AnthropicCompletion`], a [`mnemon_core::CompletionAdapter`]
//! implementation used by the semantic analyzer. Only the non-streaming
//! subset of the API is implemented; the analyzer consumes one full
//! response per ingestion.

pub mod client;
pub mod types;

pub use client::AnthropicCompletion;
