// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemon memory pipeline.

use thiserror::Error;

/// The primary error type used across all Mnemon stores and pipeline stages.
#[derive(Debug, Error)]
pub enum MnemonError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected by the ingestion gate (unknown category, empty topic/content).
    ///
    /// Always raised before any storage side effect.
    #[error("validation error: {0}")]
    Validation(String),

    /// The semantic analysis collaborator is unavailable (timeout, rate limit,
    /// malformed response). Non-fatal: the orchestrator degrades to
    /// canonical-only storage when it sees this.
    #[error("analysis unavailable: {message}")]
    Analysis {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable record store errors (connection, query failure). Fatal to the
    /// ingestion: the canonical write must never be silently lost.
    #[error("record store error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Concept index errors (write or query failure on a single entry).
    #[error("concept index error: {message}")]
    Index {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Graph store errors (node/edge write or traversal failure).
    #[error("graph store error: {message}")]
    Graph {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
