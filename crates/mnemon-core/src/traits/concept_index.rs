// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concept index contract: independent, append-only semantic search entries.

use async_trait::async_trait;

use crate::error::MnemonError;
use crate::types::{ConceptEntry, ScoredConcept};

/// Vector-/text-indexed store of concept entries.
///
/// Entries are append-only on the pipeline path. The concept writer calls
/// `add` with single-entry batches so that one failing write never blocks
/// its siblings.
#[async_trait]
pub trait ConceptIndex: Send + Sync + 'static {
    /// Adds entries to the index. A duplicate id is an error.
    async fn add(&self, entries: &[ConceptEntry]) -> Result<(), MnemonError>;

    /// Ranked retrieval for a query text, optionally filtered by the
    /// source memory's category. Lower distance means closer.
    async fn query(
        &self,
        text: &str,
        k: usize,
        category: Option<&str>,
    ) -> Result<Vec<ScoredConcept>, MnemonError>;

    /// Total number of entries.
    async fn count(&self) -> Result<u64, MnemonError>;
}
