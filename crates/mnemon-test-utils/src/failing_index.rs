// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fault-injecting concept index wrapper.
//!
//! Wraps any real `ConceptIndex` and fails writes whose entry id is in the
//! configured set. Drives partial-failure tests: concept writes must be
//! independent, so one engineered failure leaves siblings stored.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use mnemon_core::error::MnemonError;
use mnemon_core::traits::ConceptIndex;
use mnemon_core::types::{ConceptEntry, ScoredConcept};

/// Concept index that rejects writes for the configured entry ids.
pub struct FailingConceptIndex {
    inner: Arc<dyn ConceptIndex>,
    fail_ids: HashSet<String>,
}

impl FailingConceptIndex {
    /// Wrap `inner`, failing any `add` batch containing one of `fail_ids`.
    pub fn new(inner: Arc<dyn ConceptIndex>, fail_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner,
            fail_ids: fail_ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ConceptIndex for FailingConceptIndex {
    async fn add(&self, entries: &[ConceptEntry]) -> Result<(), MnemonError> {
        if let Some(entry) = entries.iter().find(|e| self.fail_ids.contains(&e.id)) {
            return Err(MnemonError::Index {
                message: format!("injected failure for entry '{}'", entry.id),
                source: None,
            });
        }
        self.inner.add(entries).await
    }

    async fn query(
        &self,
        text: &str,
        k: usize,
        category: Option<&str>,
    ) -> Result<Vec<ScoredConcept>, MnemonError> {
        self.inner.query(text, k, category).await
    }

    async fn count(&self) -> Result<u64, MnemonError> {
        self.inner.count().await
    }
}
