// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concept index fan-out: one independent write per extracted concept.
//!
//! Writes are best-effort and isolated from one another; a failed entry is
//! recorded in the report while its siblings still land.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::warn;

use mnemon_core::traits::ConceptIndex;
use mnemon_core::types::{ConceptEntry, ConceptMetadata, MemoryRecord, SemanticAnalysis};

use crate::types::ConceptWriteReport;

pub struct ConceptIndexWriter {
    index: Arc<dyn ConceptIndex>,
    concurrency: usize,
}

impl ConceptIndexWriter {
    pub fn new(index: Arc<dyn ConceptIndex>, concurrency: usize) -> Self {
        Self {
            index,
            concurrency: concurrency.max(1),
        }
    }

    /// Build one entry per extracted concept and write them with bounded
    /// concurrency. Entry ids are `"{memory_id}-concept-{ordinal}"`.
    pub async fn store(
        &self,
        record: &MemoryRecord,
        analysis: &SemanticAnalysis,
    ) -> ConceptWriteReport {
        let entries = build_entries(record, analysis);
        if entries.is_empty() {
            return ConceptWriteReport {
                success: true,
                stored: 0,
                errors: vec![],
            };
        }

        let results: Vec<Result<(), String>> = stream::iter(entries)
            .map(|entry| {
                let index = Arc::clone(&self.index);
                async move {
                    let id = entry.id.clone();
                    index
                        .add(std::slice::from_ref(&entry))
                        .await
                        .map_err(|e| format!("{id}: {e}"))
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = ConceptWriteReport::default();
        for result in results {
            match result {
                Ok(()) => report.stored += 1,
                Err(message) => {
                    warn!(memory_id = record.id, error = %message, "concept write failed");
                    report.errors.push(message);
                }
            }
        }
        report.success = report.errors.is_empty();
        report
    }
}

fn build_entries(record: &MemoryRecord, analysis: &SemanticAnalysis) -> Vec<ConceptEntry> {
    let sibling_titles = analysis.concept_titles();
    // Same stamp as the canonical row, so enrichment artifacts agree.
    let created_at = record.created_at.clone();
    analysis
        .extracted_concepts
        .iter()
        .enumerate()
        .map(|(ordinal, concept)| {
            let document = if concept.description.trim().is_empty() {
                concept.title.clone()
            } else {
                concept.description.clone()
            };
            ConceptEntry {
                id: format!("{}-concept-{}", record.id, ordinal),
                document,
                metadata: ConceptMetadata {
                    concept_title: concept.title.clone(),
                    source_memory_id: record.id,
                    source_category: record.category.clone(),
                    source_topic: record.topic.clone(),
                    source_date: record.date.clone(),
                    memory_type: analysis.memory_type.clone(),
                    confidence: analysis.confidence,
                    mood: analysis.mood.clone(),
                    keywords: analysis.keywords.clone(),
                    extracted_concepts: sibling_titles.clone(),
                    created_at: created_at.clone(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemon_core::types::ExtractedConcept;

    fn record() -> MemoryRecord {
        MemoryRecord {
            id: 42,
            category: "projekte".into(),
            topic: "Release planning".into(),
            content: "Ship in March".into(),
            date: "2026-02-01".into(),
            created_at: "2026-02-01T09:00:00.000Z".into(),
        }
    }

    fn analysis() -> SemanticAnalysis {
        SemanticAnalysis {
            memory_type: "procedural".into(),
            confidence: 0.9,
            mood: Some("focused".into()),
            extracted_concepts: vec![
                ExtractedConcept {
                    title: "Release cadence".into(),
                    description: "Monthly releases with a freeze week".into(),
                },
                ExtractedConcept {
                    title: "Freeze week".into(),
                    description: String::new(),
                },
            ],
            keywords: vec!["release".into(), "planning".into()],
            category_suggestion: None,
            significance_signal: true,
        }
    }

    #[test]
    fn entry_ids_follow_ordinal_scheme() {
        let entries = build_entries(&record(), &analysis());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "42-concept-0");
        assert_eq!(entries[1].id, "42-concept-1");
        assert_eq!(entries[0].metadata.source_memory_id, 42);
        assert_eq!(entries[0].metadata.extracted_concepts.len(), 2);
        assert_eq!(entries[0].metadata.created_at, record().created_at);
    }

    #[test]
    fn empty_description_falls_back_to_title() {
        let entries = build_entries(&record(), &analysis());
        assert_eq!(entries[0].document, "Monthly releases with a freeze week");
        assert_eq!(entries[1].document, "Freeze week");
    }

    #[test]
    fn no_concepts_produces_no_entries() {
        let mut a = analysis();
        a.extracted_concepts.clear();
        assert!(build_entries(&record(), &a).is_empty());
    }

    #[tokio::test]
    async fn report_isolates_one_failed_write() {
        use mnemon_index::SqliteConceptIndex;
        use mnemon_test_utils::FailingConceptIndex;

        let mut a = analysis();
        a.extracted_concepts.push(ExtractedConcept {
            title: "Release notes".into(),
            description: "What changed, for whom".into(),
        });
        assert_eq!(a.extracted_concepts.len(), 3);

        let inner: Arc<dyn ConceptIndex> =
            Arc::new(SqliteConceptIndex::open_in_memory().await.unwrap());
        let index = Arc::new(FailingConceptIndex::new(
            Arc::clone(&inner),
            ["42-concept-1".to_string()],
        ));
        let writer = ConceptIndexWriter::new(index, 4);

        let report = writer.store(&record(), &a).await;
        assert!(!report.success);
        assert_eq!(report.stored, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("42-concept-1"));
        assert_eq!(inner.count().await.unwrap(), 2);
    }
}
