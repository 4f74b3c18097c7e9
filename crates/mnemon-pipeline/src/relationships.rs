// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph enrichment: mirror the canonical record as a node and derive
//! `related_concepts` edges from term overlap with existing nodes.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::warn;

use mnemon_core::error::MnemonError;
use mnemon_core::traits::GraphStore;
use mnemon_core::types::{
    GraphEdge, GraphMemoryNode, GraphStatistics, MemoryRecord, RelatedNode, SemanticAnalysis,
    iso_timestamp_now,
};

use crate::types::GraphLinkReport;

pub const RELATED_CONCEPTS: &str = "related_concepts";

pub struct RelationshipBuilder {
    graph: Arc<dyn GraphStore>,
    overlap_threshold: usize,
    concurrency: usize,
}

impl RelationshipBuilder {
    pub fn new(graph: Arc<dyn GraphStore>, overlap_threshold: usize, concurrency: usize) -> Self {
        Self {
            graph,
            overlap_threshold: overlap_threshold.max(1),
            concurrency: concurrency.max(1),
        }
    }

    /// Create the node mirror and best-effort edges to overlapping nodes.
    ///
    /// Node creation failure is the only hard error here; each candidate
    /// edge is independent and a failed edge only lands in the report.
    pub async fn link(
        &self,
        record: &MemoryRecord,
        analysis: &SemanticAnalysis,
    ) -> Result<GraphLinkReport, MnemonError> {
        // Snapshot candidates before inserting so the new node never
        // matches itself.
        let candidates = self.graph.all_nodes().await?;

        let own_terms = collect_terms(&analysis.keywords, &analysis.concept_titles());
        let node = GraphMemoryNode {
            id: record.id,
            category: record.category.clone(),
            topic: record.topic.clone(),
            content: record.content.clone(),
            date: record.date.clone(),
            created_at: record.created_at.clone(),
            keywords: analysis.keywords.clone(),
            extracted_concepts: analysis.concept_titles(),
            embedding: None,
        };
        self.graph.create_node(&node).await?;

        let mut report = GraphLinkReport {
            node_created: true,
            relationships_created: 0,
            errors: vec![],
        };

        let edges: Vec<GraphEdge> = candidates
            .iter()
            .filter(|candidate| candidate.id != record.id)
            .filter_map(|candidate| {
                let candidate_terms =
                    collect_terms(&candidate.keywords, &candidate.extracted_concepts);
                let shared = term_overlap(&own_terms, &candidate_terms);
                if shared.len() >= self.overlap_threshold {
                    Some(GraphEdge {
                        from_id: record.id,
                        to_id: candidate.id,
                        edge_type: RELATED_CONCEPTS.to_string(),
                        properties: serde_json::json!({
                            "shared_terms": shared,
                            "overlap_count": shared.len(),
                        }),
                        created_at: iso_timestamp_now(),
                    })
                } else {
                    None
                }
            })
            .collect();

        let results: Vec<Result<(), String>> = stream::iter(edges)
            .map(|edge| {
                let graph = Arc::clone(&self.graph);
                async move {
                    let to_id = edge.to_id;
                    graph
                        .create_edge(&edge)
                        .await
                        .map_err(|e| format!("edge to {to_id}: {e}"))
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for result in results {
            match result {
                Ok(()) => report.relationships_created += 1,
                Err(message) => {
                    warn!(memory_id = record.id, error = %message, "edge write failed");
                    report.errors.push(message);
                }
            }
        }
        Ok(report)
    }

    /// Bounded traversal from a memory's node.
    pub async fn find_related(
        &self,
        id: i64,
        types: Option<&[String]>,
        max_depth: u32,
    ) -> Result<Vec<RelatedNode>, MnemonError> {
        self.graph.find_related(id, types, max_depth).await
    }

    pub async fn statistics(&self) -> Result<GraphStatistics, MnemonError> {
        self.graph.statistics().await
    }

    /// Detach and remove a memory's node. `false` when absent.
    pub async fn delete_node(&self, id: i64) -> Result<bool, MnemonError> {
        self.graph.delete_node(id).await
    }
}

fn collect_terms(keywords: &[String], concept_titles: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = keywords
        .iter()
        .chain(concept_titles.iter())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Case-insensitive intersection of two normalized term lists.
fn term_overlap(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|t| b.contains(t)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_terms_normalizes_and_dedups() {
        let terms = collect_terms(
            &["Rust".into(), "async ".into(), "rust".into()],
            &["Async".into(), "Tokio".into()],
        );
        assert_eq!(terms, vec!["async", "rust", "tokio"]);
    }

    #[test]
    fn overlap_is_case_insensitive_via_normalization() {
        let a = collect_terms(&["Deployment".into(), "CI".into()], &[]);
        let b = collect_terms(&["deployment".into(), "ci".into(), "docker".into()], &[]);
        assert_eq!(term_overlap(&a, &b), vec!["ci", "deployment"]);
    }

    #[test]
    fn disjoint_terms_have_no_overlap() {
        let a = collect_terms(&["alpha".into()], &[]);
        let b = collect_terms(&["beta".into()], &[]);
        assert!(term_overlap(&a, &b).is_empty());
    }
}
