// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline result and stage types.

use serde::Serialize;

/// Phases of one pipeline invocation.
///
/// `Rejected` is terminal before any storage; once `CanonicalStored` is
/// reached the pipeline never rolls back and always ends in `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Validated,
    Analyzed,
    Routed,
    CanonicalStored,
    EnrichmentSkipped,
    ConceptsStored,
    GraphLinked,
    RecencyAppended,
    Completed,
    Rejected,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Validated => "validated",
            PipelineStage::Analyzed => "analyzed",
            PipelineStage::Routed => "routed",
            PipelineStage::CanonicalStored => "canonical_stored",
            PipelineStage::EnrichmentSkipped => "enrichment_skipped",
            PipelineStage::ConceptsStored => "concepts_stored",
            PipelineStage::GraphLinked => "graph_linked",
            PipelineStage::RecencyAppended => "recency_appended",
            PipelineStage::Completed => "completed",
            PipelineStage::Rejected => "rejected",
        }
    }
}

/// Outcome of the significance gate, produced exactly once per ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceDecision {
    pub significant: bool,
    pub reason: String,
}

/// Category resolution result.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCategory {
    pub category: String,
    /// True when the LLM suggestion replaced the caller's category.
    pub corrected: bool,
}

/// Report of independent per-concept index writes.
///
/// `success` is true only when zero writes failed; partial failure is a
/// normal, reportable outcome, not an aborting error.
#[derive(Debug, Clone, Default)]
pub struct ConceptWriteReport {
    pub success: bool,
    pub stored: usize,
    pub errors: Vec<String>,
}

/// Report of graph node creation and best-effort edge derivation.
#[derive(Debug, Clone, Default)]
pub struct GraphLinkReport {
    pub node_created: bool,
    pub relationships_created: usize,
    pub errors: Vec<String>,
}

/// Aggregated result of one `execute_advanced_pipeline` call.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub memory_id: i64,
    pub stored_in_record_store: bool,
    pub stored_in_concepts: bool,
    pub stored_in_graph: bool,
    pub relationships_created: usize,
    pub significance_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names() {
        assert_eq!(PipelineStage::Received.as_str(), "received");
        assert_eq!(PipelineStage::CanonicalStored.as_str(), "canonical_stored");
        assert_eq!(PipelineStage::Rejected.as_str(), "rejected");
    }

    #[test]
    fn outcome_serializes_for_callers() {
        let outcome = PipelineOutcome {
            memory_id: 7,
            stored_in_record_store: true,
            stored_in_concepts: false,
            stored_in_graph: false,
            relationships_created: 0,
            significance_reason: "analysis_unavailable".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["memory_id"], 7);
        assert_eq!(json["stored_in_record_store"], true);
        assert_eq!(json["significance_reason"], "analysis_unavailable");
    }
}
