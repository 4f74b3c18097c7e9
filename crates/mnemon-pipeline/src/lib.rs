// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The advanced memory pipeline.
//!
//! Composes the ingestion gate, LLM semantic analysis, significance gating,
//! category routing, canonical persistence, and best-effort enrichment
//! fan-out (concept index, relationship graph, recency window) behind one
//! orchestrator. All collaborators are injected as trait objects; no stage
//! knows a concrete backend.

pub mod analyzer;
pub mod concepts;
pub mod gate;
pub mod orchestrator;
pub mod recency;
pub mod relationships;
pub mod router;
pub mod significance;
pub mod types;

pub use analyzer::SemanticAnalyzer;
pub use concepts::ConceptIndexWriter;
pub use gate::IngestionGate;
pub use orchestrator::PipelineOrchestrator;
pub use recency::RecencyCache;
pub use relationships::{RELATED_CONCEPTS, RelationshipBuilder};
pub use router::CategoryRouter;
pub use significance::{SignificancePolicy, ThresholdPolicy};
pub use types::{
    ConceptWriteReport, GraphLinkReport, PipelineOutcome, PipelineStage, RoutedCategory,
    SignificanceDecision,
};
