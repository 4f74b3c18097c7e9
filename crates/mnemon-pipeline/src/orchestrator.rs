// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The advanced memory pipeline orchestrator.
//!
//! Stage order per ingestion: validate, analyze, decide significance,
//! route category, persist canonical, then (only for significant memories)
//! fan out concept and graph enrichment, and finally append to the recency
//! window. Once the canonical write lands it is never rolled back;
//! enrichment failures degrade the outcome report, not the stored memory.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use mnemon_config::MnemonConfig;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::{CompletionAdapter, ConceptIndex, GraphStore, RecordStore};
use mnemon_core::types::{MemoryRecord, RecencyEntry, SemanticAnalysis};

use crate::analyzer::SemanticAnalyzer;
use crate::concepts::ConceptIndexWriter;
use crate::gate::IngestionGate;
use crate::recency::RecencyCache;
use crate::relationships::RelationshipBuilder;
use crate::router::CategoryRouter;
use crate::significance::{SignificancePolicy, ThresholdPolicy};
use crate::types::{PipelineOutcome, PipelineStage, SignificanceDecision};

pub struct PipelineOrchestrator {
    gate: IngestionGate,
    analyzer: SemanticAnalyzer,
    policy: Arc<dyn SignificancePolicy>,
    router: CategoryRouter,
    records: Arc<dyn RecordStore>,
    concepts: ConceptIndexWriter,
    relationships: RelationshipBuilder,
    recency: Arc<RecencyCache>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: &MnemonConfig,
        provider: Arc<dyn CompletionAdapter>,
        records: Arc<dyn RecordStore>,
        index: Arc<dyn ConceptIndex>,
        graph: Arc<dyn GraphStore>,
    ) -> Self {
        let policy = Arc::new(ThresholdPolicy::new(config.significance.clone()));
        Self::with_policy(config, provider, records, index, graph, policy)
    }

    /// Build with a caller-supplied significance policy.
    pub fn with_policy(
        config: &MnemonConfig,
        provider: Arc<dyn CompletionAdapter>,
        records: Arc<dyn RecordStore>,
        index: Arc<dyn ConceptIndex>,
        graph: Arc<dyn GraphStore>,
        policy: Arc<dyn SignificancePolicy>,
    ) -> Self {
        Self {
            gate: IngestionGate::new(config.pipeline.allowed_categories.clone()),
            analyzer: SemanticAnalyzer::new(
                provider,
                config.llm.model.clone(),
                config.llm.max_tokens,
                Duration::from_secs(config.llm.timeout_secs),
                config.pipeline.max_concepts_per_memory,
            ),
            policy,
            router: CategoryRouter::new(
                config.pipeline.allowed_categories.clone(),
                config.pipeline.category_override_confidence,
            ),
            records,
            concepts: ConceptIndexWriter::new(index, config.pipeline.fanout_concurrency),
            relationships: RelationshipBuilder::new(
                graph,
                config.pipeline.edge_overlap_threshold,
                config.pipeline.fanout_concurrency,
            ),
            recency: Arc::new(RecencyCache::new(config.recency.capacity)),
        }
    }

    /// The recency window shared with callers.
    pub fn recency(&self) -> Arc<RecencyCache> {
        Arc::clone(&self.recency)
    }

    /// Ingest one memory through the full pipeline.
    ///
    /// `force_relationships` runs enrichment even for non-significant
    /// memories, provided analysis succeeded. Only `Validation` (before any
    /// storage) and `Storage` (canonical write) errors surface to the
    /// caller; everything else degrades into the outcome report.
    pub async fn execute_advanced_pipeline(
        &self,
        category: &str,
        topic: &str,
        content: &str,
        force_relationships: bool,
    ) -> Result<PipelineOutcome, MnemonError> {
        info!(category, topic, stage = PipelineStage::Received.as_str(), "ingesting memory");

        let raw = self.gate.validate(category, topic, content).inspect_err(|e| {
            warn!(stage = PipelineStage::Rejected.as_str(), error = %e, "memory rejected");
        })?;
        info!(stage = PipelineStage::Validated.as_str(), category = %raw.category, "memory validated");

        let analysis: Option<SemanticAnalysis> = match self.analyzer.analyze(&raw).await {
            Ok(analysis) => {
                info!(
                    stage = PipelineStage::Analyzed.as_str(),
                    memory_type = %analysis.memory_type,
                    confidence = analysis.confidence,
                    concepts = analysis.extracted_concepts.len(),
                    "analysis complete"
                );
                Some(analysis)
            }
            Err(e) => {
                warn!(error = %e, "analysis unavailable, storing canonical only");
                None
            }
        };

        // The gate decision happens exactly once, here.
        let decision = match analysis.as_ref() {
            Some(analysis) => self.policy.evaluate(analysis),
            None => SignificanceDecision {
                significant: false,
                reason: "analysis_unavailable".to_string(),
            },
        };

        let routed = self.router.resolve(&raw.category, analysis.as_ref());
        info!(
            stage = PipelineStage::Routed.as_str(),
            category = %routed.category,
            corrected = routed.corrected,
            significant = decision.significant,
            reason = %decision.reason,
            "routing resolved"
        );

        let memory_id = self
            .records
            .insert(
                &routed.category,
                &raw.topic,
                &raw.content,
                &raw.date,
                &raw.created_at,
            )
            .await?;
        info!(stage = PipelineStage::CanonicalStored.as_str(), memory_id, "canonical record stored");

        let record = MemoryRecord {
            id: memory_id,
            category: routed.category.clone(),
            topic: raw.topic.clone(),
            content: raw.content.clone(),
            date: raw.date.clone(),
            created_at: raw.created_at.clone(),
        };

        let mut outcome = PipelineOutcome {
            memory_id,
            stored_in_record_store: true,
            stored_in_concepts: false,
            stored_in_graph: false,
            relationships_created: 0,
            significance_reason: if routed.corrected {
                "category_corrected".to_string()
            } else {
                decision.reason.clone()
            },
        };

        let enrich = decision.significant || (force_relationships && analysis.is_some());
        match (enrich, analysis.as_ref()) {
            (true, Some(analysis)) => {
                let concept_report = self.concepts.store(&record, analysis).await;
                outcome.stored_in_concepts = concept_report.success && concept_report.stored > 0;
                if !concept_report.errors.is_empty() {
                    warn!(
                        memory_id,
                        stored = concept_report.stored,
                        failed = concept_report.errors.len(),
                        "partial concept enrichment"
                    );
                }
                if concept_report.stored > 0 || concept_report.success {
                    info!(
                        stage = PipelineStage::ConceptsStored.as_str(),
                        memory_id,
                        stored = concept_report.stored,
                        "concepts indexed"
                    );
                }

                match self.relationships.link(&record, analysis).await {
                    Ok(link_report) => {
                        outcome.stored_in_graph = link_report.node_created;
                        outcome.relationships_created = link_report.relationships_created;
                        info!(
                            stage = PipelineStage::GraphLinked.as_str(),
                            memory_id,
                            relationships = link_report.relationships_created,
                            "graph enrichment complete"
                        );
                    }
                    Err(e) => {
                        warn!(memory_id, error = %e, "graph enrichment failed");
                    }
                }
            }
            _ => {
                info!(stage = PipelineStage::EnrichmentSkipped.as_str(), memory_id, "enrichment skipped");
            }
        }

        self.recency.append(RecencyEntry {
            topic: record.topic.clone(),
            content: record.content.clone(),
            date: record.date.clone(),
        });
        debug!(stage = PipelineStage::RecencyAppended.as_str(), memory_id, "recency window updated");
        info!(
            stage = PipelineStage::Completed.as_str(),
            memory_id,
            stored_in_concepts = outcome.stored_in_concepts,
            stored_in_graph = outcome.stored_in_graph,
            "pipeline complete"
        );
        Ok(outcome)
    }

    /// Fetch a canonical record.
    pub async fn get_memory(&self, id: i64) -> Result<Option<MemoryRecord>, MnemonError> {
        self.records.get(id).await
    }

    /// Delete the canonical record and, best-effort, its graph node.
    ///
    /// Concept entries are left behind and reclaimed by explicit index
    /// maintenance, not by deletion.
    pub async fn delete_memory(&self, id: i64) -> Result<bool, MnemonError> {
        let deleted = self.records.delete(id).await?;
        if deleted {
            if let Err(e) = self.relationships.delete_node(id).await {
                warn!(memory_id = id, error = %e, "graph node cleanup failed");
            }
        }
        Ok(deleted)
    }

    /// Move a record to another allow-listed category. An unknown target
    /// category reports not-moved rather than an error.
    pub async fn move_memory(&self, id: i64, new_category: &str) -> Result<bool, MnemonError> {
        if !self.gate.is_allowed(new_category) {
            return Ok(false);
        }
        self.records.move_category(id, new_category).await
    }

    /// Substring search over canonical records.
    pub async fn search_memories(
        &self,
        query: &str,
        categories: Option<&[String]>,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        self.records.search_basic(query, categories).await
    }

    /// Newest-first listing of one category.
    pub async fn list_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        self.records.search_by_category(category, limit).await
    }

    /// Traversal and statistics access for callers inspecting the graph.
    pub fn graph(&self) -> &RelationshipBuilder {
        &self.relationships
    }
}
