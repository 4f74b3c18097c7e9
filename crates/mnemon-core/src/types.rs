// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Mnemon workspace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A validated, normalized memory as produced by the ingestion gate.
///
/// Ephemeral: exists only between validation and canonical persistence.
#[derive(Debug, Clone)]
pub struct RawMemory {
    /// Category from the closed allow-list.
    pub category: String,
    /// Trimmed topic line.
    pub topic: String,
    /// Trimmed free-text content.
    pub content: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// ISO 8601 ingestion timestamp.
    pub created_at: String,
}

/// The canonical record representing one memory in the durable store.
///
/// Immutable after insertion except `category` (via move) and existence
/// (via delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: i64,
    pub category: String,
    pub topic: String,
    pub content: String,
    pub date: String,
    pub created_at: String,
}

/// One semantically distinct idea extracted from a memory's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedConcept {
    /// Short title naming the concept.
    #[serde(alias = "concept_title")]
    pub title: String,
    /// One-sentence description; becomes the indexed document text.
    #[serde(alias = "concept_description", default)]
    pub description: String,
}

/// Transient output of the LLM semantic analysis. Produced once per
/// ingestion, never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    /// Coarse classification of the memory (e.g. "technical", "emotional").
    #[serde(default)]
    pub memory_type: String,
    /// Analysis confidence in `[0.0, 1.0]`.
    #[serde(default)]
    pub confidence: f64,
    /// Dominant mood of the content, when the model reports one.
    #[serde(default)]
    pub mood: Option<String>,
    /// Extracted concepts, bounded by policy (default at most 5).
    #[serde(default)]
    pub extracted_concepts: Vec<ExtractedConcept>,
    /// Salient keywords for relationship discovery.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Category the model believes fits better than the caller's choice.
    #[serde(default)]
    pub category_suggestion: Option<String>,
    /// Model's own judgement whether this memory is worth enriching.
    #[serde(default)]
    pub significance_signal: bool,
}

impl SemanticAnalysis {
    /// Concept titles, used as overlap terms for relationship discovery.
    pub fn concept_titles(&self) -> Vec<String> {
        self.extracted_concepts
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }
}

/// A concept enriched with its source-memory context, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub title: String,
    pub description: String,
    pub memory_type: String,
    pub confidence: f64,
    pub mood: Option<String>,
    pub keywords: Vec<String>,
    /// Titles of all sibling concepts from the same memory.
    pub extracted_concepts: Vec<String>,
}

/// Metadata bag stored alongside each concept index entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptMetadata {
    pub concept_title: String,
    pub source_memory_id: i64,
    pub source_category: String,
    pub source_topic: String,
    pub source_date: String,
    pub memory_type: String,
    pub confidence: f64,
    pub mood: Option<String>,
    pub keywords: Vec<String>,
    pub extracted_concepts: Vec<String>,
    pub created_at: String,
}

/// One independent concept index entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptEntry {
    /// Synthetic unique key: `"{memory_id}-concept-{ordinal}"`.
    pub id: String,
    /// The indexed document text (concept description).
    pub document: String,
    pub metadata: ConceptMetadata,
}

/// A concept entry with a retrieval distance (lower is closer).
#[derive(Debug, Clone)]
pub struct ScoredConcept {
    pub entry: ConceptEntry,
    pub distance: f64,
}

/// Graph mirror of a canonical memory record.
///
/// `id` equals the canonical record id (1:1 invariant). Keywords and
/// concept titles are carried for overlap-based edge derivation; the
/// embedding is optional and unused unless an embedding adapter is wired in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMemoryNode {
    pub id: i64,
    pub category: String,
    pub topic: String,
    pub content: String,
    pub date: String,
    pub created_at: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub extracted_concepts: Vec<String>,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

/// A typed relationship between two graph nodes with a property bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from_id: i64,
    pub to_id: i64,
    pub edge_type: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    pub created_at: String,
}

/// A node reached by bounded-depth traversal, with its distance from the origin.
#[derive(Debug, Clone)]
pub struct RelatedNode {
    pub node: GraphMemoryNode,
    pub depth: u32,
}

/// Aggregate graph statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStatistics {
    pub node_count: u64,
    pub edge_count: u64,
    /// Edge counts keyed by edge type.
    pub edges_by_type: HashMap<String, u64>,
}

/// An entry in the bounded recency cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyEntry {
    pub topic: String,
    pub content: String,
    pub date: String,
}

/// A single-turn request to an LLM completion adapter.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// A response from an LLM completion adapter.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
}

/// Current ISO date (`YYYY-MM-DD`), UTC.
pub fn iso_date_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Current ISO 8601 timestamp with millisecond precision, UTC.
pub fn iso_timestamp_now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_deserializes_with_missing_fields() {
        let json = r#"{"memory_type": "technical", "confidence": 0.8}"#;
        let analysis: SemanticAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.memory_type, "technical");
        assert!((analysis.confidence - 0.8).abs() < f64::EPSILON);
        assert!(analysis.extracted_concepts.is_empty());
        assert!(analysis.category_suggestion.is_none());
        assert!(!analysis.significance_signal);
    }

    #[test]
    fn extracted_concept_accepts_aliased_field_names() {
        let json = r#"{"concept_title": "Error handling", "concept_description": "How errors propagate"}"#;
        let concept: ExtractedConcept = serde_json::from_str(json).unwrap();
        assert_eq!(concept.title, "Error handling");
        assert_eq!(concept.description, "How errors propagate");
    }

    #[test]
    fn concept_titles_from_analysis() {
        let analysis = SemanticAnalysis {
            memory_type: "technical".into(),
            confidence: 0.9,
            mood: None,
            extracted_concepts: vec![
                ExtractedConcept {
                    title: "A".into(),
                    description: "a".into(),
                },
                ExtractedConcept {
                    title: "B".into(),
                    description: "b".into(),
                },
            ],
            keywords: vec![],
            category_suggestion: None,
            significance_signal: true,
        };
        assert_eq!(analysis.concept_titles(), vec!["A", "B"]);
    }

    #[test]
    fn vec_to_blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, 0.3, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        assert_eq!(blob.len(), original.len() * 4);
        let recovered = blob_to_vec(&blob);
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn iso_date_format() {
        let date = iso_date_now();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
    }

    #[test]
    fn concept_metadata_json_roundtrip() {
        let metadata = ConceptMetadata {
            concept_title: "Deployment".into(),
            source_memory_id: 42,
            source_category: "projekte".into(),
            source_topic: "Release".into(),
            source_date: "2026-03-01".into(),
            memory_type: "procedural".into(),
            confidence: 0.85,
            mood: Some("neutral".into()),
            keywords: vec!["deploy".into()],
            extracted_concepts: vec!["Deployment".into()],
            created_at: "2026-03-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&metadata).unwrap();
        let parsed: ConceptMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.concept_title, "Deployment");
        assert_eq!(parsed.source_memory_id, 42);
    }
}
