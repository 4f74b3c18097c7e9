// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemon memory pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Every policy knob the pipeline consumes lives
//! here; nothing is baked into stage code as a constant.

use serde::{Deserialize, Serialize};

/// Top-level Mnemon configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemonConfig {
    /// Pipeline policy settings (allow-list, routing, fan-out).
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Significance gate settings.
    #[serde(default)]
    pub significance: SignificanceConfig,

    /// LLM analysis settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Durable record store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Recency cache settings.
    #[serde(default)]
    pub recency: RecencyConfig,
}

/// Pipeline policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Closed category allow-list. Every record's category is a member of
    /// this set post-resolution.
    #[serde(default = "default_allowed_categories")]
    pub allowed_categories: Vec<String>,

    /// Upper bound on concepts indexed per memory.
    #[serde(default = "default_max_concepts")]
    pub max_concepts_per_memory: usize,

    /// Concurrency limit for independent fan-out work (concept writes,
    /// candidate edges).
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,

    /// Minimum analysis confidence for the LLM's category suggestion to
    /// override the caller-supplied category.
    #[serde(default = "default_category_override_confidence")]
    pub category_override_confidence: f64,

    /// Minimum number of shared concept/keyword terms for two memories to
    /// get a relationship edge.
    #[serde(default = "default_edge_overlap_threshold")]
    pub edge_overlap_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            allowed_categories: default_allowed_categories(),
            max_concepts_per_memory: default_max_concepts(),
            fanout_concurrency: default_fanout_concurrency(),
            category_override_confidence: default_category_override_confidence(),
            edge_overlap_threshold: default_edge_overlap_threshold(),
        }
    }
}

fn default_allowed_categories() -> Vec<String> {
    [
        "faktenwissen",
        "prozedurales_wissen",
        "erlebnisse",
        "bewusstsein",
        "humor",
        "zusammenarbeit",
        "codex",
        "projekte",
        "debugging",
        "philosophie",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_concepts() -> usize {
    5
}

fn default_fanout_concurrency() -> usize {
    4
}

fn default_category_override_confidence() -> f64 {
    0.8
}

fn default_edge_overlap_threshold() -> usize {
    2
}

/// Significance gate configuration.
///
/// Defaults are deliberately restrictive: only a small minority of memories
/// should clear the gate and receive enrichment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignificanceConfig {
    /// Minimum analysis confidence for a memory to be considered at all.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Minimum weighted score for significance.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Weight of the LLM's own significance signal in the score.
    #[serde(default = "default_signal_weight")]
    pub signal_weight: f64,

    /// Per-concept weight rewarding concept-rich memories.
    #[serde(default = "default_concept_weight")]
    pub concept_weight: f64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            min_score: default_min_score(),
            signal_weight: default_signal_weight(),
            concept_weight: default_concept_weight(),
        }
    }
}

fn default_min_confidence() -> f64 {
    0.75
}

fn default_min_score() -> f64 {
    0.6
}

fn default_signal_weight() -> f64 {
    0.4
}

fn default_concept_weight() -> f64 {
    0.15
}

/// LLM analysis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key. `None` requires an environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for analysis requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output tokens per analysis call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API version header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-call deadline. On expiry the call converts to an
    /// analysis-unavailable error, never an indefinite hang.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Durable record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "mnemon.db".to_string()
}

/// Recency cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecencyConfig {
    /// Fixed capacity; oldest entries are evicted first when full.
    #[serde(default = "default_recency_capacity")]
    pub capacity: usize,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            capacity: default_recency_capacity(),
        }
    }
}

fn default_recency_capacity() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_restrictive() {
        let config = MnemonConfig::default();
        assert!(config.significance.min_confidence >= 0.7);
        assert!(config.significance.min_score > 0.0);
        assert!(config.pipeline.category_override_confidence >= 0.7);
    }

    #[test]
    fn default_allow_list_contains_projekte() {
        let config = PipelineConfig::default();
        assert!(config.allowed_categories.iter().any(|c| c == "projekte"));
        assert!(config.allowed_categories.len() >= 5);
    }

    #[test]
    fn default_concept_bound_is_five() {
        assert_eq!(PipelineConfig::default().max_concepts_per_memory, 5);
    }

    #[test]
    fn recency_capacity_default() {
        assert_eq!(RecencyConfig::default().capacity, 10);
    }
}
