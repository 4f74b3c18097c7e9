// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators and helpers for Mnemon tests.
//!
//! Everything here is deterministic and CI-runnable: no network, no clock
//! dependence, no external processes.

pub mod failing_index;
pub mod mock_completion;

pub use failing_index::FailingConceptIndex;
pub use mock_completion::MockCompletion;

/// Build a well-formed analyzer JSON response.
///
/// `concepts` is a list of (title, description) pairs.
pub fn analysis_json(
    memory_type: &str,
    confidence: f64,
    concepts: &[(&str, &str)],
    keywords: &[&str],
    category_suggestion: Option<&str>,
    significance_signal: bool,
) -> String {
    let concepts_json: Vec<serde_json::Value> = concepts
        .iter()
        .map(|(title, description)| {
            serde_json::json!({
                "concept_title": title,
                "concept_description": description,
            })
        })
        .collect();
    serde_json::json!({
        "memory_type": memory_type,
        "confidence": confidence,
        "mood": "neutral",
        "extracted_concepts": concepts_json,
        "keywords": keywords,
        "category_suggestion": category_suggestion,
        "significance_signal": significance_signal,
    })
    .to_string()
}
