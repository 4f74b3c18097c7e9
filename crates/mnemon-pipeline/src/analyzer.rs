// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic analysis stage: one LLM call per ingestion, parsed into a
//! `SemanticAnalysis`. All failures here are non-fatal to the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use mnemon_core::error::MnemonError;
use mnemon_core::traits::CompletionAdapter;
use mnemon_core::types::{CompletionRequest, RawMemory, SemanticAnalysis};

const ANALYSIS_PROMPT: &str = r#"Analyze the following memory and respond with a single JSON object, no prose.

Topic: {topic}
Content: {content}

Respond with exactly this shape:
{
  "memory_type": "<technical|emotional|procedural|factual|social>",
  "confidence": <0.0-1.0>,
  "mood": "<one word or null>",
  "extracted_concepts": [
    {"concept_title": "<short title>", "concept_description": "<one sentence>"}
  ],
  "keywords": ["<salient term>"],
  "category_suggestion": "<category or null>",
  "significance_signal": <true|false>
}

Extract at most 5 concepts. Set significance_signal true only for memories
worth long-term cross-referencing."#;

/// Runs the single analysis call with a hard deadline and parses the
/// model's JSON reply.
pub struct SemanticAnalyzer {
    provider: Arc<dyn CompletionAdapter>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    max_concepts: usize,
}

impl SemanticAnalyzer {
    pub fn new(
        provider: Arc<dyn CompletionAdapter>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
        max_concepts: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            timeout,
            max_concepts,
        }
    }

    /// Analyze one memory. Exactly one completion call; on deadline expiry
    /// the call is abandoned and reported as a timeout.
    pub async fn analyze(&self, raw: &RawMemory) -> Result<SemanticAnalysis, MnemonError> {
        let prompt = ANALYSIS_PROMPT
            .replace("{topic}", &raw.topic)
            .replace("{content}", &raw.content);
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt,
            max_tokens: self.max_tokens,
        };

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| MnemonError::Timeout {
                duration: self.timeout,
            })??;

        debug!(model = %response.model, "analysis response received");

        let mut analysis = parse_analysis_response(&response.content)?;
        analysis.extracted_concepts.truncate(self.max_concepts);
        analysis.keywords.truncate(self.max_concepts * 2);
        analysis.confidence = analysis.confidence.clamp(0.0, 1.0);
        Ok(analysis)
    }
}

/// Extract the JSON object from a model reply that may wrap it in prose
/// or markdown fences.
fn parse_analysis_response(content: &str) -> Result<SemanticAnalysis, MnemonError> {
    let trimmed = content.trim();
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &trimmed[s..=e],
        _ => {
            return Err(MnemonError::Analysis {
                message: "response contains no JSON object".to_string(),
                source: None,
            });
        }
    };
    serde_json::from_str(json).map_err(|e| MnemonError::Analysis {
        message: format!("malformed analysis JSON: {e}"),
        source: Some(Box::new(e)),
    })
}
