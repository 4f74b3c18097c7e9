// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Significance gate: decides whether a memory earns enrichment.
//!
//! The default policy is restrictive on purpose. Enrichment fan-out is the
//! expensive path; most memories should stay canonical-only.

use mnemon_config::SignificanceConfig;
use mnemon_core::types::SemanticAnalysis;

use crate::types::SignificanceDecision;

/// Pluggable significance judgement, evaluated exactly once per ingestion.
pub trait SignificancePolicy: Send + Sync + 'static {
    fn evaluate(&self, analysis: &SemanticAnalysis) -> SignificanceDecision;
}

/// Weighted-score policy over confidence, the model's own significance
/// signal, and concept richness.
pub struct ThresholdPolicy {
    config: SignificanceConfig,
}

impl ThresholdPolicy {
    pub fn new(config: SignificanceConfig) -> Self {
        Self { config }
    }

    fn score(&self, analysis: &SemanticAnalysis) -> f64 {
        let c = &self.config;
        let confidence_weight = (1.0 - c.signal_weight - c.concept_weight).max(0.0);
        let signal = if analysis.significance_signal { 1.0 } else { 0.0 };
        let concept_richness = analysis.extracted_concepts.len().min(5) as f64 / 5.0;
        confidence_weight * analysis.confidence
            + c.signal_weight * signal
            + c.concept_weight * concept_richness
    }
}

impl SignificancePolicy for ThresholdPolicy {
    fn evaluate(&self, analysis: &SemanticAnalysis) -> SignificanceDecision {
        if analysis.confidence < self.config.min_confidence {
            return SignificanceDecision {
                significant: false,
                reason: "low_confidence".to_string(),
            };
        }
        if self.score(analysis) < self.config.min_score {
            return SignificanceDecision {
                significant: false,
                reason: "low_score".to_string(),
            };
        }
        SignificanceDecision {
            significant: true,
            reason: "meets_significance_policy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemon_core::types::ExtractedConcept;

    fn analysis(confidence: f64, signal: bool, concepts: usize) -> SemanticAnalysis {
        SemanticAnalysis {
            memory_type: "technical".into(),
            confidence,
            mood: None,
            extracted_concepts: (0..concepts)
                .map(|i| ExtractedConcept {
                    title: format!("C{i}"),
                    description: String::new(),
                })
                .collect(),
            keywords: vec![],
            category_suggestion: None,
            significance_signal: signal,
        }
    }

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(SignificanceConfig::default())
    }

    #[test]
    fn low_confidence_rejected_regardless_of_signal() {
        let decision = policy().evaluate(&analysis(0.5, true, 5));
        assert!(!decision.significant);
        assert_eq!(decision.reason, "low_confidence");
    }

    #[test]
    fn high_confidence_without_signal_rejected() {
        // 0.45 * 0.95 + 0 + 0.15 * 0.4 = 0.4875 < 0.6
        let decision = policy().evaluate(&analysis(0.95, false, 2));
        assert!(!decision.significant);
        assert_eq!(decision.reason, "low_score");
    }

    #[test]
    fn confident_signalled_concept_rich_memory_passes() {
        // 0.45 * 0.9 + 0.4 + 0.15 * 0.6 = 0.895
        let decision = policy().evaluate(&analysis(0.9, true, 3));
        assert!(decision.significant);
        assert_eq!(decision.reason, "meets_significance_policy");
    }

    #[test]
    fn signal_alone_at_threshold_confidence_passes() {
        // 0.45 * 0.75 + 0.4 = 0.7375
        let decision = policy().evaluate(&analysis(0.75, true, 0));
        assert!(decision.significant);
    }
}
