// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category routing: reconciles the caller's category with the analyzer's
//! suggestion. Resolution never fails; the fallback is always the caller's
//! already-validated category.

use tracing::debug;

use mnemon_core::types::SemanticAnalysis;

use crate::types::RoutedCategory;

pub struct CategoryRouter {
    allowed_categories: Vec<String>,
    override_confidence: f64,
}

impl CategoryRouter {
    pub fn new(allowed_categories: Vec<String>, override_confidence: f64) -> Self {
        Self {
            allowed_categories,
            override_confidence,
        }
    }

    /// Adopt the analyzer's suggestion only when all of these hold: a
    /// suggestion exists, it differs from the caller's category, analysis
    /// confidence clears the override threshold, and the suggestion is in
    /// the allow-list. Anything else falls back silently.
    pub fn resolve(
        &self,
        caller_category: &str,
        analysis: Option<&SemanticAnalysis>,
    ) -> RoutedCategory {
        if let Some(analysis) = analysis {
            if let Some(suggestion) = analysis.category_suggestion.as_deref() {
                if suggestion != caller_category
                    && analysis.confidence > self.override_confidence
                    && self.allowed_categories.iter().any(|c| c == suggestion)
                {
                    debug!(
                        from = caller_category,
                        to = suggestion,
                        confidence = analysis.confidence,
                        "category corrected by analysis"
                    );
                    return RoutedCategory {
                        category: suggestion.to_string(),
                        corrected: true,
                    };
                }
            }
        }
        RoutedCategory {
            category: caller_category.to_string(),
            corrected: false,
        }
    }
}
