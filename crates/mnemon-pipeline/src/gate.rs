// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion gate: category allow-list check and input normalization.

use mnemon_core::error::MnemonError;
use mnemon_core::types::{RawMemory, iso_date_now, iso_timestamp_now};

/// Validates and normalizes incoming memories before any storage happens.
///
/// No side effects: a rejection here leaves every store untouched.
pub struct IngestionGate {
    allowed_categories: Vec<String>,
}

impl IngestionGate {
    pub fn new(allowed_categories: Vec<String>) -> Self {
        Self { allowed_categories }
    }

    /// The configured allow-list.
    pub fn allowed_categories(&self) -> &[String] {
        &self.allowed_categories
    }

    /// True when `category` is a member of the allow-list.
    pub fn is_allowed(&self, category: &str) -> bool {
        self.allowed_categories.iter().any(|c| c == category)
    }

    /// Validate inputs and produce a normalized `RawMemory` stamped with
    /// the current ISO date and timestamp.
    pub fn validate(
        &self,
        category: &str,
        topic: &str,
        content: &str,
    ) -> Result<RawMemory, MnemonError> {
        let category = category.trim();
        let topic = topic.trim();
        let content = content.trim();

        if !self.is_allowed(category) {
            return Err(MnemonError::Validation(format!(
                "category '{category}' is not in the allow-list ({})",
                self.allowed_categories.join(", ")
            )));
        }
        if topic.is_empty() {
            return Err(MnemonError::Validation("topic must not be empty".into()));
        }
        if content.is_empty() {
            return Err(MnemonError::Validation("content must not be empty".into()));
        }

        Ok(RawMemory {
            category: category.to_string(),
            topic: topic.to_string(),
            content: content.to_string(),
            date: iso_date_now(),
            created_at: iso_timestamp_now(),
        })
    }
}
