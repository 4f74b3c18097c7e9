// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Mnemon memory pipeline.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides. All pipeline policy parameters — category
//! allow-list, significance thresholds, override confidence, fan-out
//! limits, recency capacity — are configuration, not constants.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    LlmConfig, MnemonConfig, PipelineConfig, RecencyConfig, SignificanceConfig, StorageConfig,
};

use mnemon_core::MnemonError;

/// Post-deserialization sanity checks on policy parameters.
///
/// Figment/serde guarantee shape; this guards ranges that serde cannot.
pub fn validate_config(config: &MnemonConfig) -> Result<(), MnemonError> {
    if config.pipeline.allowed_categories.is_empty() {
        return Err(MnemonError::Config(
            "pipeline.allowed_categories must not be empty".into(),
        ));
    }
    for (name, value) in [
        (
            "significance.min_confidence",
            config.significance.min_confidence,
        ),
        ("significance.min_score", config.significance.min_score),
        (
            "pipeline.category_override_confidence",
            config.pipeline.category_override_confidence,
        ),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(MnemonError::Config(format!(
                "{name} must be within [0.0, 1.0], got {value}"
            )));
        }
    }
    if config.pipeline.fanout_concurrency == 0 {
        return Err(MnemonError::Config(
            "pipeline.fanout_concurrency must be at least 1".into(),
        ));
    }
    if config.recency.capacity == 0 {
        return Err(MnemonError::Config(
            "recency.capacity must be at least 1".into(),
        ));
    }
    Ok(())
}
