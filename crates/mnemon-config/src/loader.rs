// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mnemon.toml` > `~/.config/mnemon/mnemon.toml`
//! > `/etc/mnemon/mnemon.toml` with environment variable overrides via the
//! `MNEMON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MnemonConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mnemon/mnemon.toml` (system-wide)
/// 3. `~/.config/mnemon/mnemon.toml` (user XDG config)
/// 4. `./mnemon.toml` (local directory)
/// 5. `MNEMON_*` environment variables
pub fn load_config() -> Result<MnemonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MnemonConfig::default()))
        .merge(Toml::file("/etc/mnemon/mnemon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mnemon/mnemon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mnemon.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MnemonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MnemonConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MnemonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MnemonConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MNEMON_LLM_TIMEOUT_SECS` must map to
/// `llm.timeout_secs`, not `llm.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("MNEMON_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("pipeline_", "pipeline.", 1)
            .replacen("significance_", "significance.", 1)
            .replacen("llm_", "llm.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("recency_", "recency.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.pipeline.max_concepts_per_memory, 5);
        assert_eq!(config.recency.capacity, 10);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [significance]
            min_confidence = 0.9

            [recency]
            capacity = 3
            "#,
        )
        .unwrap();
        assert!((config.significance.min_confidence - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.recency.capacity, 3);
        // Untouched sections keep defaults
        assert_eq!(config.pipeline.fanout_concurrency, 4);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [pipeline]
            max_conceps_per_memory = 7
            "#,
        );
        assert!(result.is_err(), "typo'd key should be rejected");
    }

    #[test]
    fn allow_list_replaceable_from_toml() {
        let config = load_config_from_str(
            r#"
            [pipeline]
            allowed_categories = ["notes", "tasks"]
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.allowed_categories, vec!["notes", "tasks"]);
    }
}
