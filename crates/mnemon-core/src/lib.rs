// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemon memory pipeline.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Mnemon workspace. Concrete store
//! backends and the pipeline orchestrator are built against the traits
//! defined here and injected at construction time.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemonError;
pub use traits::{CompletionAdapter, ConceptIndex, GraphStore, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_variants() {
        let _config = MnemonError::Config("test".into());
        let _validation = MnemonError::Validation("bad category".into());
        let _analysis = MnemonError::Analysis {
            message: "timeout".into(),
            source: None,
        };
        let _storage = MnemonError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _index = MnemonError::Index {
            message: "duplicate id".into(),
            source: None,
        };
        let _graph = MnemonError::Graph {
            message: "node exists".into(),
            source: None,
        };
        let _timeout = MnemonError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = MnemonError::Internal("test".into());
    }

    #[test]
    fn error_display_messages() {
        let err = MnemonError::Validation("category 'x' is not allowed".into());
        assert_eq!(
            err.to_string(),
            "validation error: category 'x' is not allowed"
        );

        let err = MnemonError::Analysis {
            message: "rate limited".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "analysis unavailable: rate limited");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that every collaborator trait is reachable
        // through the public API.
        fn _assert_record_store<T: RecordStore>() {}
        fn _assert_concept_index<T: ConceptIndex>() {}
        fn _assert_graph_store<T: GraphStore>() {}
        fn _assert_completion<T: CompletionAdapter>() {}
    }
}
