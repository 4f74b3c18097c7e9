// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Mnemon pipeline.
//!
//! The pipeline is written once against these contracts; concrete backends
//! are swappable implementations injected at construction and never
//! referenced by concrete type inside pipeline logic. All traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod completion;
pub mod concept_index;
pub mod graph_store;
pub mod record_store;

// Re-export all traits at the traits module level for convenience.
pub use completion::CompletionAdapter;
pub use concept_index::ConceptIndex;
pub use graph_store::GraphStore;
pub use record_store::RecordStore;
