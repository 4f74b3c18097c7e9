// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concept index backend for the Mnemon memory pipeline.
//!
//! Each extracted concept is one independent, append-only entry:
//! a synthetic id, the concept description as the indexed document, and a
//! JSON metadata bag tying it back to its source memory. Retrieval ranks
//! with BM25 over an FTS5 shadow table kept in sync by triggers.
//!
//! Entries orphaned by a canonical delete are deliberately NOT removed on
//! the pipeline path; [`SqliteConceptIndex::purge_orphans`] exists for a
//! separate maintenance pass.

pub mod sqlite;

pub use sqlite::SqliteConceptIndex;
