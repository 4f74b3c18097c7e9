// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph store backend for the Mnemon memory pipeline.
//!
//! Memories become nodes mirroring their canonical record (id equality is
//! the 1:1 invariant), relationships become typed edges with a JSON
//! property bag. Traversal is breadth-first with a bounded depth; deletes
//! detach incident edges before removing the node.

pub mod sqlite;

pub use sqlite::SqliteGraphStore;
