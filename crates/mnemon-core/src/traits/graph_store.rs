// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph store contract: memory nodes, typed edges, bounded traversal.

use async_trait::async_trait;

use crate::error::MnemonError;
use crate::types::{GraphEdge, GraphMemoryNode, GraphStatistics, RelatedNode};

/// Store of memory nodes and their derived relationships.
///
/// A node's id equals exactly one canonical record id; creating a second
/// node with the same id is an error.
#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// Creates a node mirroring a canonical record.
    async fn create_node(&self, node: &GraphMemoryNode) -> Result<(), MnemonError>;

    /// Creates a typed edge between two existing nodes.
    async fn create_edge(&self, edge: &GraphEdge) -> Result<(), MnemonError>;

    /// Fetches a node by canonical id.
    async fn find_by_id(&self, id: i64) -> Result<Option<GraphMemoryNode>, MnemonError>;

    /// All nodes currently in the graph. Candidate scan for edge derivation.
    async fn all_nodes(&self) -> Result<Vec<GraphMemoryNode>, MnemonError>;

    /// Bounded-depth breadth-first traversal from `id` over an undirected
    /// edge view, optionally restricted to the given edge types. The origin
    /// is excluded; each node appears once at its minimum depth.
    async fn find_related(
        &self,
        id: i64,
        types: Option<&[String]>,
        max_depth: u32,
    ) -> Result<Vec<RelatedNode>, MnemonError>;

    /// Substring search over node topic and content.
    async fn search_by_content(&self, text: &str) -> Result<Vec<GraphMemoryNode>, MnemonError>;

    /// Node count, edge count, and edge-type histogram.
    async fn statistics(&self) -> Result<GraphStatistics, MnemonError>;

    /// Detaches (removes incident edges) and deletes a node. Returns
    /// `false` when the id does not exist.
    async fn delete_node(&self, id: i64) -> Result<bool, MnemonError>;
}
