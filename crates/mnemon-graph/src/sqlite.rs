// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed graph store: memory nodes, typed edges, bounded traversal.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::GraphStore;
use mnemon_core::types::{
    GraphEdge, GraphMemoryNode, GraphStatistics, RelatedNode, blob_to_vec, vec_to_blob,
};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

/// Helper to convert tokio_rusqlite errors into MnemonError::Graph.
fn graph_err(e: tokio_rusqlite::Error) -> MnemonError {
    MnemonError::Graph {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS graph_nodes (
    id INTEGER PRIMARY KEY,
    category TEXT NOT NULL,
    topic TEXT NOT NULL,
    content TEXT NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    keywords TEXT NOT NULL DEFAULT '[]',
    extracted_concepts TEXT NOT NULL DEFAULT '[]',
    embedding BLOB
);

CREATE TABLE IF NOT EXISTS graph_edges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_id INTEGER NOT NULL,
    to_id INTEGER NOT NULL,
    edge_type TEXT NOT NULL,
    properties TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_edges_from ON graph_edges(from_id);
CREATE INDEX IF NOT EXISTS idx_edges_to ON graph_edges(to_id);
CREATE INDEX IF NOT EXISTS idx_edges_type ON graph_edges(edge_type);";

const NODE_COLUMNS: &str =
    "id, category, topic, content, date, created_at, keywords, extracted_concepts, embedding";

/// Memory relationship graph in SQLite.
pub struct SqliteGraphStore {
    conn: Connection,
}

impl SqliteGraphStore {
    /// Wraps an existing connection. The schema must already be applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a database file and applies the schema.
    pub async fn open(path: &str) -> Result<Self, MnemonError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| graph_err(e.into()))?;
        Self::with_schema(conn).await
    }

    /// Opens a fresh in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, MnemonError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| graph_err(e.into()))?;
        Self::with_schema(conn).await
    }

    async fn with_schema(conn: Connection) -> Result<Self, MnemonError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(graph_err)?;
        Ok(Self { conn })
    }

    /// All edges, used by traversal. Kept internal; the public contract is
    /// `find_related`.
    async fn all_edges(&self) -> Result<Vec<(i64, i64, String)>, MnemonError> {
        self.conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT from_id, to_id, edge_type FROM graph_edges")?;
                let edges = stmt
                    .query_map([], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(edges)
            })
            .await
            .map_err(graph_err)
    }

    async fn nodes_by_ids(&self, ids: Vec<i64>) -> Result<Vec<GraphMemoryNode>, MnemonError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.conn
            .call(move |conn| {
                let placeholders: Vec<String> =
                    (1..=ids.len()).map(|i| format!("?{i}")).collect();
                let sql = format!(
                    "SELECT {NODE_COLUMNS} FROM graph_nodes WHERE id IN ({})",
                    placeholders.join(", ")
                );
                let mut stmt = conn.prepare(&sql)?;
                let params: Vec<&dyn rusqlite::types::ToSql> = ids
                    .iter()
                    .map(|id| id as &dyn rusqlite::types::ToSql)
                    .collect();
                let nodes = stmt
                    .query_map(params.as_slice(), row_to_node)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(nodes)
            })
            .await
            .map_err(graph_err)
    }
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn create_node(&self, node: &GraphMemoryNode) -> Result<(), MnemonError> {
        let node = node.clone();
        let keywords_json = serde_json::to_string(&node.keywords)
            .map_err(|e| MnemonError::Internal(e.to_string()))?;
        let concepts_json = serde_json::to_string(&node.extracted_concepts)
            .map_err(|e| MnemonError::Internal(e.to_string()))?;
        let embedding_blob = node.embedding.as_deref().map(vec_to_blob);

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO graph_nodes (id, category, topic, content, date, created_at, keywords, extracted_concepts, embedding) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    rusqlite::params![
                        node.id,
                        node.category,
                        node.topic,
                        node.content,
                        node.date,
                        node.created_at,
                        keywords_json,
                        concepts_json,
                        embedding_blob,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(graph_err)
    }

    async fn create_edge(&self, edge: &GraphEdge) -> Result<(), MnemonError> {
        let edge = edge.clone();
        let properties_json = serde_json::to_string(&edge.properties)
            .map_err(|e| MnemonError::Internal(e.to_string()))?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO graph_edges (from_id, to_id, edge_type, properties, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        edge.from_id,
                        edge.to_id,
                        edge.edge_type,
                        properties_json,
                        edge.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(graph_err)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<GraphMemoryNode>, MnemonError> {
        self.conn
            .call(move |conn| {
                let node = conn
                    .query_row(
                        &format!("SELECT {NODE_COLUMNS} FROM graph_nodes WHERE id = ?1"),
                        rusqlite::params![id],
                        row_to_node,
                    )
                    .optional()?;
                Ok(node)
            })
            .await
            .map_err(graph_err)
    }

    async fn all_nodes(&self) -> Result<Vec<GraphMemoryNode>, MnemonError> {
        self.conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {NODE_COLUMNS} FROM graph_nodes"))?;
                let nodes = stmt
                    .query_map([], row_to_node)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(nodes)
            })
            .await
            .map_err(graph_err)
    }

    async fn find_related(
        &self,
        id: i64,
        types: Option<&[String]>,
        max_depth: u32,
    ) -> Result<Vec<RelatedNode>, MnemonError> {
        if max_depth == 0 {
            return Ok(vec![]);
        }

        let edges = self.all_edges().await?;
        let type_filter: Option<HashSet<&String>> = types.map(|t| t.iter().collect());

        // Undirected adjacency view.
        let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
        for (from, to, edge_type) in &edges {
            if let Some(filter) = &type_filter {
                if !filter.contains(edge_type) {
                    continue;
                }
            }
            adjacency.entry(*from).or_default().push(*to);
            adjacency.entry(*to).or_default().push(*from);
        }

        // BFS from the origin; each node reported once at its minimum depth.
        let mut visited: HashSet<i64> = HashSet::from([id]);
        let mut depths: Vec<(i64, u32)> = Vec::new();
        let mut queue: VecDeque<(i64, u32)> = VecDeque::from([(id, 0)]);
        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            if let Some(neighbors) = adjacency.get(&current) {
                for &neighbor in neighbors {
                    if visited.insert(neighbor) {
                        depths.push((neighbor, depth + 1));
                        queue.push_back((neighbor, depth + 1));
                    }
                }
            }
        }

        let ids: Vec<i64> = depths.iter().map(|(id, _)| *id).collect();
        let depth_map: HashMap<i64, u32> = depths.into_iter().collect();
        let nodes = self.nodes_by_ids(ids).await?;

        let mut related: Vec<RelatedNode> = nodes
            .into_iter()
            .filter_map(|node| {
                depth_map
                    .get(&node.id)
                    .map(|&depth| RelatedNode { node, depth })
            })
            .collect();
        related.sort_by_key(|r| (r.depth, r.node.id));
        Ok(related)
    }

    async fn search_by_content(&self, text: &str) -> Result<Vec<GraphMemoryNode>, MnemonError> {
        let pattern = format!("%{text}%");
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {NODE_COLUMNS} FROM graph_nodes WHERE topic LIKE ?1 OR content LIKE ?1 ORDER BY id"
                ))?;
                let nodes = stmt
                    .query_map(rusqlite::params![pattern], row_to_node)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(nodes)
            })
            .await
            .map_err(graph_err)
    }

    async fn statistics(&self) -> Result<GraphStatistics, MnemonError> {
        self.conn
            .call(|conn| {
                let node_count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM graph_nodes", [], |row| row.get(0))?;
                let edge_count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM graph_edges", [], |row| row.get(0))?;

                let mut stmt = conn.prepare(
                    "SELECT edge_type, COUNT(*) FROM graph_edges GROUP BY edge_type",
                )?;
                let edges_by_type = stmt
                    .query_map([], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
                    })?
                    .collect::<Result<HashMap<_, _>, _>>()?;

                Ok(GraphStatistics {
                    node_count: node_count as u64,
                    edge_count: edge_count as u64,
                    edges_by_type,
                })
            })
            .await
            .map_err(graph_err)
    }

    async fn delete_node(&self, id: i64) -> Result<bool, MnemonError> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM graph_edges WHERE from_id = ?1 OR to_id = ?1",
                    rusqlite::params![id],
                )?;
                let affected = tx.execute(
                    "DELETE FROM graph_nodes WHERE id = ?1",
                    rusqlite::params![id],
                )?;
                tx.commit()?;
                Ok(affected > 0)
            })
            .await
            .map_err(graph_err)
    }
}

/// Convert a rusqlite Row to a GraphMemoryNode.
fn row_to_node(row: &rusqlite::Row) -> Result<GraphMemoryNode, rusqlite::Error> {
    let keywords_json: String = row.get(6)?;
    let concepts_json: String = row.get(7)?;
    let embedding_blob: Option<Vec<u8>> = row.get(8)?;
    Ok(GraphMemoryNode {
        id: row.get(0)?,
        category: row.get(1)?,
        topic: row.get(2)?,
        content: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
        extracted_concepts: serde_json::from_str(&concepts_json).unwrap_or_default(),
        embedding: embedding_blob.as_deref().map(blob_to_vec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(id: i64, topic: &str, concepts: &[&str]) -> GraphMemoryNode {
        GraphMemoryNode {
            id,
            category: "projekte".to_string(),
            topic: topic.to_string(),
            content: format!("Content of {topic}"),
            date: "2026-03-01".to_string(),
            created_at: "2026-03-01T00:00:00.000Z".to_string(),
            keywords: vec!["shared".to_string()],
            extracted_concepts: concepts.iter().map(|s| s.to_string()).collect(),
            embedding: None,
        }
    }

    fn make_edge(from: i64, to: i64, edge_type: &str) -> GraphEdge {
        GraphEdge {
            from_id: from,
            to_id: to,
            edge_type: edge_type.to_string(),
            properties: serde_json::json!({"overlap_count": 2}),
            created_at: "2026-03-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find_node() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        graph
            .create_node(&make_node(1, "Pipeline", &["orchestration"]))
            .await
            .unwrap();

        let node = graph.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(node.topic, "Pipeline");
        assert_eq!(node.extracted_concepts, vec!["orchestration"]);
        assert!(node.embedding.is_none());
    }

    #[tokio::test]
    async fn duplicate_node_id_is_an_error() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        graph
            .create_node(&make_node(1, "First", &[]))
            .await
            .unwrap();
        let result = graph.create_node(&make_node(1, "Second", &[])).await;
        assert!(matches!(result, Err(MnemonError::Graph { .. })));
    }

    #[tokio::test]
    async fn node_embedding_roundtrip() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        let mut node = make_node(1, "Embedded", &[]);
        node.embedding = Some(vec![0.25, -0.5, 1.0]);
        graph.create_node(&node).await.unwrap();

        let loaded = graph.find_by_id(1).await.unwrap().unwrap();
        let embedding = loaded.embedding.unwrap();
        assert_eq!(embedding.len(), 3);
        assert!((embedding[1] - (-0.5)).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn find_related_bounded_depth() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        // Chain: 1 - 2 - 3 - 4
        for (id, topic) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
            graph.create_node(&make_node(id, topic, &[])).await.unwrap();
        }
        graph.create_edge(&make_edge(1, 2, "related_concepts")).await.unwrap();
        graph.create_edge(&make_edge(2, 3, "related_concepts")).await.unwrap();
        graph.create_edge(&make_edge(3, 4, "related_concepts")).await.unwrap();

        let related = graph.find_related(1, None, 2).await.unwrap();
        let ids: Vec<i64> = related.iter().map(|r| r.node.id).collect();
        assert_eq!(ids, vec![2, 3], "depth 2 reaches node 3 but not node 4");
        assert_eq!(related[0].depth, 1);
        assert_eq!(related[1].depth, 2);
    }

    #[tokio::test]
    async fn find_related_is_undirected() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        graph.create_node(&make_node(1, "A", &[])).await.unwrap();
        graph.create_node(&make_node(2, "B", &[])).await.unwrap();
        // Edge points 2 -> 1; traversal from 1 must still reach 2.
        graph.create_edge(&make_edge(2, 1, "related_concepts")).await.unwrap();

        let related = graph.find_related(1, None, 2).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].node.id, 2);
    }

    #[tokio::test]
    async fn find_related_type_filter() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        for id in 1..=3 {
            graph.create_node(&make_node(id, "N", &[])).await.unwrap();
        }
        graph.create_edge(&make_edge(1, 2, "related_concepts")).await.unwrap();
        graph.create_edge(&make_edge(1, 3, "same_session")).await.unwrap();

        let related = graph
            .find_related(1, Some(&["same_session".to_string()]), 2)
            .await
            .unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].node.id, 3);
    }

    #[tokio::test]
    async fn statistics_histogram() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        for id in 1..=3 {
            graph.create_node(&make_node(id, "N", &[])).await.unwrap();
        }
        graph.create_edge(&make_edge(1, 2, "related_concepts")).await.unwrap();
        graph.create_edge(&make_edge(2, 3, "related_concepts")).await.unwrap();
        graph.create_edge(&make_edge(1, 3, "same_session")).await.unwrap();

        let stats = graph.statistics().await.unwrap();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.edges_by_type.get("related_concepts"), Some(&2));
        assert_eq!(stats.edges_by_type.get("same_session"), Some(&1));
    }

    #[tokio::test]
    async fn delete_node_detaches_edges() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        graph.create_node(&make_node(1, "A", &[])).await.unwrap();
        graph.create_node(&make_node(2, "B", &[])).await.unwrap();
        graph.create_edge(&make_edge(1, 2, "related_concepts")).await.unwrap();

        assert!(graph.delete_node(1).await.unwrap());
        assert!(!graph.delete_node(1).await.unwrap());

        let stats = graph.statistics().await.unwrap();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.edge_count, 0, "incident edges must be detached");
    }

    #[tokio::test]
    async fn search_by_content_matches_topic() {
        let graph = SqliteGraphStore::open_in_memory().await.unwrap();
        graph
            .create_node(&make_node(1, "Deployment checklist", &[]))
            .await
            .unwrap();
        graph.create_node(&make_node(2, "Other", &[])).await.unwrap();

        let hits = graph.search_by_content("Deployment").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }
}
