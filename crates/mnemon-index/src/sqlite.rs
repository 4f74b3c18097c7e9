// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed concept index with an FTS5 shadow table for BM25 ranking.

use async_trait::async_trait;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::ConceptIndex;
use mnemon_core::types::{ConceptEntry, ConceptMetadata, ScoredConcept};
use tokio_rusqlite::Connection;
use tracing::debug;

/// Helper to convert tokio_rusqlite errors into MnemonError::Index.
fn index_err(e: tokio_rusqlite::Error) -> MnemonError {
    MnemonError::Index {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS concept_entries (
    id TEXT PRIMARY KEY NOT NULL,
    document TEXT NOT NULL,
    metadata TEXT NOT NULL,
    source_memory_id INTEGER NOT NULL,
    source_category TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE VIRTUAL TABLE IF NOT EXISTS concept_fts USING fts5(
    document,
    content='concept_entries',
    content_rowid='rowid'
);

CREATE TRIGGER IF NOT EXISTS concept_ai AFTER INSERT ON concept_entries BEGIN
    INSERT INTO concept_fts(rowid, document) VALUES (new.rowid, new.document);
END;

CREATE TRIGGER IF NOT EXISTS concept_ad AFTER DELETE ON concept_entries BEGIN
    INSERT INTO concept_fts(concept_fts, rowid, document)
        VALUES('delete', old.rowid, old.document);
END;

CREATE INDEX IF NOT EXISTS idx_concept_source ON concept_entries(source_memory_id);
CREATE INDEX IF NOT EXISTS idx_concept_category ON concept_entries(source_category);";

/// Append-only concept store with BM25 retrieval.
pub struct SqliteConceptIndex {
    conn: Connection,
}

impl SqliteConceptIndex {
    /// Wraps an existing connection. The schema must already be applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a database file and applies the schema.
    pub async fn open(path: &str) -> Result<Self, MnemonError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| index_err(e.into()))?;
        Self::with_schema(conn).await
    }

    /// Opens a fresh in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, MnemonError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| index_err(e.into()))?;
        Self::with_schema(conn).await
    }

    async fn with_schema(conn: Connection) -> Result<Self, MnemonError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(index_err)?;
        Ok(Self { conn })
    }

    /// Maintenance operation: delete entries whose source memory is no
    /// longer among `live_ids`. Never called by the pipeline; canonical
    /// deletes intentionally leave concept entries behind for a separate
    /// maintenance pass.
    pub async fn purge_orphans(&self, live_ids: &[i64]) -> Result<u64, MnemonError> {
        let live_ids = live_ids.to_vec();
        let purged = self
            .conn
            .call(move |conn| {
                let placeholders: Vec<String> =
                    (1..=live_ids.len()).map(|i| format!("?{i}")).collect();
                let sql = if placeholders.is_empty() {
                    "DELETE FROM concept_entries".to_string()
                } else {
                    format!(
                        "DELETE FROM concept_entries WHERE source_memory_id NOT IN ({})",
                        placeholders.join(", ")
                    )
                };
                let params: Vec<&dyn rusqlite::types::ToSql> = live_ids
                    .iter()
                    .map(|id| id as &dyn rusqlite::types::ToSql)
                    .collect();
                let affected = conn.execute(&sql, params.as_slice())?;
                Ok(affected as u64)
            })
            .await
            .map_err(index_err)?;
        debug!(purged, "purged orphaned concept entries");
        Ok(purged)
    }
}

#[async_trait]
impl ConceptIndex for SqliteConceptIndex {
    async fn add(&self, entries: &[ConceptEntry]) -> Result<(), MnemonError> {
        if entries.is_empty() {
            return Ok(());
        }
        let entries = entries.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for entry in &entries {
                    let metadata_json = serde_json::to_string(&entry.metadata)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                    tx.execute(
                        "INSERT INTO concept_entries (id, document, metadata, source_memory_id, source_category, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        rusqlite::params![
                            entry.id,
                            entry.document,
                            metadata_json,
                            entry.metadata.source_memory_id,
                            entry.metadata.source_category,
                            entry.metadata.created_at,
                        ],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(index_err)
    }

    async fn query(
        &self,
        text: &str,
        k: usize,
        category: Option<&str>,
    ) -> Result<Vec<ScoredConcept>, MnemonError> {
        let match_expr = fts_match_expr(text);
        if match_expr.is_empty() {
            return Ok(vec![]);
        }
        let category = category.map(|c| c.to_string());

        self.conn
            .call(move |conn| {
                let k = k as i64;
                let mut sql = String::from(
                    "SELECT e.id, e.document, e.metadata, bm25(concept_fts) AS score \
                     FROM concept_fts \
                     JOIN concept_entries e ON e.rowid = concept_fts.rowid \
                     WHERE concept_fts MATCH ?1",
                );
                let mut params: Vec<Box<dyn rusqlite::types::ToSql>> =
                    vec![Box::new(match_expr.clone())];
                if let Some(cat) = &category {
                    sql.push_str(&format!(" AND e.source_category = ?{}", params.len() + 1));
                    params.push(Box::new(cat.clone()));
                }
                sql.push_str(&format!(
                    " ORDER BY bm25(concept_fts) LIMIT ?{}",
                    params.len() + 1
                ));
                params.push(Box::new(k));

                let mut stmt = conn.prepare(&sql)?;
                let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                    params.iter().map(|p| p.as_ref()).collect();
                let rows = stmt
                    .query_map(param_refs.as_slice(), row_to_scored)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(index_err)
    }

    async fn count(&self) -> Result<u64, MnemonError> {
        self.conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM concept_entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(index_err)
    }
}

/// Convert a result row to a ScoredConcept.
///
/// BM25 scores are negative with more negative meaning more relevant, so
/// the raw score already behaves as a distance (lower is closer).
fn row_to_scored(row: &rusqlite::Row) -> Result<ScoredConcept, rusqlite::Error> {
    let metadata_json: String = row.get(2)?;
    let metadata: ConceptMetadata = serde_json::from_str(&metadata_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?;
    Ok(ScoredConcept {
        entry: ConceptEntry {
            id: row.get(0)?,
            document: row.get(1)?,
            metadata,
        },
        distance: row.get::<_, f64>(3)?,
    })
}

/// Build a safe FTS5 MATCH expression: each whitespace token becomes a
/// quoted term, joined with OR. Avoids FTS syntax errors on raw user text.
fn fts_match_expr(text: &str) -> String {
    text.split_whitespace()
        .map(|token| format!("\"{}\"", token.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" OR ")
}
