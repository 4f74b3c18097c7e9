// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed canonical record store.
//!
//! All database work runs on tokio-rusqlite's single background thread via
//! `conn.call`; do not create additional Connection instances for writes.

use async_trait::async_trait;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::RecordStore;
use mnemon_core::types::MemoryRecord;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

/// Helper to convert tokio_rusqlite errors into MnemonError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MnemonError {
    MnemonError::Storage {
        source: Box::new(e),
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    topic TEXT NOT NULL,
    content TEXT NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_memories_category ON memories(category);
CREATE INDEX IF NOT EXISTS idx_memories_date ON memories(date);";

/// Canonical memory persistence in SQLite.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Wraps an existing connection. The schema must already be applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a database file and applies the schema.
    pub async fn open(path: &str) -> Result<Self, MnemonError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| storage_err(e.into()))?;
        Self::with_schema(conn).await
    }

    /// Opens a fresh in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, MnemonError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| storage_err(e.into()))?;
        Self::with_schema(conn).await
    }

    async fn with_schema(conn: Connection) -> Result<Self, MnemonError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(
        &self,
        category: &str,
        topic: &str,
        content: &str,
        date: &str,
        created_at: &str,
    ) -> Result<i64, MnemonError> {
        let category = category.to_string();
        let topic = topic.to_string();
        let content = content.to_string();
        let date = date.to_string();
        let created_at = created_at.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO memories (category, topic, content, date, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![category, topic, content, date, created_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(storage_err)
    }

    async fn get(&self, id: i64) -> Result<Option<MemoryRecord>, MnemonError> {
        self.conn
            .call(move |conn| {
                let record = conn
                    .query_row(
                        "SELECT id, category, topic, content, date, created_at FROM memories WHERE id = ?1",
                        rusqlite::params![id],
                        row_to_record,
                    )
                    .optional()?;
                Ok(record)
            })
            .await
            .map_err(storage_err)
    }

    async fn delete(&self, id: i64) -> Result<bool, MnemonError> {
        self.conn
            .call(move |conn| {
                let affected = conn.execute(
                    "DELETE FROM memories WHERE id = ?1",
                    rusqlite::params![id],
                )?;
                Ok(affected > 0)
            })
            .await
            .map_err(storage_err)
    }

    async fn move_category(&self, id: i64, new_category: &str) -> Result<bool, MnemonError> {
        let new_category = new_category.to_string();
        self.conn
            .call(move |conn| {
                let affected = conn.execute(
                    "UPDATE memories SET category = ?1 WHERE id = ?2",
                    rusqlite::params![new_category, id],
                )?;
                Ok(affected > 0)
            })
            .await
            .map_err(storage_err)
    }

    async fn search_basic(
        &self,
        query: &str,
        categories: Option<&[String]>,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        let pattern = format!("%{}%", escape_like(query));
        let categories = categories.map(|c| c.to_vec());

        self.conn
            .call(move |conn| {
                let mut sql = String::from(
                    "SELECT id, category, topic, content, date, created_at FROM memories WHERE (topic LIKE ?1 ESCAPE '\\' OR content LIKE ?1 ESCAPE '\\')",
                );
                let mut params: Vec<Box<dyn rusqlite::types::ToSql>> =
                    vec![Box::new(pattern.clone())];

                if let Some(cats) = &categories {
                    let placeholders: Vec<String> = (0..cats.len())
                        .map(|i| format!("?{}", i + 2))
                        .collect();
                    sql.push_str(&format!(
                        " AND category IN ({})",
                        placeholders.join(", ")
                    ));
                    for cat in cats {
                        params.push(Box::new(cat.clone()));
                    }
                }
                sql.push_str(" ORDER BY created_at DESC, id DESC");

                let mut stmt = conn.prepare(&sql)?;
                let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                    params.iter().map(|p| p.as_ref()).collect();
                let records = stmt
                    .query_map(param_refs.as_slice(), row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

    async fn search_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        let category = category.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, category, topic, content, date, created_at FROM memories WHERE category = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
                )?;
                let records = stmt
                    .query_map(rusqlite::params![category, limit as i64], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }
}

/// Escape LIKE wildcards so user queries match as plain substrings, the
/// same semantics as the in-memory backend's `contains`.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Convert a rusqlite Row to a MemoryRecord.
fn row_to_record(row: &rusqlite::Row) -> Result<MemoryRecord, rusqlite::Error> {
    Ok(MemoryRecord {
        id: row.get(0)?,
        category: row.get(1)?,
        topic: row.get(2)?,
        content: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "2026-03-01T00:00:00.000Z";

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();
        let a = store
            .insert("projekte", "First", "Content A", "2026-03-01", STAMP)
            .await
            .unwrap();
        let b = store
            .insert("projekte", "Second", "Content B", "2026-03-01", STAMP)
            .await
            .unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn open_on_disk_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mnemon.db");
        let path_str = path.to_str().unwrap();

        let id = {
            let store = SqliteRecordStore::open(path_str).await.unwrap();
            store
                .insert("projekte", "Durable", "Survives reopen", "2026-03-01", STAMP)
                .await
                .unwrap()
        };

        let store = SqliteRecordStore::open(path_str).await.unwrap();
        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.topic, "Durable");
        assert_eq!(record.created_at, STAMP);
    }

    #[tokio::test]
    async fn search_basic_category_filter() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();
        store
            .insert("projekte", "Rust pipeline", "Working on ingestion", "2026-03-01", STAMP)
            .await
            .unwrap();
        store
            .insert("debugging", "Rust panic", "Traced a panic in ingestion", "2026-03-01", STAMP)
            .await
            .unwrap();

        let all = store.search_basic("ingestion", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = store
            .search_basic("ingestion", Some(&["projekte".to_string()]))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, "projekte");
    }

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100% done"), "100\\% done");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
