// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory canonical record store.
//!
//! Structurally nothing like the SQLite backend (an ordered map behind an
//! RwLock instead of a database) yet behaviorally identical per the
//! `RecordStore` contract tests. Used in pipeline tests and wherever a
//! throwaway store is needed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use mnemon_core::error::MnemonError;
use mnemon_core::traits::RecordStore;
use mnemon_core::types::MemoryRecord;
use tokio::sync::RwLock;

/// Process-local record store over an ordered map.
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<i64, MemoryRecord>>,
    next_id: AtomicI64,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(
        &self,
        category: &str,
        topic: &str,
        content: &str,
        date: &str,
        created_at: &str,
    ) -> Result<i64, MnemonError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = MemoryRecord {
            id,
            category: category.to_string(),
            topic: topic.to_string(),
            content: content.to_string(),
            date: date.to_string(),
            created_at: created_at.to_string(),
        };
        self.records.write().await.insert(id, record);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<MemoryRecord>, MnemonError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, MnemonError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn move_category(&self, id: i64, new_category: &str) -> Result<bool, MnemonError> {
        match self.records.write().await.get_mut(&id) {
            Some(record) => {
                record.category = new_category.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_basic(
        &self,
        query: &str,
        categories: Option<&[String]>,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        // Plain substring match, ASCII-case-insensitive like the SQLite
        // backend's LIKE (with wildcards escaped there).
        let needle = query.to_ascii_lowercase();
        let records = self.records.read().await;
        let mut hits: Vec<MemoryRecord> = records
            .values()
            .filter(|r| {
                r.topic.to_ascii_lowercase().contains(&needle)
                    || r.content.to_ascii_lowercase().contains(&needle)
            })
            .filter(|r| {
                categories
                    .map(|cats| cats.iter().any(|c| c == &r.category))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        // Newest first, matching the SQLite backend's ordering.
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(hits)
    }

    async fn search_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MnemonError> {
        let records = self.records.read().await;
        let mut hits: Vec<MemoryRecord> = records
            .values()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "2026-03-01T00:00:00.000Z";

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = InMemoryRecordStore::new();
        let a = store
            .insert("projekte", "A", "content", "2026-03-01", STAMP)
            .await
            .unwrap();
        let b = store
            .insert("projekte", "B", "content", "2026-03-01", STAMP)
            .await
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn len_tracks_inserts_and_deletes() {
        let store = InMemoryRecordStore::new();
        assert!(store.is_empty().await);
        let id = store
            .insert("projekte", "A", "content", "2026-03-01", STAMP)
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.delete(id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn insert_keeps_caller_timestamp() {
        let store = InMemoryRecordStore::new();
        let id = store
            .insert("projekte", "A", "content", "2026-03-01", STAMP)
            .await
            .unwrap();
        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.created_at, STAMP);
    }
}
