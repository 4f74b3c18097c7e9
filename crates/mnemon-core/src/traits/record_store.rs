// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable record store contract: canonical persistence for memories.

use async_trait::async_trait;

use crate::error::MnemonError;
use crate::types::MemoryRecord;

/// Uniform contract over canonical memory persistence.
///
/// Backends are structurally different (SQLite, in-memory, ...) but must
/// behave identically; the shared contract test suite in `mnemon-storage`
/// runs against every implementation.
///
/// Not-found on `delete`/`move_category` is `Ok(false)`, never an error.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Inserts a new canonical record and returns its id. The caller owns
    /// the `created_at` stamp so every enrichment artifact derived from the
    /// record carries the identical timestamp.
    async fn insert(
        &self,
        category: &str,
        topic: &str,
        content: &str,
        date: &str,
        created_at: &str,
    ) -> Result<i64, MnemonError>;

    /// Fetches a record by id.
    async fn get(&self, id: i64) -> Result<Option<MemoryRecord>, MnemonError>;

    /// Deletes a record. Returns `false` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, MnemonError>;

    /// Moves a record to a new category. Returns `false` when the id does
    /// not exist. Category policy is the caller's concern.
    async fn move_category(&self, id: i64, new_category: &str) -> Result<bool, MnemonError>;

    /// Substring search over topic and content, optionally restricted to
    /// the given categories.
    async fn search_basic(
        &self,
        query: &str,
        categories: Option<&[String]>,
    ) -> Result<Vec<MemoryRecord>, MnemonError>;

    /// Newest-first listing of one category, capped at `limit`.
    async fn search_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MnemonError>;
}
