// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded FIFO cache of the most recently ingested memories.

use std::collections::VecDeque;
use std::sync::Mutex;

use mnemon_core::types::RecencyEntry;

/// Fixed-capacity recency window. Appending to a full cache evicts the
/// oldest entry. Not durable; restarts start empty.
pub struct RecencyCache {
    capacity: usize,
    entries: Mutex<VecDeque<RecencyEntry>>,
}

impl RecencyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn append(&self, entry: RecencyEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Oldest-first snapshot of the current window.
    pub fn snapshot(&self) -> Vec<RecencyEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> RecencyEntry {
        RecencyEntry {
            topic: format!("topic {n}"),
            content: format!("content {n}"),
            date: "2026-01-01".into(),
        }
    }

    #[test]
    fn appends_in_order_below_capacity() {
        let cache = RecencyCache::new(3);
        cache.append(entry(1));
        cache.append(entry(2));
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].topic, "topic 1");
        assert_eq!(snapshot[1].topic, "topic 2");
    }

    #[test]
    fn full_cache_evicts_oldest() {
        let cache = RecencyCache::new(3);
        for n in 1..=5 {
            cache.append(entry(n));
        }
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].topic, "topic 3");
        assert_eq!(snapshot[2].topic, "topic 5");
    }

    #[test]
    fn empty_cache() {
        let cache = RecencyCache::new(10);
        assert!(cache.is_empty());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn zero_capacity_never_grows() {
        let cache = RecencyCache::new(0);
        for n in 1..=4 {
            cache.append(entry(n));
        }
        assert!(cache.is_empty());
    }
}
