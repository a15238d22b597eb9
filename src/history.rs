//! History: bounded, most-recent-first record of successful analyses
//!
//! Lives for the duration of the hosting session. No persistence, no
//! eviction callback: entries past the capacity are silently dropped.

use crate::analysis::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

/// Number of entries kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Label recorded for analyses of pasted text.
pub const PASTED_TEXT_LABEL: &str = "Pasted Text";

/// Unique identifier for a history entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(String);

impl HistoryId {
    /// Create a new random HistoryId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HistoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HistoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One past analysis. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    /// Source URL, or "Pasted Text"
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// Shared with whatever view is displaying it
    pub result: Arc<AnalysisResult>,
}

impl HistoryEntry {
    /// Create an entry stamped with a fresh id and the current time.
    pub fn new(label: impl Into<String>, result: Arc<AnalysisResult>) -> Self {
        Self {
            id: HistoryId::new(),
            label: label.into(),
            created_at: Utc::now(),
            result,
        }
    }
}

/// In-memory, capacity-bounded history.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a cache keeping at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend an entry, dropping the oldest beyond capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Snapshot of all entries, most recent first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &HistoryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Entry at `index` (0 = most recent).
    pub fn nth(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
