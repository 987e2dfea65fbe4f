//! In-memory translation history
//!
//! Entries are kept newest first and capped; inserting past the cap silently
//! drops the oldest entry. The store is cheap to clone and safe to share
//! between request handlers.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// How the source text was captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Text,
    Voice,
    Ocr,
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(EntryType::Text),
            "voice" => Ok(EntryType::Voice),
            "ocr" => Ok(EntryType::Ocr),
            other => Err(format!("unknown entry type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub source_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub source_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl NewHistoryEntry {
    pub fn is_valid(&self) -> bool {
        !self.source_text.trim().is_empty()
            && !self.source_language.trim().is_empty()
            && !self.target_language.trim().is_empty()
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPatch {
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub favorites: usize,
    /// Distinct `source→target` pairs
    pub language_pairs: usize,
}

#[derive(Debug)]
struct Inner {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
    capacity: usize,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: VecDeque::new(),
                next_id: 1,
                capacity: capacity.max(1),
            })),
        }
    }

    // No operation leaves the deque half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert at the front, evicting the oldest entries beyond capacity
    pub fn add(&self, new: NewHistoryEntry) -> HistoryEntry {
        let mut inner = self.write();
        let entry = HistoryEntry {
            id: inner.next_id,
            source_text: new.source_text,
            translated_text: new.translated_text,
            source_language: new.source_language,
            target_language: new.target_language,
            entry_type: new.entry_type,
            is_favorite: new.is_favorite,
            metadata: new.metadata,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.entries.push_front(entry.clone());
        let capacity = inner.capacity;
        inner.entries.truncate(capacity);
        entry
    }

    /// Newest first, paginated
    pub fn list(&self, limit: Option<usize>, offset: Option<usize>) -> Vec<HistoryEntry> {
        self.read()
            .entries
            .iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<HistoryEntry> {
        self.read().entries.iter().find(|e| e.id == id).cloned()
    }

    pub fn update(&self, id: u64, patch: HistoryPatch) -> Option<HistoryEntry> {
        let mut inner = self.write();
        let entry = inner.entries.iter_mut().find(|e| e.id == id)?;
        if let Some(text) = patch.translated_text {
            entry.translated_text = text;
        }
        if let Some(favorite) = patch.is_favorite {
            entry.is_favorite = favorite;
        }
        if let Some(metadata) = patch.metadata {
            entry.metadata = Some(metadata);
        }
        Some(entry.clone())
    }

    pub fn toggle_favorite(&self, id: u64) -> Option<HistoryEntry> {
        let mut inner = self.write();
        let entry = inner.entries.iter_mut().find(|e| e.id == id)?;
        entry.is_favorite = !entry.is_favorite;
        Some(entry.clone())
    }

    /// Returns false when no entry has `id`
    pub fn delete(&self, id: u64) -> bool {
        let mut inner = self.write();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        inner.entries.len() != before
    }

    /// Remove every entry, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut inner = self.write();
        let count = inner.entries.len();
        inner.entries.clear();
        count
    }

    /// Case-insensitive substring match over source and translated text
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        let query = query.to_lowercase();
        self.filter(|e| {
            e.source_text.to_lowercase().contains(&query)
                || e.translated_text.to_lowercase().contains(&query)
        })
    }

    pub fn by_type(&self, entry_type: EntryType) -> Vec<HistoryEntry> {
        self.filter(|e| e.entry_type == entry_type)
    }

    pub fn favorites(&self) -> Vec<HistoryEntry> {
        self.filter(|e| e.is_favorite)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> HistoryStats {
        let inner = self.read();
        let pairs: HashSet<(&str, &str)> = inner
            .entries
            .iter()
            .map(|e| (e.source_language.as_str(), e.target_language.as_str()))
            .collect();
        HistoryStats {
            total: inner.entries.len(),
            favorites: inner.entries.iter().filter(|e| e.is_favorite).count(),
            language_pairs: pairs.len(),
        }
    }

    fn filter(&self, predicate: impl Fn(&HistoryEntry) -> bool) -> Vec<HistoryEntry> {
        self.read()
            .entries
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }
}
