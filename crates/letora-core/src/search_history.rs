// ── Search history ──
//
// Recent apartment searches, persisted per user in on-device
// key-value storage (logged-out searches share an anonymous bucket).
// Entries are deduplicated by term and capped, newest first. Only
// apartment ids are stored; entities resolve through the data store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::draft::KeyValueStorage;

/// Most recent searches kept per user.
pub const SEARCH_HISTORY_LIMIT: usize = 5;

const KEY_PREFIX: &str = "apartmentSearchHistory_";
const ANONYMOUS_USER: &str = "anonymous";

/// One recorded search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHistoryEntry {
    pub id: String,
    pub search_term: String,
    pub apartment_ids: Vec<String>,
    pub result_count: usize,
    pub searched_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct SearchHistory {
    storage: Arc<dyn KeyValueStorage>,
}

impl SearchHistory {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    fn key_for(user_id: Option<&str>) -> String {
        format!("{KEY_PREFIX}{}", user_id.unwrap_or(ANONYMOUS_USER))
    }

    /// Load a user's history, newest first. Never errors: absent or
    /// corrupt entries yield an empty list.
    pub fn load(&self, user_id: Option<&str>) -> Vec<SearchHistoryEntry> {
        let key = Self::key_for(user_id);
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "search history read failed");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(key, error = %err, "stored search history unparseable, discarding");
                Vec::new()
            }
        }
    }

    /// Record one search and return the updated history.
    ///
    /// Blank terms and empty result sets are ignored. An earlier entry
    /// with the same term (case-insensitive) is replaced, and the list
    /// is capped at [`SEARCH_HISTORY_LIMIT`].
    pub fn record(
        &self,
        user_id: Option<&str>,
        term: &str,
        apartment_ids: Vec<String>,
    ) -> Vec<SearchHistoryEntry> {
        let term = term.trim();
        if term.is_empty() || apartment_ids.is_empty() {
            return self.load(user_id);
        }

        let mut entries = self.load(user_id);
        entries.retain(|e| !e.search_term.eq_ignore_ascii_case(term));
        entries.insert(
            0,
            SearchHistoryEntry {
                id: uuid::Uuid::new_v4().to_string(),
                search_term: term.to_owned(),
                result_count: apartment_ids.len(),
                apartment_ids,
                searched_at: Some(Utc::now()),
            },
        );
        entries.truncate(SEARCH_HISTORY_LIMIT);
        self.save(user_id, &entries);
        entries
    }

    /// Drop one entry by id. No-op when absent.
    pub fn remove(&self, user_id: Option<&str>, entry_id: &str) -> Vec<SearchHistoryEntry> {
        let mut entries = self.load(user_id);
        entries.retain(|e| e.id != entry_id);
        self.save(user_id, &entries);
        entries
    }

    /// Forget a user's entire history.
    pub fn clear(&self, user_id: Option<&str>) {
        let key = Self::key_for(user_id);
        if let Err(err) = self.storage.remove(&key) {
            warn!(key, error = %err, "failed to clear search history");
        }
    }

    fn save(&self, user_id: Option<&str>, entries: &[SearchHistoryEntry]) {
        let key = Self::key_for(user_id);
        match serde_json::to_string(entries) {
            Ok(json) => {
                if let Err(err) = self.storage.put(&key, &json) {
                    warn!(key, error = %err, "search history save failed");
                }
            }
            Err(err) => warn!(key, error = %err, "search history serialization failed"),
        }
    }
}
