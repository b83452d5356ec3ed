//! Search-condition history.
//!
//! The popup keeps the last few query/flags pairs so a search can be
//! re-run from a dropdown. Persistence goes through a minimal
//! key-value boundary: extension storage in the real host, an
//! in-memory map in tests.

use serde::{Deserialize, Serialize};

/// A query/flags pair as entered in the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCondition {
    pub query: String,
    pub flags: String,
}

/// Key-value persistence collaborator.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

impl KeyValueStore for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

const STORAGE_KEY: &str = "query_history";
const MAX_COUNT: usize = 10;

/// Most-recent-first, deduplicated history of search conditions,
/// persisted as JSON under a single key.
pub struct SearchConditionHistory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SearchConditionHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a condition as most recent, dropping any older duplicate
    /// and anything beyond the cap.
    pub fn push(&mut self, condition: SearchCondition) {
        let mut entries = self.entries();
        entries.retain(|existing| existing != &condition);
        entries.insert(0, condition);
        entries.truncate(MAX_COUNT);
        match serde_json::to_string(&entries) {
            Ok(json) => self.store.set(STORAGE_KEY, json),
            Err(err) => log::warn!("could not persist search history: {}", err),
        }
    }

    /// All stored conditions, most recent first. Unreadable or missing
    /// history is an empty list.
    pub fn entries(&self) -> Vec<SearchCondition> {
        self.store
            .get(STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}
