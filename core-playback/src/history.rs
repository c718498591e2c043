//! Play history
//!
//! A most-recent-first list of played tracks with no repeated ids and at
//! most `capacity` entries. The list is mirrored as a JSON array into one
//! [`SettingsStore`] slot and reloaded on startup.
//!
//! Storage problems never reach callers. A failed write keeps the in-memory
//! list, and a missing or corrupt slot loads as an empty history.

use bridge_traits::storage::SettingsStore;
use core_library::Track;
use core_runtime::config::HistoryConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;

/// Move `track` to the front of `entries`, dropping any older entry with the
/// same id and truncating to `capacity`.
pub fn push_recent(entries: &mut Vec<Track>, track: Track, capacity: usize) {
    entries.retain(|entry| entry.id != track.id);
    entries.insert(0, track);
    entries.truncate(capacity);
}

/// Drop repeated ids (keeping the first, most recent one) and truncate.
pub fn normalise(entries: Vec<Track>, capacity: usize) -> Vec<Track> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .take(capacity)
        .collect()
}

pub struct HistoryLedger {
    store: Arc<dyn SettingsStore>,
    config: HistoryConfig,
    entries: Vec<Track>,
}

impl HistoryLedger {
    /// Create an empty ledger. Call [`load`](Self::load) to pick up the
    /// persisted list.
    pub fn new(store: Arc<dyn SettingsStore>, config: HistoryConfig) -> Self {
        Self {
            store,
            config,
            entries: Vec::new(),
        }
    }

    /// Replace the in-memory list with the persisted one.
    pub async fn load(&mut self) -> &[Track] {
        self.entries = match self.read_slot().await {
            Ok(entries) => normalise(entries, self.config.capacity),
            Err(err) => {
                warn!(slot = %self.config.slot, error = %err, "Discarding unreadable history");
                Vec::new()
            }
        };

        debug!(count = self.entries.len(), "Loaded history");
        &self.entries
    }

    /// Record a play and persist the new list.
    pub async fn record(&mut self, track: Track) -> &[Track] {
        push_recent(&mut self.entries, track, self.config.capacity);

        if let Err(err) = self.write_slot().await {
            warn!(slot = %self.config.slot, error = %err, "Failed to persist history");
        }
        &self.entries
    }

    /// Forget every entry and delete the persisted slot.
    pub async fn clear(&mut self) {
        self.entries.clear();

        if let Err(err) = self.store.delete(&self.config.slot).await {
            warn!(slot = %self.config.slot, error = %err, "Failed to delete history slot");
        }
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    async fn read_slot(&self) -> Result<Vec<Track>> {
        match self.store.get_string(&self.config.slot).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_slot(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.set_string(&self.config.slot, &json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::track;

    fn ids(entries: &[Track]) -> Vec<&str> {
        entries.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_push_recent_moves_repeat_to_front() {
        let mut entries = Vec::new();
        push_recent(&mut entries, track("a"), 20);
        push_recent(&mut entries, track("b"), 20);
        push_recent(&mut entries, track("a"), 20);

        assert_eq!(ids(&entries), vec!["a", "b"]);
    }

    #[test]
    fn test_push_recent_evicts_oldest() {
        let mut entries = Vec::new();
        for i in 0..25 {
            push_recent(&mut entries, track(&format!("t{}", i)), 20);
        }

        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].id, "t24");
        assert_eq!(entries[19].id, "t5");
    }

    #[test]
    fn test_normalise_keeps_most_recent_duplicate() {
        let entries = vec![track("a"), track("b"), track("a"), track("c")];
        assert_eq!(ids(&normalise(entries, 2)), vec!["a", "b"]);
    }
}
