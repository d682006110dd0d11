use std::collections::VecDeque;

use tracing::{debug, error, info, warn};

use crate::{
    model::summary::MatchSummary,
    service::{
        statistics::Statistics,
        storage::{KeyValueStore, Result},
    },
};

/// Key the whole history is stored under.
pub const HISTORY_KEY: &str = "nanodock_historial_partidas";
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, ordered log of completed matches, mirrored to a key-value backend.
///
/// The in-memory copy is authoritative for the lifetime of the store: a failed
/// write to the backend is reported to the caller but never drops an entry.
pub struct HistoryStore<S: KeyValueStore> {
    entries: VecDeque<MatchSummary>,
    capacity: usize,
    backend: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load whatever the backend holds, keeping the newest `capacity` entries.
    /// An unreadable backend starts an empty history.
    pub fn open(backend: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let entries = match Self::load(&backend, capacity) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to load match history, starting empty: {}", e);
                VecDeque::new()
            }
        };
        debug!("Loaded {} match summaries", entries.len());
        HistoryStore {
            entries,
            capacity,
            backend,
        }
    }

    fn load(backend: &S, capacity: usize) -> Result<VecDeque<MatchSummary>> {
        let Some(text) = backend.get(HISTORY_KEY)? else {
            return Ok(VecDeque::new());
        };
        let mut entries: VecDeque<MatchSummary> = serde_json::from_str(&text)?;
        if entries.len() > capacity {
            warn!(
                "Stored history has {} entries, keeping the newest {}",
                entries.len(),
                capacity
            );
            entries.drain(..entries.len() - capacity);
        }
        Ok(entries)
    }

    /// Record a completed match, evicting the oldest entry past capacity, then
    /// write the history through to the backend.
    pub fn append(&mut self, summary: MatchSummary) -> Result<()> {
        info!(
            "Match registered: {} won {} with {}",
            summary.winner, summary.format, summary.final_score
        );
        self.entries.push_back(summary);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!("Evicted match {} from history", evicted.id);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let text = serde_json::to_string(&self.entries)?;
        self.backend.set(HISTORY_KEY, &text)
    }

    /// Most recent first, at most `limit` entries.
    pub fn list(&self, limit: usize) -> Vec<MatchSummary> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Oldest first.
    pub fn all(&self) -> Vec<MatchSummary> {
        self.entries.iter().cloned().collect()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_history(self.entries.iter())
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

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::storage::{tests::TempDb, MemoryStore, SqliteStore, StorageError};
    use common::model::game::MatchWinner;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(StorageError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(StorageError::Poisoned)
        }
    }

    fn summary(rounds_played: u32) -> MatchSummary {
        MatchSummary::new("Best 2 of 3", MatchWinner::Player, (2, 1), rounds_played, 10)
    }

    #[test]
    fn lists_most_recent_first() {
        let mut store = HistoryStore::open(MemoryStore::new(), DEFAULT_CAPACITY);
        for rounds in 1..=3 {
            store.append(summary(rounds)).unwrap();
        }
        let rounds: Vec<u32> = store.list(5).iter().map(|s| s.rounds_played).collect();
        assert_eq!(rounds, vec![3, 2, 1]);
        let rounds: Vec<u32> = store.list(2).iter().map(|s| s.rounds_played).collect();
        assert_eq!(rounds, vec![3, 2]);
        assert!(store.list(0).is_empty());
    }

    #[test]
    fn twenty_first_entry_evicts_the_oldest() {
        let mut store = HistoryStore::open(MemoryStore::new(), DEFAULT_CAPACITY);
        for rounds in 1..=21 {
            store.append(summary(rounds)).unwrap();
        }
        assert_eq!(store.len(), 20);
        let all: Vec<u32> = store.all().iter().map(|s| s.rounds_played).collect();
        assert_eq!(all, (2..=21).collect::<Vec<u32>>());
        assert_eq!(store.list(1)[0].rounds_played, 21);
    }

    #[test]
    fn persisted_copy_is_capped_too() {
        let mut store = HistoryStore::open(MemoryStore::new(), 3);
        for rounds in 1..=5 {
            store.append(summary(rounds)).unwrap();
        }
        let text = store.backend().get(HISTORY_KEY).unwrap().unwrap();
        let persisted: Vec<MatchSummary> = serde_json::from_str(&text).unwrap();
        assert_eq!(persisted, store.all());
        assert_eq!(persisted.len(), 3);
    }

    #[test]
    fn failed_persist_keeps_entry_in_memory() {
        let mut store = HistoryStore::open(BrokenStore, DEFAULT_CAPACITY);
        assert!(store.is_empty());
        let result = store.append(summary(4));
        assert!(matches!(result, Err(StorageError::Poisoned)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list(1)[0].rounds_played, 4);
    }

    #[test]
    fn corrupt_backend_starts_empty() {
        let backend = MemoryStore::new();
        backend.set(HISTORY_KEY, "not json").unwrap();
        let store = HistoryStore::open(backend, DEFAULT_CAPACITY);
        assert!(store.is_empty());
    }

    #[test]
    fn reloads_from_sqlite_keeping_newest() {
        let db = TempDb::new();
        {
            let mut store = HistoryStore::open(SqliteStore::open(db.url()).unwrap(), 10);
            for rounds in 1..=10 {
                store.append(summary(rounds)).unwrap();
            }
        }
        let reopened = HistoryStore::open(SqliteStore::open(db.url()).unwrap(), 4);
        let all: Vec<u32> = reopened.all().iter().map(|s| s.rounds_played).collect();
        assert_eq!(all, vec![7, 8, 9, 10]);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut store = HistoryStore::open(MemoryStore::new(), 0);
        store.append(summary(1)).unwrap();
        store.append(summary(2)).unwrap();
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.all()[0].rounds_played, 2);
    }
}
