pub mod model;
pub mod service;

pub use model::summary::MatchSummary;
pub use service::history_store::{HistoryStore, DEFAULT_CAPACITY, HISTORY_KEY};
pub use service::statistics::Statistics;
pub use service::storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
