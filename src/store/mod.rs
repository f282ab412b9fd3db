//! Persistent history storage.
//!
//! [`HistoryStore`] is the contract the search and insertion paths rely on;
//! [`SqliteStore`] implements it over a single SQLite table.

pub mod schema;
pub mod sqlite;

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::filters::Predicate;
use crate::models::{DedupKey, HistoryEntry, NewEntry};

pub use sqlite::SqliteStore;

/// The store could not be opened, read or written
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open history database at {}: {source}", path.display())]
    Open { path: PathBuf, source: rusqlite::Error },
    #[error("history database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage operations used by the search session and the recorder
pub trait HistoryStore {
    /// Every entry, oldest first
    fn list_all(&self) -> StoreResult<Vec<HistoryEntry>>;

    /// Entries accepted by `predicate`, evaluated by the store, oldest first
    fn find(&self, predicate: &Predicate) -> StoreResult<Vec<HistoryEntry>>;

    /// Store a new entry and return its id
    fn insert(&self, entry: &NewEntry) -> StoreResult<Uuid>;

    /// Whether an entry with exactly this key exists
    fn exists_exact(&self, key: DedupKey<'_>) -> StoreResult<bool>;

    /// Number of entries with exactly this key
    fn count_exact(&self, key: DedupKey<'_>) -> StoreResult<usize>;

    /// Total number of entries
    fn count(&self) -> StoreResult<usize>;
}
