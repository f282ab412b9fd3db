//! Deterministic ordering with current-directory affinity.
//!
//! Entries recorded in the current directory come first; each partition is
//! then ordered oldest to newest by id, so the newest row sits at the bottom
//! like terminal scrollback. The order depends only on its inputs.

use std::borrow::Borrow;
use std::cmp::Ordering;

use uuid::Uuid;

use crate::models::HistoryEntry;

/// Sort key: `false` sorts before `true`, so current-directory entries lead
pub fn ordering_key(entry: &HistoryEntry, current_directory: &str) -> (bool, Uuid) {
    (entry.directory != current_directory, entry.id)
}

pub fn compare(a: &HistoryEntry, b: &HistoryEntry, current_directory: &str) -> Ordering {
    ordering_key(a, current_directory).cmp(&ordering_key(b, current_directory))
}

/// Order entries for display relative to `current_directory`
pub fn order<T: Borrow<HistoryEntry>>(mut entries: Vec<T>, current_directory: &str) -> Vec<T> {
    entries.sort_by(|a, b| compare(a.borrow(), b.borrow(), current_directory));
    entries
}
