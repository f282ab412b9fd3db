use crate::models::NewEntry;
use crate::store::{HistoryStore, StoreResult};

/// Whether the store already holds an entry with the candidate's exact
/// `(command, directory, hostname, username)`
pub fn is_duplicate(candidate: &NewEntry, store: &impl HistoryStore) -> StoreResult<bool> {
    store.exists_exact(candidate.dedup_key())
}
