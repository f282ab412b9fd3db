//! Insertion path for new history entries.
//!
//! Each `dirhist add` invocation opens its own read-write store, runs the
//! duplicate guard and inserts. The check and the insert are separate
//! statements: two shells recording the same command at the same moment can
//! both pass the guard. History is best-effort, so that race is accepted.

pub mod dedup;

use thiserror::Error;
use uuid::Uuid;

pub use dedup::is_duplicate;

use crate::models::NewEntry;
use crate::store::{HistoryStore, StoreError};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("empty command")]
    EmptyCommand,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOptions {
    /// Skip insertion when an exact duplicate exists
    pub dedup: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self { dedup: true }
    }
}

/// What happened to a recorded command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Id of the inserted row; `None` when the guard skipped the insert
    pub id: Option<Uuid>,
    /// An entry with the same dedup key exists (besides the one just inserted)
    pub duplicate: bool,
}

/// Record a command, applying the duplicate guard unless bypassed
///
/// The command is trimmed first; an empty command is rejected. With
/// `dedup: false` the guard query is not issued at all: the entry is inserted
/// and `duplicate` is derived from the key count afterwards.
pub fn record_command(
    store: &impl HistoryStore,
    mut candidate: NewEntry,
    options: RecordOptions,
) -> Result<RecordOutcome, RecordError> {
    let trimmed = candidate.command.trim();
    if trimmed.is_empty() {
        return Err(RecordError::EmptyCommand);
    }
    if trimmed.len() != candidate.command.len() {
        candidate.command = trimmed.to_string();
    }

    if options.dedup {
        if is_duplicate(&candidate, store)? {
            tracing::debug!(command = %candidate.command, "skipping duplicate command");
            return Ok(RecordOutcome { id: None, duplicate: true });
        }
        let id = store.insert(&candidate)?;
        return Ok(RecordOutcome { id: Some(id), duplicate: false });
    }

    let id = store.insert(&candidate)?;
    let duplicate = store.count_exact(candidate.dedup_key())? > 1;
    Ok(RecordOutcome { id: Some(id), duplicate })
}
