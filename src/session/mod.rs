//! Interactive search state.
//!
//! A [`SearchSession`] takes one ordered snapshot of the history and
//! recomputes its filtered view synchronously on every query edit. It owns
//! no terminal state: the `tui` module renders [`SearchSession::view`] and
//! feeds key presses back in as method calls.

use std::io;

use thiserror::Error;

use crate::filters::order::compare;
use crate::filters::{compile, order, parse_or_fallback};
use crate::models::HistoryEntry;
use crate::store::{HistoryStore, StoreError};
use crate::utils::resolve_current_directory;

/// Longest query the input line accepts, in characters
pub const MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to determine current directory: {0}")]
    CurrentDirectory(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Run the command as-is
    Command(String),
    /// Change to the recorded directory, then run the command
    ChangeDirectory { directory: String, command: String },
}

impl Selection {
    /// The single line written to stdout
    pub fn output_line(&self) -> String {
        match self {
            Selection::Command(command) => command.clone(),
            Selection::ChangeDirectory { directory, command } => {
                format!("cd {} && {}", shell_quote(directory), command)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Selected(Selection),
    Cancelled,
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SessionState::Ready)
    }
}

#[derive(Debug)]
pub struct SearchSession {
    current_directory: String,
    snapshot: Vec<HistoryEntry>,
    query: String,
    /// Indices into `snapshot`, in display order
    view: Vec<usize>,
    selected: Option<usize>,
    state: SessionState,
}

impl SearchSession {
    /// Snapshot the store and start with an empty query
    ///
    /// The store is only read here; later edits never touch it.
    pub fn load(
        store: &impl HistoryStore,
        directory_override: Option<&str>,
    ) -> Result<Self, SessionError> {
        let current_directory = resolve_current_directory(directory_override)?;
        let entries = store.list_all()?;
        tracing::debug!(
            entries = entries.len(),
            directory = %current_directory,
            "loaded history snapshot"
        );
        Ok(Self::new(entries, current_directory))
    }

    pub fn new(entries: Vec<HistoryEntry>, current_directory: impl Into<String>) -> Self {
        let current_directory = current_directory.into();
        let snapshot = order(entries, &current_directory);
        let mut session = Self {
            current_directory,
            snapshot,
            query: String::new(),
            view: Vec::new(),
            selected: None,
            state: SessionState::Ready,
        };
        session.recompute();
        session
    }

    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of entries in the snapshot
    pub fn total(&self) -> usize {
        self.snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// The filtered, ordered entries
    pub fn view(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + '_ {
        self.view.iter().map(|&i| &self.snapshot[i])
    }

    /// Entry at `index` in the filtered view
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.view.get(index).map(|&i| &self.snapshot[i])
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.selected.and_then(|index| self.get(index))
    }

    /// Replace the whole query buffer
    pub fn set_query(&mut self, query: &str) {
        if self.state.is_finished() {
            return;
        }
        self.query = query.chars().take(MAX_QUERY_LEN).collect();
        self.recompute();
    }

    pub fn push_char(&mut self, c: char) {
        if self.state.is_finished() || self.query.chars().count() >= MAX_QUERY_LEN {
            return;
        }
        self.query.push(c);
        self.recompute();
    }

    pub fn pop_char(&mut self) {
        if self.state.is_finished() || self.query.pop().is_none() {
            return;
        }
        self.recompute();
    }

    pub fn clear_query(&mut self) {
        if self.state.is_finished() || self.query.is_empty() {
            return;
        }
        self.query.clear();
        self.recompute();
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    /// Move the selection by `delta` rows, clamped to the view
    pub fn move_by(&mut self, delta: isize) {
        if self.state.is_finished() {
            return;
        }
        if let Some(current) = self.selected {
            let last = self.view.len().saturating_sub(1);
            self.selected = Some(current.saturating_add_signed(delta).min(last));
        }
    }

    /// Select the highlighted command; no-op when nothing is highlighted
    pub fn confirm(&mut self) {
        if self.state.is_finished() {
            return;
        }
        if let Some(entry) = self.selected_entry() {
            self.state = SessionState::Selected(Selection::Command(entry.command.clone()));
        }
    }

    /// Select the highlighted command, prefixed with a `cd` to its directory
    pub fn confirm_with_directory(&mut self) {
        if self.state.is_finished() {
            return;
        }
        if let Some(entry) = self.selected_entry() {
            self.state = SessionState::Selected(Selection::ChangeDirectory {
                directory: entry.directory.clone(),
                command: entry.command.clone(),
            });
        }
    }

    pub fn cancel(&mut self) {
        if !self.state.is_finished() {
            self.state = SessionState::Cancelled;
        }
    }

    /// Consume the session, returning the selection if one was made
    pub fn into_selection(self) -> Option<Selection> {
        match self.state {
            SessionState::Selected(selection) => Some(selection),
            _ => None,
        }
    }

    fn recompute(&mut self) {
        if self.query.is_empty() {
            self.view = (0..self.snapshot.len()).collect();
        } else {
            let predicate = compile(&parse_or_fallback(&self.query));
            let mut view: Vec<usize> = self
                .snapshot
                .iter()
                .enumerate()
                .filter(|(_, entry)| predicate.matches(entry))
                .map(|(i, _)| i)
                .collect();
            let snapshot = &self.snapshot;
            let directory = self.current_directory.as_str();
            view.sort_by(|&a, &b| compare(&snapshot[a], &snapshot[b], directory));
            self.view = view;
        }
        self.selected = self.view.len().checked_sub(1);
    }
}

/// Quote `text` for a POSIX shell when it contains anything but safe chars
pub fn shell_quote(text: &str) -> String {
    if !text.is_empty() && text.chars().all(is_shell_safe) {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '@' | '%' | '=')
}
