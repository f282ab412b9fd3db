//! dirhist - directory-aware shell history
//!
//! Every command line is stored in SQLite together with the directory it ran
//! in, the host, the user and the terminal session. Searching ranks commands
//! from the current directory first and filters incrementally as the query
//! is typed. The library provides:
//!
//! - A small query language (`git dir:src NOT host:ci OR make`)
//! - Compilation of queries to in-memory predicates or SQL clauses
//! - Directory-affinity ordering
//! - The duplicate-aware insertion path used by the shell hook
//! - The interactive search session behind `dirhist search`
//!
//! # Example
//!
//! ```
//! use dirhist::models::NewEntry;
//! use dirhist::recorder::{RecordOptions, record_command};
//! use dirhist::session::SearchSession;
//! use dirhist::store::{HistoryStore, SqliteStore};
//!
//! let store = SqliteStore::open_in_memory()?;
//! record_command(&store, NewEntry::new("git status", "/src"), RecordOptions::default())?;
//! record_command(&store, NewEntry::new("ls -la", "/tmp"), RecordOptions::default())?;
//!
//! let mut session = SearchSession::new(store.list_all()?, "/src");
//! session.set_query("git");
//! assert_eq!(session.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod filters;
pub mod models;
pub mod recorder;
pub mod session;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use filters::{BooleanQuery, Predicate, compile, order, parse_or_fallback, parse_query};
pub use models::{HistoryEntry, NewEntry};
pub use session::{SearchSession, Selection};
pub use store::{HistoryStore, SqliteStore};
pub use utils::paths::format_path_with_tilde;
