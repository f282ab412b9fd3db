//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dirhist::models::NewEntry;
use dirhist::store::{HistoryStore, SqliteStore};
use tempfile::TempDir;

/// Builder for a history database file inside a temp directory
pub struct HistoryDbBuilder {
    temp_dir: TempDir,
    entries: Vec<NewEntry>,
}

impl HistoryDbBuilder {
    /// Create a new builder with no entries
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, entries: Vec::new() }
    }

    /// Add a command run in `directory` on host1 by u1
    pub fn with_command(self, command: &str, directory: &str) -> Self {
        self.with_entry(EntryBuilder::new(command, directory))
    }

    pub fn with_entry(mut self, entry: EntryBuilder) -> Self {
        self.entries.push(entry.build());
        self
    }

    /// Write the database and return the fixture (entries in insertion order)
    pub fn build(self) -> HistoryDb {
        let db_path = self.temp_dir.path().join("history.db");
        let (store, _) = SqliteStore::open_and_migrate(&db_path).expect("Failed to create database");
        for entry in &self.entries {
            store.insert(entry).expect("Failed to insert entry");
        }
        HistoryDb { temp_dir: self.temp_dir, db_path }
    }
}

impl Default for HistoryDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A database file on disk plus a config file pointing at it
pub struct HistoryDb {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl HistoryDb {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn open(&self) -> SqliteStore {
        SqliteStore::open_read_write(&self.db_path).expect("Failed to open database")
    }

    /// Write a config file for this database and return its path
    pub fn write_config(&self, history_limit: usize) -> PathBuf {
        let config_path = self.temp_dir.path().join("dirhist.toml");
        let content = format!(
            "database_path = {:?}\ncurrent_directory_history_limit = {}\n",
            self.db_path.to_str().expect("Non-UTF-8 temp path"),
            history_limit
        );
        fs::write(&config_path, content).expect("Failed to write config");
        config_path
    }
}

/// Builder for one history entry
pub struct EntryBuilder {
    command: String,
    directory: String,
    hostname: String,
    username: String,
    tty: String,
    sid: String,
}

impl EntryBuilder {
    pub fn new(command: &str, directory: &str) -> Self {
        Self {
            command: command.to_string(),
            directory: directory.to_string(),
            hostname: "host1".to_string(),
            username: "u1".to_string(),
            tty: String::new(),
            sid: String::new(),
        }
    }

    pub fn hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn tty(mut self, tty: &str) -> Self {
        self.tty = tty.to_string();
        self
    }

    pub fn sid(mut self, sid: &str) -> Self {
        self.sid = sid.to_string();
        self
    }

    pub fn build(self) -> NewEntry {
        NewEntry::new(self.command, self.directory)
            .hostname(self.hostname)
            .username(self.username)
            .tty(self.tty)
            .sid(self.sid)
    }
}

/// In-memory store seeded with `(command, directory)` pairs
pub fn memory_store(commands: &[(&str, &str)]) -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    for (command, directory) in commands {
        store.insert(&EntryBuilder::new(command, directory).build()).expect("Failed to insert");
    }
    store
}
