use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A recorded command with its execution context.
///
/// Entries are immutable once stored. `id` is a UUIDv7, so comparing ids
/// compares insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    pub directory: String,
    pub username: String,
    pub tty: String,
    pub sid: String,
}

/// Insertion candidate; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    pub directory: String,
    pub username: String,
    pub tty: String,
    pub sid: String,
}

impl NewEntry {
    /// Candidate stamped with the current time and empty context fields
    pub fn new(command: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timestamp: Utc::now(),
            hostname: String::new(),
            directory: directory.into(),
            username: String::new(),
            tty: String::new(),
            sid: String::new(),
        }
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn tty(mut self, tty: impl Into<String>) -> Self {
        self.tty = tty.into();
        self
    }

    pub fn sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = sid.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn dedup_key(&self) -> DedupKey<'_> {
        DedupKey {
            command: &self.command,
            directory: &self.directory,
            hostname: &self.hostname,
            username: &self.username,
        }
    }
}

/// The four fields that make two entries duplicates of each other.
///
/// Compared with exact equality; `tty`, `sid` and `timestamp` never take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupKey<'a> {
    pub command: &'a str,
    pub directory: &'a str,
    pub hostname: &'a str,
    pub username: &'a str,
}
