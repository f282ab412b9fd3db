use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row, params, params_from_iter};
use uuid::Uuid;

use super::schema::{check_schema_version, migrate};
use super::{HistoryStore, StoreError, StoreResult};
use crate::filters::Predicate;
use crate::filters::apply::contains_folded;
use crate::filters::sql::CONTAINS_FUNCTION;
use crate::models::{DedupKey, HistoryEntry, NewEntry};

/// How long a writer waits on a lock held by another shell
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

const SELECT_COLUMNS: &str =
    "id, command, executed_at, executing_host, executing_dir, executing_user, tty, sid";

/// History store backed by a SQLite database file
///
/// The connection closes when the store is dropped.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database for reading only
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open { path: path.to_path_buf(), source })?;
        check_schema_version(&conn);
        Self::from_connection(conn)
    }

    /// Open (creating if needed) a database for reading and writing
    pub fn open_read_write(path: &Path) -> StoreResult<Self> {
        let store = Self::open_writable(path)?;
        check_schema_version(&store.conn);
        Ok(store)
    }

    /// Open for writing and bring the schema up to date
    pub fn open_and_migrate(path: &Path) -> StoreResult<(Self, usize)> {
        let mut store = Self::open_writable(path)?;
        let applied = store.migrate()?;
        Ok((store, applied))
    }

    fn open_writable(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|source| StoreError::Open { path: path.to_path_buf(), source })?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Fully migrated in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut store = Self::from_connection(Connection::open_in_memory()?)?;
        store.migrate()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Apply pending schema migrations
    pub fn migrate(&mut self) -> StoreResult<usize> {
        Ok(migrate(&mut self.conn)?)
    }

    fn query_entries(&self, sql: &str, params: &[String]) -> StoreResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn count_matching(&self, key: DedupKey<'_>) -> StoreResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM history
             WHERE command = ?1
               AND executing_dir = ?2
               AND executing_host = ?3
               AND executing_user = ?4",
            params![key.command, key.directory, key.hostname, key.username],
            |row| row.get(0),
        )?)
    }
}

impl HistoryStore for SqliteStore {
    fn list_all(&self) -> StoreResult<Vec<HistoryEntry>> {
        self.query_entries(&format!("SELECT {} FROM history ORDER BY id ASC", SELECT_COLUMNS), &[])
    }

    fn find(&self, predicate: &Predicate) -> StoreResult<Vec<HistoryEntry>> {
        let filter = predicate.to_sql();
        let sql = format!(
            "SELECT {} FROM history WHERE {} ORDER BY id ASC",
            SELECT_COLUMNS, filter.clause
        );
        self.query_entries(&sql, &filter.params)
    }

    fn insert(&self, entry: &NewEntry) -> StoreResult<Uuid> {
        let id = Uuid::now_v7();
        self.conn.execute(
            "INSERT INTO history (
                id, command, executed_at, executing_host,
                executing_dir, executing_user, tty, sid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.to_string(),
                entry.command,
                format_timestamp(&entry.timestamp),
                entry.hostname,
                entry.directory,
                entry.username,
                entry.tty,
                entry.sid
            ],
        )?;
        Ok(id)
    }

    fn exists_exact(&self, key: DedupKey<'_>) -> StoreResult<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM history
                WHERE command = ?1
                  AND executing_dir = ?2
                  AND executing_host = ?3
                  AND executing_user = ?4
            )",
            params![key.command, key.directory, key.hostname, key.username],
            |row| row.get(0),
        )?)
    }

    fn count_exact(&self, key: DedupKey<'_>) -> StoreResult<usize> {
        Ok(self.count_matching(key)? as usize)
    }

    fn count(&self) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Register the substring function used by SQL pushdown
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CONTAINS_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<String>(0)?;
            let needle = ctx.get::<String>(1)?;
            Ok(contains_folded(&haystack, &needle))
        },
    )
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let executed_at: String = row.get(2)?;
    let timestamp = DateTime::parse_from_rfc3339(&executed_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(HistoryEntry {
        id,
        command: row.get(1)?,
        timestamp,
        hostname: row.get(3)?,
        directory: row.get(4)?,
        username: row.get(5)?,
        tty: row.get(6)?,
        sid: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::filters::{compile, parse_query};

    fn candidate(command: &str, directory: &str) -> NewEntry {
        NewEntry::new(command, directory).hostname("host1").username("u1")
    }

    #[test]
    fn test_insert_and_list() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.insert(&candidate("ls", "/a").tty("/dev/pts/3").sid("42")).unwrap();
        let second = store.insert(&candidate("pwd", "/b")).unwrap();

        let entries = store.list_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first);
        assert_eq!(entries[0].command, "ls");
        assert_eq!(entries[0].tty, "/dev/pts/3");
        assert_eq!(entries[0].sid, "42");
        assert_eq!(entries[1].id, second);
        assert!(first < second);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap();
        store.insert(&candidate("ls", "/a").timestamp(at)).unwrap();
        assert_eq!(store.list_all().unwrap()[0].timestamp, at);
    }

    #[test]
    fn test_exists_exact() {
        let store = SqliteStore::open_in_memory().unwrap();
        let entry = candidate("ls -la", "/a");
        assert!(!store.exists_exact(entry.dedup_key()).unwrap());

        store.insert(&entry).unwrap();
        assert!(store.exists_exact(entry.dedup_key()).unwrap());

        // Substrings and other contexts are not exact matches
        assert!(!store.exists_exact(candidate("ls", "/a").dedup_key()).unwrap());
        assert!(!store.exists_exact(candidate("ls -la", "/a/b").dedup_key()).unwrap());
        assert!(!store.exists_exact(candidate("LS -LA", "/a").dedup_key()).unwrap());
    }

    #[test]
    fn test_counts() {
        let store = SqliteStore::open_in_memory().unwrap();
        let entry = candidate("make", "/src");
        store.insert(&entry).unwrap();
        store.insert(&entry).unwrap();
        store.insert(&candidate("make", "/other")).unwrap();

        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.count_exact(entry.dedup_key()).unwrap(), 2);
    }

    #[test]
    fn test_find_matches_in_memory_filter() {
        let store = SqliteStore::open_in_memory().unwrap();
        for (command, directory, host) in [
            ("git status", "/Work/api", "laptop"),
            ("GIT commit", "/work/web", "desktop"),
            ("echo über", "/tmp", "laptop"),
            ("ls -la", "/tmp", "ci"),
        ] {
            store.insert(&NewEntry::new(command, directory).hostname(host)).unwrap();
        }
        let all = store.list_all().unwrap();

        for raw in ["git", "dir:work NOT host:desk", "ÜBER OR host:ci", "", "NOT tmp"] {
            let predicate = compile(&parse_query(raw).unwrap());
            let expected: Vec<_> =
                all.iter().filter(|e| predicate.matches(e)).map(|e| e.id).collect();
            let found: Vec<_> = store.find(&predicate).unwrap().iter().map(|e| e.id).collect();
            assert_eq!(found, expected, "query {:?}", raw);
        }
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SqliteStore::open_read_only(&dir.path().join("missing.db"));
        assert!(matches!(result, Err(StoreError::Open { .. })));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("history.db");
        {
            let (store, applied) = SqliteStore::open_and_migrate(&path).unwrap();
            assert!(applied > 0);
            store.insert(&candidate("ls", "/a")).unwrap();
        }

        let store = SqliteStore::open_read_only(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.insert(&candidate("pwd", "/a")).is_err());
    }
}
