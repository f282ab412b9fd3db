//! Embedded schema migrations for the history database.
//!
//! Migrations run in order inside one transaction; the number applied is
//! tracked in `PRAGMA user_version`.

use rusqlite::Connection;

/// Initial schema: one row per recorded command.
pub const MIGRATION_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS history (
    id TEXT PRIMARY KEY,
    command TEXT NOT NULL,
    executed_at TEXT NOT NULL,
    executing_host TEXT NOT NULL DEFAULT '',
    executing_dir TEXT NOT NULL DEFAULT '',
    executing_user TEXT NOT NULL DEFAULT '',
    tty TEXT NOT NULL DEFAULT '',
    sid TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_history_dir ON history(executing_dir);
"#;

/// V2: exact-match lookups for the duplicate guard.
pub const MIGRATION_DEDUP_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_history_dedup
    ON history(command, executing_dir, executing_host, executing_user);
"#;

pub const MIGRATIONS: &[&str] = &[MIGRATION_INIT, MIGRATION_DEDUP_INDEX];

/// Version a fully migrated database reports
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Apply pending migrations, returning how many ran
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<usize> {
    let current = schema_version(conn)?.max(0) as usize;
    if current >= MIGRATIONS.len() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &MIGRATIONS[current..] {
        tx.execute_batch(migration)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    Ok(MIGRATIONS.len() - current)
}

/// Warn when the database is behind (or ahead of) this binary
pub fn check_schema_version(conn: &Connection) {
    match schema_version(conn) {
        Ok(current) if current != SCHEMA_VERSION => {
            tracing::warn!(
                current,
                required = SCHEMA_VERSION,
                "database schema version mismatch; run 'dirhist schema-migrate' to update"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "failed to check schema version"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        let applied = migrate(&mut conn).unwrap();
        assert_eq!(applied, MIGRATIONS.len());
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(migrate(&mut conn).unwrap(), 0);
    }

    #[test]
    fn test_migrate_partial() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(MIGRATION_INIT).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        assert_eq!(migrate(&mut conn).unwrap(), 1);
        let index_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_history_dedup'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 1);
    }
}
