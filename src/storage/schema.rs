//! Schema initialization and connection pragmas.

use rusqlite::{params, Connection};
use std::time::Duration;

use super::models::ConfigurationKey;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS configurations (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    google_id   TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL,
    name        TEXT,
    last_login  INTEGER NOT NULL,
    app_version TEXT,
    ip          TEXT,
    os          TEXT,
    language    TEXT,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS accesses (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    code       TEXT NOT NULL UNIQUE,
    user_id    INTEGER REFERENCES users(id) ON DELETE CASCADE,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accesses_expires_at ON accesses(expires_at);
"#;

/// Apply per-connection pragmas (WAL, busy timeout, foreign keys).
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

/// Create tables if missing and seed every configuration key.
///
/// Existing configuration values are never overwritten.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO configurations (key, value) VALUES (?1, ?2)")?;
    for key in ConfigurationKey::ALL {
        stmt.execute(params![key.as_str(), key.default_value()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_configurations_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM configurations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, ConfigurationKey::ALL.len() as i64);
    }

    #[test]
    fn test_initialize_is_idempotent_and_keeps_values() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "UPDATE configurations SET value = '7' WHERE key = 'OfflineLogins'",
            [],
        )
        .unwrap();
        initialize_schema(&conn).unwrap();

        let value: String = conn
            .query_row(
                "SELECT value FROM configurations WHERE key = 'OfflineLogins'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "7");
    }
}
