//! Pooled SQLite access for users, access grants and configuration.
//!
//! Uses r2d2 with r2d2_sqlite. SQLite WAL mode lets readers proceed
//! while a writer holds the lock; writers queue on the busy timeout.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

use super::models::{AccessRecord, ConfigurationKey, UserLogin, UserRecord};
use super::schema::{apply_pragmas, initialize_schema};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create connection pool: {0}")]
    PoolCreation(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

const USER_COLUMNS: &str = "id, google_id, email, name, last_login, app_version, ip, os, language, created_at";

/// Connection pool plus the queries the HTTP layer needs.
#[derive(Clone)]
pub struct Store {
    pool: Pool<SqliteConnectionManager>,
}

impl Store {
    /// Open (creating if needed) the database at `db_path`.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `max_size` - Maximum number of connections in the pool
    pub fn open<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(db_path);

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(PragmaCustomizer))
            .build(manager)?;

        initialize_schema(&*pool.get()?)?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }

    pub fn configuration(&self, key: ConfigurationKey) -> Result<Option<String>, StoreError> {
        let conn = self.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM configurations WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_configuration(&self, key: ConfigurationKey, value: &str) -> Result<(), StoreError> {
        let conn = self.get()?;
        conn.execute(
            "INSERT INTO configurations (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    /// Insert or update the user identified by `login.google_id`.
    ///
    /// `last_login` is set to `now`; `created_at` only on first insert.
    pub fn upsert_user(&self, login: &UserLogin, now: i64) -> Result<UserRecord, StoreError> {
        let conn = self.get()?;
        let user = conn.query_row(
            &format!(
                "INSERT INTO users (google_id, email, name, last_login, ip, os, language, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?4)
                 ON CONFLICT(google_id) DO UPDATE SET
                     email = excluded.email,
                     name = excluded.name,
                     last_login = excluded.last_login,
                     ip = COALESCE(excluded.ip, users.ip),
                     os = COALESCE(excluded.os, users.os),
                     language = COALESCE(excluded.language, users.language)
                 RETURNING {USER_COLUMNS}"
            ),
            params![
                login.google_id,
                login.email,
                login.name,
                now,
                login.ip,
                login.os,
                login.language
            ],
            user_from_row,
        )?;
        Ok(user)
    }

    pub fn user(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let conn = self.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn user_by_google_id(&self, google_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let conn = self.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE google_id = ?1"),
                params![google_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Returns `false` if no user has this id.
    pub fn set_user_app_version(&self, user_id: i64, version: &str) -> Result<bool, StoreError> {
        let conn = self.get()?;
        let updated = conn.execute(
            "UPDATE users SET app_version = ?2 WHERE id = ?1",
            params![user_id, version],
        )?;
        Ok(updated > 0)
    }

    /// Bind `code` to `user_id`, creating the grant if needed and
    /// pushing its expiry out to `expires_at`.
    pub fn upsert_access(
        &self,
        code: &str,
        user_id: Option<i64>,
        expires_at: i64,
    ) -> Result<AccessRecord, StoreError> {
        let conn = self.get()?;
        let access = conn.query_row(
            "INSERT INTO accesses (code, user_id, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET
                 user_id = excluded.user_id,
                 expires_at = excluded.expires_at
             RETURNING id, code, user_id, expires_at",
            params![code, user_id, expires_at],
            access_from_row,
        )?;
        Ok(access)
    }

    pub fn access(&self, code: &str) -> Result<Option<AccessRecord>, StoreError> {
        let conn = self.get()?;
        let access = conn
            .query_row(
                "SELECT id, code, user_id, expires_at FROM accesses WHERE code = ?1",
                params![code],
                access_from_row,
            )
            .optional()?;
        Ok(access)
    }

    /// Delete grants whose expiry is at or before `now`. Returns the
    /// number of rows removed.
    pub fn delete_expired_accesses(&self, now: i64) -> Result<usize, StoreError> {
        let conn = self.get()?;
        let removed = conn.execute("DELETE FROM accesses WHERE expires_at <= ?1", params![now])?;
        Ok(removed)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        google_id: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        last_login: row.get(4)?,
        app_version: row.get(5)?,
        ip: row.get(6)?,
        os: row.get(7)?,
        language: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn access_from_row(row: &Row<'_>) -> rusqlite::Result<AccessRecord> {
    Ok(AccessRecord {
        id: row.get(0)?,
        code: row.get(1)?,
        user_id: row.get(2)?,
        expires_at: row.get(3)?,
    })
}

/// Connection customizer that applies pragmas on acquire.
#[derive(Debug)]
struct PragmaCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_pragmas(conn)
    }
}
