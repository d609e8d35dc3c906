//! Key-value repository contracts and implementations.
//!
//! # Responsibility
//! - Provide the durable record port used by note and progress stores.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - One key maps to at most one value; `put` replaces in full.
//! - Values are stored verbatim; repositories never parse them.
//! - SQLite repositories refuse connections without the `kv_store` table.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was opened without applied migrations.
    MissingRequiredTable(&'static str),
    /// Backend refused the operation (quota, permissions, closed handle).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value storage port.
pub trait KeyValueRepository {
    /// Reads one value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes one value, replacing any previous one.
    fn put(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<R: KeyValueRepository + ?Sized> KeyValueRepository for &R {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).put(key, value)
    }
}

/// SQLite-backed key-value repository.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "kv_store")? {
            return Err(RepoError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local key-value repository.
///
/// Used for ephemeral sessions and tests; nothing survives the value.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueRepository {
    entries: RefCell<HashMap<String, String>>,
}

impl InMemoryKeyValueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one record.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.entries.borrow_mut().insert(key.into(), value.into());
        repo
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueRepository for InMemoryKeyValueRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{InMemoryKeyValueRepository, KeyValueRepository, RepoError, SqliteKeyValueRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn in_memory_put_replaces_previous_value() {
        let repo = InMemoryKeyValueRepository::new();
        assert_eq!(repo.get("k").unwrap(), None);
        repo.put("k", "one").unwrap();
        repo.put("k", "two").unwrap();
        assert_eq!(repo.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn sqlite_put_is_an_upsert() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
        repo.put("notes", "{}").unwrap();
        repo.put("notes", "{\"a\":1}").unwrap();
        assert_eq!(repo.get("notes").unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(repo.get("missing").unwrap(), None);
    }

    #[test]
    fn sqlite_repo_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueRepository::try_new(&conn)
            .err()
            .expect("unmigrated connection should be rejected");
        assert!(matches!(err, RepoError::MissingRequiredTable("kv_store")));
    }
}
