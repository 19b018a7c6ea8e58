//! Blob persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide a stable string-keyed get/set API over durable storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `set` overwrites any prior value at the same key.
//! - Implementations treat values as opaque text; decoding is the caller's
//!   concern.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The single key under which the serialized task collection is stored.
///
/// No other key is used by this core.
pub const TASKS_BLOB_KEY: &str = "tasks.v1";

pub type BlobResult<T> = Result<T, BlobStoreError>;

/// Generic backend error for blob persistence operations.
#[derive(Debug)]
pub enum BlobStoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    Backend(String),
}

impl Display for BlobStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for BlobStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for BlobStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed blob storage consumed by the task store.
pub trait BlobStore {
    /// Reads the blob at `key`, or `None` when nothing was ever stored there.
    fn get(&self, key: &str) -> BlobResult<Option<String>>;

    /// Writes `value` under `key`, overwriting any prior value.
    fn set(&self, key: &str, value: &str) -> BlobResult<()>;
}

impl<B: BlobStore + ?Sized> BlobStore for &B {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> BlobResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed blob store over the migrated `blobs` table.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a connection after verifying it was bootstrapped through
    /// [`crate::db::open_db`] or [`crate::db::open_db_in_memory`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `blobs` table is absent.
    pub fn try_new(conn: &'conn Connection) -> BlobResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(BlobStoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'blobs'
            );",
            [],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(BlobStoreError::MissingRequiredTable("blobs"));
        }

        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory blob store for tests and ephemeral sessions.
///
/// `fail_writes` turns every `set` into an error so callers can exercise the
/// store's absorb-on-save policy.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches write failure injection on or off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BlobResult<()> {
        if self.fail_writes.get() {
            return Err(BlobStoreError::Backend(format!(
                "write to key `{key}` rejected by fault injection"
            )));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
