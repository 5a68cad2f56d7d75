//! Durable string-keyed slot storage.
//!
//! # Responsibility
//! - Define the minimal `localStorage`-like contract cells persist through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Every call is synchronous; a successful `set_item` is durable for the
//!   backend's own notion of durability before it returns.
//! - Keys and values are opaque strings; encoding is the codec's concern.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage backend error: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value slot store shared by persistent cells.
///
/// Methods take `&self`; implementations own whatever interior mutability
/// they need. Handles are shared as `Rc<dyn KeyValueStorage>`.
pub trait KeyValueStorage {
    /// Returns the raw slot value, or `None` when the slot was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes (or overwrites) one slot.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes one slot. Removing a missing slot is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
    /// Returns every written key in ascending order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
