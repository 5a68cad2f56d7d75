//! SQLite-backed slot storage.
//!
//! # Invariants
//! - One row per key in `local_storage`; writes are upserts.
//! - Reads never observe a partially written value.

use super::{KeyValueStorage, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable storage over one SQLite connection.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=storage status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStorage;
    use crate::storage::KeyValueStorage;

    #[test]
    fn upsert_replaces_existing_value() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.get_item("TAGS").unwrap(), None);

        storage.set_item("TAGS", "[]").unwrap();
        storage
            .set_item("TAGS", r#"[{"id":"t1","label":"work"}]"#)
            .unwrap();

        assert_eq!(
            storage.get_item("TAGS").unwrap().as_deref(),
            Some(r#"[{"id":"t1","label":"work"}]"#)
        );
        assert_eq!(storage.keys().unwrap(), vec!["TAGS".to_string()]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.set_item("tags", "lower").unwrap();
        storage.set_item("TAGS", "upper").unwrap();

        assert_eq!(storage.get_item("tags").unwrap().as_deref(), Some("lower"));
        assert_eq!(storage.get_item("TAGS").unwrap().as_deref(), Some("upper"));

        storage.remove_item("tags").unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["TAGS".to_string()]);
    }
}
