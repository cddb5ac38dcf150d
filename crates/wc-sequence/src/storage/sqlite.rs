/// SQLite-backed durable storage.
///
/// One database file holds many namespaces in a single table. Pairings
/// and sessions live side by side without seeing each other's keys.
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::KeyValueStorage;
use crate::error::StorageError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sequences (
    namespace TEXT NOT NULL,
    key       TEXT NOT NULL,
    value     BLOB NOT NULL,
    PRIMARY KEY (namespace, key)
)";

/// Shared handle to an opened database.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute(SCHEMA, [])?;
        tracing::debug!("sqlite sequence storage ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Storage view restricted to `namespace`.
    pub fn namespace(&self, namespace: impl Into<String>) -> SqliteStorage {
        SqliteStorage {
            db: self.clone(),
            namespace: namespace.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase").finish_non_exhaustive()
    }
}

/// One namespace inside a [`SqliteDatabase`].
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: SqliteDatabase,
    namespace: String,
}

impl SqliteStorage {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl KeyValueStorage for SqliteStorage {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db.lock().execute(
            "INSERT INTO sequences (namespace, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (namespace, key) DO UPDATE SET value = excluded.value",
            params![self.namespace, key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self
            .db
            .lock()
            .query_row(
                "SELECT value FROM sequences WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_all(&self) -> Result<Vec<Vec<u8>>, StorageError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare("SELECT value FROM sequences WHERE namespace = ?1")?;
        let rows = stmt.query_map(params![self.namespace], |row| row.get(0))?;
        let values = rows.collect::<Result<Vec<Vec<u8>>, _>>()?;
        Ok(values)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.db.lock().execute(
            "DELETE FROM sequences WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.db.lock().execute(
            "DELETE FROM sequences WHERE namespace = ?1",
            params![self.namespace],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_overwrite() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut storage = db.namespace("pairings");

        storage.set("t1", b"first").unwrap();
        storage.set("t1", b"second").unwrap();
        assert_eq!(storage.get("t1").unwrap(), Some(b"second".to_vec()));
        assert_eq!(storage.get_all().unwrap().len(), 1);
    }

    #[test]
    fn get_missing_is_none() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let storage = db.namespace("pairings");
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    #[test]
    fn namespaces_are_isolated() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut pairings = db.namespace("pairings");
        let mut sessions = db.namespace("sessions");

        pairings.set("shared", b"p").unwrap();
        sessions.set("shared", b"s").unwrap();
        sessions.set("other", b"s2").unwrap();

        assert_eq!(pairings.get("shared").unwrap(), Some(b"p".to_vec()));
        assert_eq!(sessions.get("shared").unwrap(), Some(b"s".to_vec()));
        assert_eq!(pairings.get_all().unwrap().len(), 1);

        sessions.clear().unwrap();
        assert!(sessions.get_all().unwrap().is_empty());
        assert_eq!(pairings.get_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_absent_is_noop() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut storage = db.namespace("sessions");
        storage.delete("missing").unwrap();
        storage.set("t", b"v").unwrap();
        storage.delete("t").unwrap();
        assert_eq!(storage.get("t").unwrap(), None);
    }
}
