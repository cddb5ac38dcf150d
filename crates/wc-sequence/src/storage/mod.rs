/// Durable key-value storage behind the sequence store.
///
/// One storage instance is one namespace: keys are topics, values are
/// encoded sequences. The store is the only writer of its namespace.
pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::{SqliteDatabase, SqliteStorage};

use crate::error::StorageError;

/// Byte-oriented persistence service.
///
/// Calls are synchronous and local. Implementations report failures
/// verbatim; the store never retries.
pub trait KeyValueStorage: Send {
    /// Insert or overwrite the value at `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Value at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Every value in the namespace. Order is unspecified.
    fn get_all(&self) -> Result<Vec<Vec<u8>>, StorageError>;

    /// Remove `key`. Absent keys are a no-op.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;

    /// Remove every key in the namespace.
    fn clear(&mut self) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn get_all(&self) -> Result<Vec<Vec<u8>>, StorageError> {
        (**self).get_all()
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        (**self).clear()
    }
}
