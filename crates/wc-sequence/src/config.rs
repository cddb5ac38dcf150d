use std::path::PathBuf;

use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::pairing::Pairing;
use crate::session::Session;
use crate::storage::{MemoryStorage, SqliteDatabase};
use crate::store::SequenceStore;
use crate::types::Sequence;

/// Environment variable holding the default store file path.
pub const STORE_PATH_ENV: &str = "WC_STORE_PATH";

pub const DEFAULT_PAIRING_NAMESPACE: &str = "wc_pairings";
pub const DEFAULT_SESSION_NAMESPACE: &str = "wc_sessions";

/// Where and how sequence stores are opened.
///
/// ```rust
/// use wc_sequence::StoreConfig;
///
/// let config = StoreConfig::new()
///     .path(None::<std::path::PathBuf>)
///     .session_namespace("dapp_sessions");
/// let mut sessions = config.open_sessions().unwrap();
/// assert!(sessions.get_all().unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite file. `None` keeps everything in memory.
    pub(crate) path: Option<PathBuf>,
    pub(crate) pairing_namespace: String,
    pub(crate) session_namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConfig {
    /// Create a config with defaults.
    ///
    /// If `WC_STORE_PATH` is set, it is used as the SQLite file. Override
    /// with [`.path()`](Self::path).
    pub fn new() -> Self {
        let path = std::env::var_os(STORE_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            path,
            pairing_namespace: DEFAULT_PAIRING_NAMESPACE.into(),
            session_namespace: DEFAULT_SESSION_NAMESPACE.into(),
        }
    }

    /// Set the SQLite file, or `None` for in-memory storage.
    pub fn path<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.path = path.map(Into::into);
        self
    }

    pub fn pairing_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.pairing_namespace = namespace.into();
        self
    }

    pub fn session_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.session_namespace = namespace.into();
        self
    }

    /// Configured SQLite file, if any.
    pub fn store_path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Open a store for `namespace` on the system clock.
    pub fn open_store<S: Sequence>(&self, namespace: &str) -> Result<SequenceStore<S>, StorageError> {
        self.open_store_with_clock(namespace, SystemClock)
    }

    /// Open a store for `namespace` with an explicit clock.
    pub fn open_store_with_clock<S: Sequence>(
        &self,
        namespace: &str,
        clock: impl Clock + 'static,
    ) -> Result<SequenceStore<S>, StorageError> {
        match &self.path {
            Some(path) => {
                let db = SqliteDatabase::open(path)?;
                tracing::debug!(?path, namespace, "opening sqlite sequence store");
                Ok(SequenceStore::with_clock(db.namespace(namespace), clock))
            }
            None => Ok(SequenceStore::with_clock(MemoryStorage::new(), clock)),
        }
    }

    pub fn open_pairings(&self) -> Result<SequenceStore<Pairing>, StorageError> {
        self.open_store(&self.pairing_namespace)
    }

    pub fn open_sessions(&self) -> Result<SequenceStore<Session>, StorageError> {
        self.open_store(&self.session_namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeTraveler;
    use crate::types::DAY_MS;

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::new()
            .path(Some("/tmp/wc.db"))
            .pairing_namespace("p")
            .session_namespace("s");
        assert_eq!(config.store_path(), Some(&PathBuf::from("/tmp/wc.db")));
        assert_eq!(config.pairing_namespace, "p");
        assert_eq!(config.session_namespace, "s");
    }

    #[test]
    fn in_memory_stores_are_independent() {
        let config = StoreConfig::new().path(None::<PathBuf>);
        let mut a = config.open_pairings().unwrap();
        let mut b = config.open_pairings().unwrap();

        a.set_sequence(&Pairing::new("t", crate::now_ms())).unwrap();
        assert!(a.contains("t").unwrap());
        assert!(!b.contains("t").unwrap());
    }

    #[test]
    fn open_with_clock_uses_it() {
        let traveler = TimeTraveler::starting_at(1_000);
        let config = StoreConfig::new().path(None::<PathBuf>);
        let mut store = config
            .open_store_with_clock::<Pairing>("p", traveler.clone())
            .unwrap();

        store.set_sequence(&Pairing::new("t", 1_000)).unwrap();
        traveler.travel(DAY_MS);
        assert!(store.get_sequence("t").unwrap_err().is_not_found());
    }
}
