//! Sequence persistence for the wallet-connection stack.
//!
//! Pairings and sessions ("sequences") are stored by topic with an
//! absolute expiry date. Expiry is lazy: the store drops an expired
//! sequence the first time a read touches it and reports the topic to
//! a single registered callback.
//!
//! Storage: SQLite (durable) or in-memory, values encoded as JSON.
//! Time: injected through [`Clock`], so tests can travel forward.

pub mod clock;
pub mod config;
pub mod error;
pub mod pairing;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

pub use clock::{Clock, SystemClock, TimeTraveler};
pub use config::StoreConfig;
pub use error::{SequenceError, StorageError, StoreError};
pub use pairing::{AppMetadata, Pairing, RelayProtocolOptions};
pub use session::{Participant, Session};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteDatabase, SqliteStorage};
pub use store::{ExpirationHandler, SequenceStore};
pub use types::{generate_topic, now_ms, Sequence, DAY_MS};
