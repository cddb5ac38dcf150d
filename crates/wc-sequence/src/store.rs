/// SequenceStore — expiry-aware persistence for pairings and sessions.
///
/// Entries live only in the backing [`KeyValueStorage`]; there is no
/// in-memory index. Expiry is lazy: an entry past its expiry date stays
/// on disk until a read touches it, at which point it is deleted and the
/// expiration callback fires exactly once for its topic. No timer runs.
///
/// Every operation takes `&mut self`. Share a store across threads by
/// wrapping the whole thing in one `Mutex`.
use std::marker::PhantomData;

use crate::clock::{Clock, SystemClock};
use crate::error::{StorageError, StoreError};
use crate::storage::KeyValueStorage;
use crate::types::Sequence;

/// Callback invoked with the topic of each lazily expired sequence.
pub type ExpirationHandler = Box<dyn FnMut(&str) + Send>;

/// Generic store over any [`Sequence`] type.
pub struct SequenceStore<S> {
    storage: Box<dyn KeyValueStorage>,
    clock: Box<dyn Clock>,
    on_sequence_expiration: Option<ExpirationHandler>,
    _sequence: PhantomData<fn() -> S>,
}

impl<S: Sequence> SequenceStore<S> {
    /// Create a store over `storage`, reading time from the system clock.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Create a store with an explicit time source.
    pub fn with_clock(storage: impl KeyValueStorage + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            clock: Box::new(clock),
            on_sequence_expiration: None,
            _sequence: PhantomData,
        }
    }

    /// Register the expiration callback, replacing any previous one.
    pub fn set_on_sequence_expiration(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.on_sequence_expiration = Some(Box::new(handler));
    }

    /// Remove the expiration callback. Expired entries are then dropped silently.
    pub fn clear_on_sequence_expiration(&mut self) {
        self.on_sequence_expiration = None;
    }

    /// Insert or overwrite the sequence at its topic.
    pub fn set_sequence(&mut self, sequence: &S) -> Result<(), StoreError> {
        let bytes = encode(sequence)?;
        self.storage.set(sequence.topic(), &bytes)?;
        tracing::debug!(topic = sequence.topic(), "sequence stored");
        Ok(())
    }

    /// Look up a live sequence by topic.
    ///
    /// An expired entry is deleted, reported to the expiration callback,
    /// and then treated as absent.
    pub fn get_sequence(&mut self, topic: &str) -> Result<S, StoreError> {
        let Some(bytes) = self.storage.get(topic)? else {
            return Err(not_found(topic));
        };
        let sequence: S = decode(&bytes).map_err(|e| {
            tracing::warn!(topic, len = bytes.len(), "undecodable sequence record: {e}");
            StorageError::Deserialization(e)
        })?;

        if sequence.is_expired(self.clock.now()) {
            self.storage.delete(topic)?;
            self.notify_expired(topic);
            return Err(not_found(topic));
        }

        Ok(sequence)
    }

    /// All live sequences, in no particular order.
    ///
    /// Every entry is judged against a single `now` sample. Entries are
    /// classified first and storage is only mutated afterwards, so nothing
    /// is deleted if any record fails to decode.
    pub fn get_all(&mut self) -> Result<Vec<S>, StoreError> {
        let now = self.clock.now();
        let raw = self.storage.get_all()?;

        let mut live = Vec::with_capacity(raw.len());
        let mut expired = Vec::new();
        let total = raw.len();
        for (index, bytes) in raw.into_iter().enumerate() {
            let sequence: S = decode(&bytes).map_err(|e| {
                tracing::warn!(index, total, len = bytes.len(), "undecodable sequence record: {e}");
                StorageError::Deserialization(e)
            })?;
            if sequence.is_expired(now) {
                expired.push(sequence.topic().to_string());
            } else {
                live.push(sequence);
            }
        }

        // Each delete is paired with its notification, so a storage failure
        // part-way through still reports every entry already removed.
        for topic in &expired {
            self.storage.delete(topic)?;
            self.notify_expired(topic);
        }

        Ok(live)
    }

    /// Replace the entry at `on_topic` with `sequence`.
    ///
    /// The old entry is removed whether or not it had already expired, and
    /// no expiration is reported for it. `sequence.topic()` may differ from
    /// `on_topic` (rekey) or equal it (plain replace).
    pub fn update(&mut self, sequence: &S, on_topic: &str) -> Result<(), StoreError> {
        let bytes = encode(sequence)?;
        self.storage.delete(on_topic)?;
        self.storage.set(sequence.topic(), &bytes)?;
        tracing::debug!(from = on_topic, to = sequence.topic(), "sequence updated");
        Ok(())
    }

    /// Remove the entry at `topic`. Never fires the expiration callback.
    pub fn delete(&mut self, topic: &str) -> Result<(), StoreError> {
        self.storage.delete(topic)?;
        tracing::debug!(topic, "sequence deleted");
        Ok(())
    }

    /// Whether a live sequence exists at `topic`. Evicts it if expired.
    pub fn contains(&mut self, topic: &str) -> Result<bool, StoreError> {
        match self.get_sequence(topic) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Topics of all live sequences. Evicts expired ones.
    pub fn topics(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .get_all()?
            .iter()
            .map(|s| s.topic().to_string())
            .collect())
    }

    /// Remove every entry without reporting expirations.
    pub fn delete_all(&mut self) -> Result<(), StoreError> {
        self.storage.clear()?;
        tracing::debug!("all sequences deleted");
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn notify_expired(&mut self, topic: &str) {
        tracing::info!(topic, "sequence expired");
        if let Some(handler) = self.on_sequence_expiration.as_mut() {
            handler(topic);
        }
    }
}

fn not_found(topic: &str) -> StoreError {
    StoreError::NotFound {
        topic: topic.to_string(),
    }
}

fn encode<S: Sequence>(sequence: &S) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(sequence).map_err(StorageError::Serialization)
}

fn decode<S: Sequence>(bytes: &[u8]) -> Result<S, serde_json::Error> {
    serde_json::from_slice(bytes)
}
