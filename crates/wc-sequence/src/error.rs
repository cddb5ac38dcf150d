/// Errors returned by [`SequenceStore`](crate::SequenceStore).
///
/// A missing topic and a topic that was just found expired look the same
/// to the caller: both are `NotFound`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no sequence found for topic: {topic}")]
    NotFound { topic: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Whether this is a `NotFound` (as opposed to a storage failure).
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Failures of the durable key-value layer, including record encoding.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("record serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("record deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the concrete pairing and session types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("requested expiry {requested} outside allowed range [{min}, {max}]")]
    ExpiryOutOfRange { requested: u64, min: u64, max: u64 },

    #[error("sequence is not active: {topic}")]
    NotActive { topic: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = StoreError::NotFound {
            topic: "abc123".into(),
        };
        assert_eq!(err.to_string(), "no sequence found for topic: abc123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_error_is_not_not_found() {
        let err: StoreError = StorageError::Io(std::io::Error::other("disk gone")).into();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "storage failure: storage i/o error: disk gone");
    }

    #[test]
    fn test_display_deserialization() {
        let json_err = serde_json::from_slice::<u64>(b"not json").unwrap_err();
        let err = StorageError::Deserialization(json_err);
        assert!(err.to_string().starts_with("record deserialization failed:"));
    }

    #[test]
    fn test_display_expiry_out_of_range() {
        let err = SequenceError::ExpiryOutOfRange {
            requested: 10,
            min: 20,
            max: 30,
        };
        assert_eq!(
            err.to_string(),
            "requested expiry 10 outside allowed range [20, 30]"
        );
    }

    #[test]
    fn test_display_not_active() {
        let err = SequenceError::NotActive {
            topic: "t1".into(),
        };
        assert_eq!(err.to_string(), "sequence is not active: t1");
    }
}
