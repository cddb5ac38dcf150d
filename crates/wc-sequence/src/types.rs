use serde::{de::DeserializeOwned, Serialize};

// ── Time constants (milliseconds) ────────────────────────────────────────

pub const MINUTE_MS: u64 = 60 * 1000;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Topic length in raw bytes before hex encoding.
pub const TOPIC_BYTES: usize = 32;

/// A protocol record identified by a topic with an absolute expiry.
///
/// The topic is the storage key. Keeping it unique is the caller's job;
/// the store never checks for collisions across different records.
pub trait Sequence: Serialize + DeserializeOwned {
    /// Unique topic of this sequence.
    fn topic(&self) -> &str;

    /// Absolute expiry (Unix ms).
    fn expiry_date(&self) -> u64;

    /// Whether this sequence is no longer valid at `now`.
    fn is_expired(&self, now: u64) -> bool {
        self.expiry_date() <= now
    }
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Generate a fresh random topic: 32 bytes, lower-case hex.
pub fn generate_topic() -> String {
    let bytes: [u8; TOPIC_BYTES] = rand::random();
    data_encoding::HEXLOWER.encode(&bytes)
}
