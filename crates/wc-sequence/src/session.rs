/// Session — a settled connection between a dapp and a wallet.
///
/// Sessions hang off a pairing topic and live for at most 7 days at a
/// time. A session can be extended but never shortened.
use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::pairing::AppMetadata;
use crate::types::{Sequence, DAY_MS};

/// Default and maximum session lifetime.
pub const SESSION_TTL_MS: u64 = 7 * DAY_MS;

/// One side of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Hex-encoded public key.
    pub public_key: String,
    pub metadata: AppMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub topic: String,
    pub pairing_topic: String,
    pub self_participant: Participant,
    pub peer_participant: Participant,
    /// Absolute expiry (Unix ms).
    pub expiry_date: u64,
    /// Whether the peer confirmed settlement.
    pub acknowledged: bool,
}

impl Session {
    /// New unacknowledged session expiring in [`SESSION_TTL_MS`].
    pub fn new(
        topic: impl Into<String>,
        pairing_topic: impl Into<String>,
        self_participant: Participant,
        peer_participant: Participant,
        now: u64,
    ) -> Self {
        Self {
            topic: topic.into(),
            pairing_topic: pairing_topic.into(),
            self_participant,
            peer_participant,
            expiry_date: now.saturating_add(SESSION_TTL_MS),
            acknowledged: false,
        }
    }

    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    /// Push expiry to `now + ttl_ms`.
    ///
    /// Fails if the session is unacknowledged, if the new expiry would be
    /// earlier than the current one, or if it exceeds `now + SESSION_TTL_MS`.
    pub fn extend(&mut self, ttl_ms: u64, now: u64) -> Result<(), SequenceError> {
        if !self.acknowledged {
            return Err(SequenceError::NotActive {
                topic: self.topic.clone(),
            });
        }
        let requested = now.saturating_add(ttl_ms);
        let max = now.saturating_add(SESSION_TTL_MS);
        if requested < self.expiry_date || requested > max {
            return Err(SequenceError::ExpiryOutOfRange {
                requested,
                min: self.expiry_date,
                max,
            });
        }
        self.expiry_date = requested;
        Ok(())
    }
}

impl Sequence for Session {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn expiry_date(&self) -> u64 {
        self.expiry_date
    }
}
