/// Pairing — the long-lived link between a dapp and a wallet.
///
/// A fresh pairing is inactive with a short lifetime. It becomes active
/// once the peer responds, which stretches its lifetime to 30 days.
use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::types::{Sequence, DAY_MS, MINUTE_MS};

/// Lifetime of a pairing nobody has answered yet.
pub const INACTIVE_PAIRING_TTL_MS: u64 = 5 * MINUTE_MS;

/// Lifetime of an active pairing, and the upper bound for any pairing.
pub const ACTIVE_PAIRING_TTL_MS: u64 = 30 * DAY_MS;

/// Relay protocol the pairing was negotiated over.
pub const DEFAULT_RELAY_PROTOCOL: &str = "irn";

/// Public description of a dapp or wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayProtocolOptions {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Default for RelayProtocolOptions {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_RELAY_PROTOCOL.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub topic: String,
    pub relay: RelayProtocolOptions,
    pub peer_metadata: Option<AppMetadata>,
    /// Absolute expiry (Unix ms).
    pub expiry_date: u64,
    pub active: bool,
}

impl Pairing {
    /// New inactive pairing expiring in [`INACTIVE_PAIRING_TTL_MS`].
    pub fn new(topic: impl Into<String>, now: u64) -> Self {
        Self {
            topic: topic.into(),
            relay: RelayProtocolOptions::default(),
            peer_metadata: None,
            expiry_date: now.saturating_add(INACTIVE_PAIRING_TTL_MS),
            active: false,
        }
    }

    /// Mark active and extend to the full active lifetime.
    pub fn activate(&mut self, now: u64) {
        self.active = true;
        self.expiry_date = now.saturating_add(ACTIVE_PAIRING_TTL_MS);
    }

    /// Set expiry to `now + ttl_ms`.
    pub fn update_expiry(&mut self, ttl_ms: u64, now: u64) -> Result<(), SequenceError> {
        let requested = now.saturating_add(ttl_ms);
        let min = now.saturating_add(INACTIVE_PAIRING_TTL_MS);
        let max = now.saturating_add(ACTIVE_PAIRING_TTL_MS);
        if requested < min || requested > max {
            return Err(SequenceError::ExpiryOutOfRange {
                requested,
                min,
                max,
            });
        }
        self.expiry_date = requested;
        Ok(())
    }

    pub fn update_peer_metadata(&mut self, metadata: AppMetadata) {
        self.peer_metadata = Some(metadata);
    }
}

impl Sequence for Pairing {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn expiry_date(&self) -> u64 {
        self.expiry_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn metadata() -> AppMetadata {
        AppMetadata {
            name: "Example Dapp".into(),
            description: "Connect your wallet".into(),
            url: "example.com".into(),
            icons: vec!["https://example.com/icon.png".into()],
        }
    }

    #[test]
    fn new_pairing_is_inactive_and_short_lived() {
        let pairing = Pairing::new("topic", NOW);
        assert!(!pairing.active);
        assert_eq!(pairing.expiry_date, NOW + INACTIVE_PAIRING_TTL_MS);
        assert_eq!(pairing.relay.protocol, "irn");
    }

    #[test]
    fn activate_extends_to_thirty_days() {
        let mut pairing = Pairing::new("topic", NOW);
        pairing.activate(NOW + 1_000);
        assert!(pairing.active);
        assert_eq!(pairing.expiry_date, NOW + 1_000 + 30 * DAY_MS);
    }

    #[test]
    fn update_expiry_within_bounds() {
        let mut pairing = Pairing::new("topic", NOW);
        pairing.update_expiry(DAY_MS, NOW).unwrap();
        assert_eq!(pairing.expiry_date, NOW + DAY_MS);
    }

    #[test]
    fn update_expiry_rejects_out_of_range() {
        let mut pairing = Pairing::new("topic", NOW);
        let err = pairing.update_expiry(31 * DAY_MS, NOW).unwrap_err();
        assert!(matches!(err, SequenceError::ExpiryOutOfRange { .. }));

        let err = pairing.update_expiry(MINUTE_MS, NOW).unwrap_err();
        assert!(matches!(err, SequenceError::ExpiryOutOfRange { .. }));
        assert_eq!(pairing.expiry_date, NOW + INACTIVE_PAIRING_TTL_MS);
    }

    #[test]
    fn expiry_arithmetic_saturates_near_max() {
        let mut pairing = Pairing::new("topic", u64::MAX - 1);
        assert_eq!(pairing.expiry_date, u64::MAX);

        pairing.activate(u64::MAX);
        assert_eq!(pairing.expiry_date, u64::MAX);

        pairing.update_expiry(DAY_MS, u64::MAX).unwrap();
        assert_eq!(pairing.expiry_date, u64::MAX);
    }

    #[test]
    fn json_shape_uses_camel_case() {
        let mut pairing = Pairing::new("abc", NOW);
        pairing.update_peer_metadata(metadata());
        let json = serde_json::to_value(&pairing).unwrap();
        assert_eq!(json["expiryDate"], NOW + INACTIVE_PAIRING_TTL_MS);
        assert_eq!(json["peerMetadata"]["name"], "Example Dapp");
        assert!(json["relay"].get("data").is_none());
    }
}
