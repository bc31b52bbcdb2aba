//! Time-ordered webhook identifiers.
//!
//! # Responsibilities
//! - Generate globally unique identifiers (UUIDv7)
//! - Guarantee that later identifiers compare greater than earlier ones
//! - Parse and validate identifiers arriving from clients
//!
//! # Design Decisions
//! - The identifier doubles as primary key and pagination cursor
//! - Text form is canonical lowercase hyphenated, so string order == issue order
//! - A process-wide high-water mark keeps ordering strict even when the clock
//!   stalls or steps backwards

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;

/// Last identifier handed out by this process.
static LAST_ISSUED: Mutex<u128> = Mutex::new(0);

/// Unique, chronologically sortable identifier of a captured webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WebhookId(Uuid);

impl WebhookId {
    /// Generate a new identifier, strictly greater than any issued before it
    /// in this process.
    pub fn generate() -> Self {
        let candidate = Uuid::now_v7().as_u128();
        let mut last = LAST_ISSUED
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Bumping the low bits keeps the timestamp prefix and version nibble intact.
        let next = if candidate > *last { candidate } else { *last + 1 };
        *last = next;
        Self(Uuid::from_u128(next))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// Error returned when a string is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid webhook id: expected a UUID, got {0:?}")]
pub struct InvalidId(pub String);

impl FromStr for WebhookId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

impl From<Uuid> for WebhookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Serialize for WebhookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WebhookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids: Vec<WebhookId> = (0..1000).map(|_| WebhookId::generate()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].to_string() < pair[1].to_string());
        }
    }

    #[test]
    fn ids_are_version_7() {
        let id = WebhookId::generate();
        assert_eq!(id.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn concurrent_generation_is_unique() {
        let seen = Arc::new(Mutex::new(HashSet::new()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seen = seen.clone();
                std::thread::spawn(move || {
                    let mut local = Vec::with_capacity(500);
                    for _ in 0..500 {
                        local.push(WebhookId::generate());
                    }
                    // Each thread observes its own ids in increasing order.
                    assert!(local.windows(2).all(|w| w[0] < w[1]));
                    seen.lock().unwrap().extend(local);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(seen.lock().unwrap().len(), 4000);
    }

    #[test]
    fn parse_round_trips_display() {
        let id = WebhookId::generate();
        let parsed: WebhookId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<WebhookId>().is_err());
        assert!("".parse::<WebhookId>().is_err());
        let err = "123".parse::<WebhookId>().unwrap_err();
        assert!(err.to_string().contains("123"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = WebhookId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
