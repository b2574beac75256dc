//! Strongly-typed identifiers.
//!
//! Sender identifiers are opaque strings handed to us by Messenger. Delivery
//! identifiers are generated locally (ULID) and only used to correlate log
//! lines belonging to one webhook delivery.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Page-scoped identifier of a Messenger end-user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    /// Wraps a platform-supplied identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SenderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unique identifier for one inbound webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(Ulid);

impl DeliveryId {
    /// Creates a new ID with a randomly generated ULID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Returns the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for DeliveryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dlv_{}", self.0)
    }
}

impl FromStr for DeliveryId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid_str = s.strip_prefix("dlv_").unwrap_or(s);

        Ulid::from_str(ulid_str)
            .map(Self)
            .map_err(|e| ParseIdError {
                id_type: "DeliveryId",
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_id_is_transparent() {
        let id = SenderId::new("1254459154682919");
        assert_eq!(id.as_str(), "1254459154682919");
        assert_eq!(id.to_string(), "1254459154682919");

        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"1254459154682919\"");
    }

    #[test]
    fn delivery_id_display_format() {
        let id = DeliveryId::new();
        assert!(id.to_string().starts_with("dlv_"));
    }

    #[test]
    fn delivery_id_parses_with_and_without_prefix() {
        let id = DeliveryId::new();
        let parsed: DeliveryId = id.to_string().parse().expect("should parse");
        assert_eq!(id, parsed);

        let raw: DeliveryId = id.as_ulid().to_string().parse().expect("should parse");
        assert_eq!(id, raw);
    }

    #[test]
    fn delivery_id_rejects_garbage() {
        let err = "not_a_ulid".parse::<DeliveryId>().unwrap_err();
        assert_eq!(err.id_type, "DeliveryId");
    }
}
