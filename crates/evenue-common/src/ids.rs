//! Typed ID wrappers for the UUID keys of the party database.
//!
//! Parties and reports are keyed by `uuid_generate_v4()` values. The newtypes
//! keep a party id from being passed where a report id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a party (`party_info.party_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(transparent)
)]
#[serde(transparent)]
pub struct PartyId(Uuid);

impl PartyId {
    /// Generate a new random party ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PartyId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PartyId> for Uuid {
    fn from(id: PartyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a report filed against a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(transparent)
)]
#[serde(transparent)]
pub struct UserReportId(Uuid);

impl UserReportId {
    /// Generate a new random user report ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserReportId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserReportId> for Uuid {
    fn from(id: UserReportId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a report filed against a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(transparent)
)]
#[serde(transparent)]
pub struct PartyReportId(Uuid);

impl PartyReportId {
    /// Generate a new random party report ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PartyReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PartyReportId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PartyReportId> for Uuid {
    fn from(id: PartyReportId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PartyReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_id_creation() {
        let id1 = PartyId::new();
        let id2 = PartyId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_party_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let party_id = PartyId::from(uuid);
        assert_eq!(party_id.as_uuid(), uuid);
        let uuid_back: Uuid = party_id.into();
        assert_eq!(uuid, uuid_back);
    }

    #[test]
    fn test_party_id_serializes_as_plain_uuid() {
        let uuid = Uuid::parse_str("40bf8891-bdfc-4dec-9821-c2fc016ef203").unwrap();
        let json = serde_json::to_string(&PartyId::from(uuid)).unwrap();
        assert_eq!(json, "\"40bf8891-bdfc-4dec-9821-c2fc016ef203\"");
    }

    #[test]
    fn test_report_id_display() {
        let uuid = Uuid::parse_str("658c0f3a-184f-4efb-a8f2-4524d60f3611").unwrap();
        assert_eq!(
            UserReportId::from(uuid).to_string(),
            "658c0f3a-184f-4efb-a8f2-4524d60f3611"
        );
        assert_eq!(
            PartyReportId::from(uuid).to_string(),
            "658c0f3a-184f-4efb-a8f2-4524d60f3611"
        );
    }
}
