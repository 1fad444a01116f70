//! Entity types mirrored from the remote CRM.
//!
//! The CRM assigns every identifier; nothing here is generated locally.
//! All types are plain serde-derived data carriers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Declare a strongly-typed wrapper around the CRM's numeric identifiers.
/// The newtype keeps party, case, and entry ids from being mixed up at
/// call sites while serializing as a bare integer on the wire.
macro_rules! define_crm_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_crm_id!(
    /// Identifier of a party (contact/customer record) in the CRM.
    PartyId
);
define_crm_id!(
    /// Identifier of a case ("project") in the CRM.
    CaseId
);
define_crm_id!(
    /// Identifier of a history entry (note/activity) in the CRM.
    EntryId
);

// ============================================================================
// ENTITIES
// ============================================================================

/// A contact/customer record fetched from the CRM. Read-only on our side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Party {
    pub id: PartyId,
    /// Display name. Resolved from the CRM's `name` field, falling back to
    /// `firstName lastName` for person records.
    pub name: String,
}

/// Lifecycle status of a case. New cases are always created `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    Open,
    Closed,
}

/// A case ("project") owned by a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Kase {
    pub id: CaseId,
    pub name: String,
    pub party_id: PartyId,
    pub status: CaseStatus,
}

/// Kind of history entry we write. Only notes today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Note,
}

/// A note/activity entry as returned by the CRM after creation.
/// Write-only from our perspective; the CRM assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub created_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_newtypes_are_distinct_types() {
        let party = PartyId::new(7);
        let case = CaseId::new(7);
        assert_eq!(party.as_i64(), case.as_i64());
        assert_eq!(party.to_string(), "7");
    }

    #[test]
    fn test_id_serializes_transparent() {
        let id = PartyId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let back: PartyId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_case_status_wire_format() {
        assert_eq!(serde_json::to_string(&CaseStatus::Open).unwrap(), "\"OPEN\"");
        let status: CaseStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, CaseStatus::Closed);
    }

    #[test]
    fn test_entry_kind_wire_format() {
        assert_eq!(serde_json::to_string(&EntryKind::Note).unwrap(), "\"note\"");
    }

    #[test]
    fn test_entry_omits_missing_timestamp() {
        let entry = Entry {
            id: EntryId::new(1),
            kind: EntryKind::Note,
            content: "hello".to_string(),
            created_at: None,
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("created_at"));
    }
}
