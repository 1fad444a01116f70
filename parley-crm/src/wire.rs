//! Capsule API request and response types.
//!
//! Kept private to the crate; conversions to the domain types in
//! `parley-core` happen at this boundary so nothing above the gateway
//! sees the CRM's envelope shapes.

use chrono::{DateTime, Utc};
use parley_core::{CaseId, CaseStatus, CrmError, Entry, EntryId, EntryKind, Kase, Party, PartyId};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PartyRef {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct KaseRef {
    pub id: i64,
}

/// POST /kases body: `{"kase": {"party": {"id": N}, "name": ..., "status": "OPEN"}}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateCaseBody<'a> {
    pub kase: CaseBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CaseBody<'a> {
    pub party: PartyRef,
    pub name: &'a str,
    pub status: CaseStatus,
}

impl<'a> CreateCaseBody<'a> {
    pub fn new(party_id: PartyId, name: &'a str) -> Self {
        Self {
            kase: CaseBody {
                party: PartyRef {
                    id: party_id.as_i64(),
                },
                name,
                // New cases always start open.
                status: CaseStatus::Open,
            },
        }
    }
}

/// POST /entries body for a party-attached note.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreatePartyNoteBody<'a> {
    pub entry: PartyNoteBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PartyNoteBody<'a> {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: &'a str,
    pub party: PartyRef,
}

impl<'a> CreatePartyNoteBody<'a> {
    pub fn new(party_id: PartyId, content: &'a str) -> Self {
        Self {
            entry: PartyNoteBody {
                kind: EntryKind::Note,
                content,
                party: PartyRef {
                    id: party_id.as_i64(),
                },
            },
        }
    }
}

/// POST /entries body for a case-attached note. The CRM requires the
/// sentinel activityType -1 for generic notes.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateCaseNoteBody<'a> {
    pub entry: CaseNoteBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CaseNoteBody<'a> {
    pub kase: KaseRef,
    #[serde(rename = "activityType")]
    pub activity_type: i32,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: &'a str,
}

impl<'a> CreateCaseNoteBody<'a> {
    pub fn new(case_id: CaseId, content: &'a str) -> Self {
        Self {
            entry: CaseNoteBody {
                kase: KaseRef {
                    id: case_id.as_i64(),
                },
                activity_type: -1,
                kind: EntryKind::Note,
                content,
            },
        }
    }
}

// ============================================================================
// RESPONSE ENVELOPES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PartiesEnvelope {
    #[serde(default)]
    pub parties: Vec<PartyWire>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PartyWire {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

impl PartyWire {
    /// Resolve the display name: organisations carry `name`, person
    /// records carry `firstName`/`lastName`. A party with neither gets an
    /// empty name and will never survive a substring filter.
    pub fn into_party(self) -> Party {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                let joined = [self.first_name, self.last_name]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                joined.trim().to_string()
            }
        };

        Party {
            id: PartyId::new(self.id),
            name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KaseEnvelope {
    pub kase: KaseWire,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KaseWire {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub party: Option<PartyRefWire>,
    pub status: Option<CaseStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PartyRefWire {
    pub id: i64,
}

impl KaseWire {
    /// Convert to the domain type. The CRM echoes name/party/status back,
    /// but a write response missing the id is a hard failure.
    pub fn into_kase(self, fallback_party: PartyId, fallback_name: &str) -> Result<Kase, CrmError> {
        let id = self
            .id
            .ok_or(CrmError::MissingId { resource: "case" })?;

        Ok(Kase {
            id: CaseId::new(id),
            name: self
                .name
                .unwrap_or_else(|| fallback_name.to_string()),
            party_id: self
                .party
                .map(|p| PartyId::new(p.id))
                .unwrap_or(fallback_party),
            status: self.status.unwrap_or(CaseStatus::Open),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryEnvelope {
    pub entry: EntryWire,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryWire {
    pub id: Option<i64>,
    pub content: Option<String>,
    #[serde(rename = "createdAt", alias = "creationDate")]
    pub created_at: Option<DateTime<Utc>>,
}

impl EntryWire {
    pub fn into_entry(self, fallback_content: &str) -> Result<Entry, CrmError> {
        let id = self
            .id
            .ok_or(CrmError::MissingId { resource: "entry" })?;

        Ok(Entry {
            id: EntryId::new(id),
            kind: EntryKind::Note,
            content: self
                .content
                .unwrap_or_else(|| fallback_content.to_string()),
            created_at: self.created_at,
        })
    }
}

/// Error body shape the CRM returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CrmErrorWire {
    pub message: Option<String>,
}
