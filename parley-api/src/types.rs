//! Request and response types for the relay endpoints.
//!
//! Field names are camelCase on the wire to match the documented external
//! interface.

use parley_core::{CaseId, Entry, Party, PartyId};
use serde::{Deserialize, Serialize};

// ============================================================================
// SEARCH
// ============================================================================

/// Query parameters for GET /clients.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct SearchClientsParams {
    /// Free-text search term. Required, non-empty after trimming.
    #[serde(default)]
    pub query: String,
}

/// One search hit: the id and display name of a CRM party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClientSummary {
    pub id: PartyId,
    pub name: String,
}

impl From<Party> for ClientSummary {
    fn from(party: Party) -> Self {
        Self {
            id: party.id,
            name: party.name,
        }
    }
}

// ============================================================================
// PROJECTS
// ============================================================================

/// POST /projects request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub client_id: PartyId,
    pub project_name: String,
}

/// POST /projects response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub project_id: CaseId,
}

/// POST /projects/with-note request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectWithNoteRequest {
    pub client_id: PartyId,
    pub project_name: String,
    pub note_content: String,
}

/// POST /projects/with-note response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectWithNoteResponse {
    pub project_id: CaseId,
    pub activity: Entry,
}

// ============================================================================
// ACTIVITIES
// ============================================================================

/// POST /activities request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub project_id: CaseId,
    pub note_content: String,
}

/// POST /activities response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateActivityResponse {
    pub activity: Entry,
}

// ============================================================================
// COMMENTS
// ============================================================================

/// POST /comments request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub client_id: PartyId,
    pub comment: String,
}

/// POST /comments response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCommentResponse {
    pub message: String,
    pub entry: Entry,
}
