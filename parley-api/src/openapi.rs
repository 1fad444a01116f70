//! OpenAPI Specification for the Parley API
//!
//! Uses utoipa to generate the OpenAPI document from Rust types and route
//! annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{activities, clients, comments, health, projects};
use crate::types::{
    ClientSummary, CreateActivityRequest, CreateActivityResponse, CreateCommentRequest,
    CreateCommentResponse, CreateProjectRequest, CreateProjectResponse,
    CreateProjectWithNoteRequest, CreateProjectWithNoteResponse,
};

use parley_core::{CaseId, CaseStatus, Entry, EntryId, EntryKind, Kase, Party, PartyId};

/// OpenAPI document for the Parley API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parley API",
        version = "0.3.0",
        description = "Relay between Parley clients and the remote CRM: party search, case creation, and note entries",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Parley", url = "https://parley.run")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Clients", description = "Party search against the CRM"),
        (name = "Projects", description = "Case creation, optionally with a first note"),
        (name = "Activities", description = "Note entries attached to cases"),
        (name = "Comments", description = "Timestamped note entries attached to parties"),
        (name = "Health", description = "Liveness endpoints")
    ),
    paths(
        clients::search_clients,
        projects::create_project,
        projects::create_project_with_note,
        activities::create_activity,
        comments::create_comment,
        health::ping,
        health::liveness,
    ),
    components(schemas(
        // Error types
        ApiError,
        ErrorCode,
        // Domain types
        Party,
        PartyId,
        Kase,
        CaseId,
        CaseStatus,
        Entry,
        EntryId,
        EntryKind,
        // Request/response types
        ClientSummary,
        CreateProjectRequest,
        CreateProjectResponse,
        CreateProjectWithNoteRequest,
        CreateProjectWithNoteResponse,
        CreateActivityRequest,
        CreateActivityResponse,
        CreateCommentRequest,
        CreateCommentResponse,
        health::HealthResponse,
        health::HealthStatus,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).expect("OpenAPI document serializes");

        assert!(json.contains("/clients"));
        assert!(json.contains("/projects"));
        assert!(json.contains("/activities"));
        assert!(json.contains("/comments"));
    }
}
