//! Activity Routes
//!
//! POST /activities attaches a note entry to an existing project (case).
//! The target id is known, so a CRM 404 here is a real 404, not an empty
//! success.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use parley_core::CrmError;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{CreateActivityRequest, CreateActivityResponse},
    validation::ValidateNonEmpty,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /activities - Attach a note to a project
#[utoipa::path(
    post,
    path = "/activities",
    tag = "Activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Note created", body = CreateActivityResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Project not found", body = ApiError),
        (status = 500, description = "CRM failure", body = ApiError),
    ),
)]
pub async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<CreateActivityRequest>,
) -> ApiResult<impl IntoResponse> {
    req.note_content.validate_non_empty("noteContent")?;

    let entry = state
        .gateway
        .create_case_note(req.project_id, req.note_content.trim())
        .await
        .map_err(|err| match err {
            CrmError::NotFound { .. } => ApiError::case_not_found(req.project_id),
            other => other.into(),
        })?;

    tracing::info!(project_id = %req.project_id, entry_id = %entry.id, "activity recorded");

    Ok((
        StatusCode::CREATED,
        Json(CreateActivityResponse { activity: entry }),
    ))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the activity routes router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_activity))
        .with_state(state)
}
