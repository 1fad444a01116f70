//! Project Creation Routes
//!
//! POST /projects creates a case linked to a client, status fixed to open.
//! POST /projects/with-note runs the combined case+note flow: create the
//! case, wait until its id is readable, attach the first note. See
//! `services::case_flow` for the sequencing and compensation rules.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use crate::{
    error::{ApiError, ApiResult},
    services::case_flow,
    state::AppState,
    types::{
        CreateProjectRequest, CreateProjectResponse, CreateProjectWithNoteRequest,
        CreateProjectWithNoteResponse,
    },
    validation::ValidateNonEmpty,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /projects - Create a new project (CRM case)
#[utoipa::path(
    post,
    path = "/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = CreateProjectResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 500, description = "CRM failure", body = ApiError),
    ),
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    req.project_name.validate_non_empty("projectName")?;

    let kase = state
        .gateway
        .create_case(req.client_id, req.project_name.trim())
        .await
        .map_err(ApiError::from)?;

    tracing::info!(project_id = %kase.id, client_id = %req.client_id, "project created");

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectResponse {
            project_id: kase.id,
        }),
    ))
}

/// POST /projects/with-note - Create a project and its first note
#[utoipa::path(
    post,
    path = "/projects/with-note",
    tag = "Projects",
    request_body = CreateProjectWithNoteRequest,
    responses(
        (status = 201, description = "Project and note created", body = CreateProjectWithNoteResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Created case never became visible", body = ApiError),
        (status = 500, description = "CRM failure", body = ApiError),
    ),
)]
pub async fn create_project_with_note(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectWithNoteRequest>,
) -> ApiResult<impl IntoResponse> {
    req.project_name.validate_non_empty("projectName")?;
    req.note_content.validate_non_empty("noteContent")?;

    let outcome = case_flow::create_case_with_note(
        state.gateway.as_ref(),
        &state.visibility,
        req.client_id,
        req.project_name.trim(),
        req.note_content.trim(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectWithNoteResponse {
            project_id: outcome.kase.id,
            activity: outcome.entry,
        }),
    ))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the project routes router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_project))
        .route("/with-note", post(create_project_with_note))
        .with_state(state)
}
