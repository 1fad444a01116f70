//! Comment Routes
//!
//! POST /comments attaches a note entry directly to a client (party).
//! This is the timestamp-prefixing variant: the stored content begins with
//! the server time the comment was received.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use chrono::{DateTime, Utc};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{CreateCommentRequest, CreateCommentResponse},
    validation::ValidateNonEmpty,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /comments - Attach a timestamped note to a client
#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment recorded", body = CreateCommentResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 500, description = "CRM failure", body = ApiError),
    ),
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    req.comment.validate_non_empty("comment")?;

    let content = stamped_comment(Utc::now(), req.comment.trim());

    let entry = state
        .gateway
        .create_party_note(req.client_id, &content)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(client_id = %req.client_id, entry_id = %entry.id, "comment recorded");

    Ok(Json(CreateCommentResponse {
        message: "Note entry created successfully.".to_string(),
        entry,
    }))
}

/// Prefix a comment with the server timestamp.
pub fn stamped_comment(now: DateTime<Utc>, comment: &str) -> String {
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M UTC"), comment)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the comment routes router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_comment))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamped_comment_format() {
        let now = Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap();
        let content = stamped_comment(now, "called about invoice");

        assert_eq!(content, "[2026-02-14 09:30 UTC] called about invoice");
    }

    #[test]
    fn test_stamped_comment_starts_with_timestamp() {
        let content = stamped_comment(Utc::now(), "hello");
        assert!(content.starts_with('['));
        assert!(content.ends_with("] hello"));
    }
}
