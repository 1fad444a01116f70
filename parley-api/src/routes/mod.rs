//! REST API Routes Module
//!
//! One module per use case, each exposing a `create_router`:
//! - Client search (GET /clients)
//! - Project creation + combined case+note flow (POST /projects[/with-note])
//! - Activity notes on projects (POST /activities)
//! - Timestamped comments on clients (POST /comments)
//! - Health checks (GET /health/*)
//! - OpenAPI spec (GET /openapi.json, plus swagger-ui when enabled)

pub mod activities;
pub mod clients;
pub mod comments;
pub mod health;
pub mod projects;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::openapi::ApiDoc;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use activities::create_router as activities_router;
pub use clients::create_router as clients_router;
pub use comments::create_router as comments_router;
pub use health::create_router as health_router;
pub use projects::create_router as projects_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

/// Create the complete relay router.
///
/// # Middleware Order (outer to inner)
/// 1. CORS (outermost) - handles preflight requests
/// 2. HTTP tracing - one span per request
/// 3. Handlers
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .nest("/clients", clients::create_router(state.clone()))
        .nest("/projects", projects::create_router(state.clone()))
        .nest("/activities", activities::create_router(state.clone()))
        .nest("/comments", comments::create_router(state))
        // Health checks (no auth required)
        .nest("/health", health::create_router())
        // OpenAPI spec
        .route("/openapi.json", get(openapi_json));

    // Add Swagger UI if swagger-ui feature is enabled
    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()));
    }

    let cors = build_cors_layer(api_config);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        cors.allow_origin(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_modules_compile() {
        // Verifies all route modules are properly exported.
        let _ = clients::create_router;
        let _ = projects::create_router;
        let _ = activities::create_router;
        let _ = comments::create_router;
        let _ = health::create_router;
    }
}
