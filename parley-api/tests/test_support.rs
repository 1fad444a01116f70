//! Shared helpers for parley-api integration tests.

use axum::response::Response;
use parley_api::AppState;
use parley_crm::VisibilityConfig;
use parley_test_utils::MockCrmGateway;
use std::sync::Arc;
use std::time::Duration;

/// Wrap a scripted mock gateway in handler state, keeping a handle for
/// call inspection.
pub fn state_with(gateway: MockCrmGateway) -> (AppState, Arc<MockCrmGateway>) {
    let gateway = Arc::new(gateway);
    let state = AppState::new(
        gateway.clone(),
        VisibilityConfig {
            attempts: 3,
            backoff: Duration::from_millis(0),
        },
    );
    (state, gateway)
}

/// Read a response body back as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Unwrap the error of a handler result. Handlers return opaque
/// `impl IntoResponse` success values, so `unwrap_err` cannot be used.
pub fn expect_err<T>(result: Result<T, parley_api::ApiError>) -> parley_api::ApiError {
    match result {
        Ok(_) => panic!("expected the handler to fail"),
        Err(err) => err,
    }
}
