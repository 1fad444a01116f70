//! Parley API - HTTP relay between the Parley clients and the remote CRM
//!
//! Each endpoint validates its input, makes one or two gateway calls, and
//! maps results and failures to the JSON error envelope. Handlers are
//! stateless; the only shared state is the gateway handle.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
pub mod validation;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use state::AppState;
