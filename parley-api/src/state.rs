//! Shared application state for route handlers.

use parley_crm::{CrmGateway, VisibilityConfig};
use std::sync::Arc;

/// State shared by every relay handler.
///
/// Handlers are stateless beyond this: one gateway handle and the
/// visibility-poll tuning for the combined flow. No per-request or
/// cross-request mutable state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CrmGateway>,
    pub visibility: VisibilityConfig,
}

impl AppState {
    pub fn new(gateway: Arc<dyn CrmGateway>, visibility: VisibilityConfig) -> Self {
        Self {
            gateway,
            visibility,
        }
    }
}
