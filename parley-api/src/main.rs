//! Parley API Server Entry Point
//!
//! Bootstraps configuration, builds the CRM gateway, and starts the Axum
//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use parley_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use parley_crm::{CapsuleClient, CrmConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("parley_api=info,tower_http=info")),
        )
        .init();

    let crm_config = CrmConfig::from_env()
        .map_err(|e| ApiError::internal_error(format!("CRM configuration error: {}", e)))?;
    let visibility = crm_config.visibility;

    let gateway = CapsuleClient::new(crm_config)
        .map_err(|e| ApiError::internal_error(format!("Failed to build CRM client: {}", e)))?;

    let api_config = ApiConfig::from_env();
    let state = AppState::new(Arc::new(gateway), visibility);

    let app: Router = create_api_router(state, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Parley API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("PARLEY_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("PARLEY_API_PORT").ok())
        .unwrap_or_else(|| "3000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
