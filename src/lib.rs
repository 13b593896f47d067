pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;
pub mod secrets;

use api::create_api_router;
use auth::{Gate, GateConfig};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Secrets and service-auth strategy for the gate
    pub gate: GateConfig,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    create_app_with_gate(Arc::new(Gate::new(&config.gate)))
}

/// Create the application router around an already-built gate.
pub fn create_app_with_gate(gate: Arc<Gate>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/v1", create_api_router(gate))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
