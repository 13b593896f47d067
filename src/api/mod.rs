//! Protected API routes. Every route here sits behind the gate.

use axum::{Json, Router, middleware, routing::get};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::auth::{Authenticated, CurrentUser, Gate, Identity, InternalService, require_auth};
use crate::impl_has_gate;

/// State shared by the protected routes.
#[derive(Clone)]
pub struct ApiState {
    pub gate: Arc<Gate>,
}

impl_has_gate!(ApiState);

/// Create the API router with the gate layered in front of every route.
pub fn create_api_router(gate: Arc<Gate>) -> Router {
    let state = ApiState { gate };

    Router::new()
        .route("/whoami", get(whoami))
        .route("/me", get(me))
        .route("/internal/ping", get(internal_ping))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<ApiState>,
        ))
        .with_state(state)
}

async fn whoami(Authenticated(identity): Authenticated) -> Json<Identity> {
    Json(identity)
}

#[derive(Serialize)]
struct MeResponse {
    principal: Option<String>,
    claims: Map<String, Value>,
}

async fn me(CurrentUser(session): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        principal: session.user().principal(),
        claims: session.user().as_map().clone(),
    })
}

#[derive(Serialize)]
struct PingResponse {
    caller: &'static str,
}

async fn internal_ping(_: InternalService) -> Json<PingResponse> {
    Json(PingResponse {
        caller: "internal_service",
    })
}
