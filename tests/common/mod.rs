#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response},
    middleware,
    routing::get,
};
use campus_gate::{
    auth::{Authenticated, Gate, GateConfig, ServiceStrategy, require_auth},
    create_app_with_gate,
    secrets::{Secret, Secrets},
};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::Value;

pub const ACCESS_SECRET: &str = "access-secret-used-only-in-tests-0001";
pub const REFRESH_SECRET: &str = "refresh-secret-used-only-in-tests-0001";
pub const SERVICE_SECRET: &str = "service-secret-used-only-in-tests-0001";

pub fn secrets() -> Secrets {
    Secrets {
        access_token: Secret::new(ACCESS_SECRET),
        refresh_token: Secret::new(REFRESH_SECRET),
        service_token: Secret::new(SERVICE_SECRET),
    }
}

pub fn gate_config(service_strategy: ServiceStrategy) -> GateConfig {
    GateConfig {
        secrets: secrets(),
        service_strategy,
    }
}

pub fn bearer_strategy() -> ServiceStrategy {
    ServiceStrategy::Authorization {
        scheme: "Bearer".to_string(),
    }
}

/// Full application router.
pub fn create_test_app(config: &GateConfig) -> Router {
    create_app_with_gate(Arc::new(Gate::new(config)))
}

/// A single `/guarded` route behind the gate that counts how often it runs and
/// echoes the attached identity.
pub fn create_counting_app(config: &GateConfig) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let gate = Arc::new(Gate::new(config));

    let app = Router::new()
        .route(
            "/guarded",
            get(move |Authenticated(identity): Authenticated| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(identity)
                }
            }),
        )
        .layer(middleware::from_fn_with_state(gate, require_auth::<Arc<Gate>>));

    (app, calls)
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn sign(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn access_token(claims: &Value) -> String {
    sign(claims, ACCESS_SECRET)
}

pub fn refresh_token(claims: &Value) -> String {
    sign(claims, REFRESH_SECRET)
}

pub fn auth_cookies(access_token: &str, refresh_token: &str) -> String {
    format!("accessToken={}; refreshToken={}", access_token, refresh_token)
}

pub fn get_request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn error_message(response: Response<Body>) -> String {
    body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string()
}
