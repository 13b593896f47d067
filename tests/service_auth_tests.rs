//! Tests for the internal-service path under both header conventions.

mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use campus_gate::auth::{GateConfig, ServiceStrategy};
use campus_gate::secrets::{Secret, Secrets};
use common::*;
use serde_json::json;
use tower::ServiceExt;

const MISSING_SERVICE_TOKEN: &str = "Unauthorized. Service token is missing.";
const INVALID_SERVICE_TOKEN: &str = "Unauthorized. Service token is not valid.";
const MISSING_TOKENS: &str = "Unauthorized. Please provide valid tokens.";

// =============================================================================
// Signal header + x-auth-token
// =============================================================================

#[tokio::test]
async fn test_matching_service_token_attaches_service_identity() {
    let (app, calls) = create_counting_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("x-auth-token", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "kind": "internal_service" }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_wrong_service_token_rejected_as_invalid() {
    let (app, calls) = create_counting_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("x-auth-token", "guess")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_service_token_rejected_as_missing() {
    let (app, calls) = create_counting_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request("/guarded", &[("internal-service", "true")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, MISSING_SERVICE_TOKEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signal_header_overrides_valid_session() {
    let exp = now() + 300;
    let cookies = auth_cookies(
        &access_token(&json!({ "id": 7, "exp": exp })),
        &refresh_token(&json!({ "id": 7, "exp": exp })),
    );
    let (app, _) = create_counting_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("cookie", cookies.as_str())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, MISSING_SERVICE_TOKEN);
}

#[tokio::test]
async fn test_token_header_without_signal_uses_session_path() {
    let (app, _) = create_counting_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request("/guarded", &[("x-auth-token", SERVICE_SECRET)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, MISSING_TOKENS);
}

#[tokio::test]
async fn test_unconfigured_service_secret_rejected() {
    let config = GateConfig {
        secrets: Secrets {
            service_token: None,
            ..secrets()
        },
        service_strategy: ServiceStrategy::default(),
    };
    let (app, calls) = create_counting_app(&config);

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("x-auth-token", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_service_headers() {
    let config = gate_config(ServiceStrategy::SignalHeader {
        signal: "x-internal".parse().unwrap(),
        token: "x-service-key".parse().unwrap(),
    });
    let (app, calls) = create_counting_app(&config);

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("x-internal", "1"), ("x-service-key", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Authorization: <scheme> <token>
// =============================================================================

#[tokio::test]
async fn test_bearer_service_token_accepted() {
    let (app, calls) = create_counting_app(&gate_config(bearer_strategy()));
    let authorization = format!("Bearer {}", SERVICE_SECRET);

    let response = app
        .oneshot(get_request("/guarded", &[("authorization", authorization.as_str())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["kind"], "internal_service");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bearer_wrong_token_rejected() {
    let (app, _) = create_counting_app(&gate_config(bearer_strategy()));

    let response = app
        .oneshot(get_request("/guarded", &[("authorization", "Bearer guess")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
}

#[tokio::test]
async fn test_other_scheme_rejected_as_invalid() {
    let (app, _) = create_counting_app(&gate_config(bearer_strategy()));
    let authorization = format!("Basic {}", SERVICE_SECRET);

    let response = app
        .oneshot(get_request("/guarded", &[("authorization", authorization.as_str())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
}

#[tokio::test]
async fn test_secret_under_unconfigured_scheme_rejected() {
    // Only the configured scheme is stripped; `Token <secret>` is compared whole.
    let (app, calls) = create_counting_app(&gate_config(bearer_strategy()));
    let authorization = format!("Token {}", SERVICE_SECRET);

    let response = app
        .oneshot(get_request("/guarded", &[("authorization", authorization.as_str())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scheme_without_token_rejected_as_missing() {
    let (app, _) = create_counting_app(&gate_config(bearer_strategy()));

    let response = app
        .oneshot(get_request("/guarded", &[("authorization", "Bearer")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, MISSING_SERVICE_TOKEN);
}

#[tokio::test]
async fn test_internal_header_ignored_by_bearer_strategy() {
    let (app, _) = create_counting_app(&gate_config(bearer_strategy()));

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("x-auth-token", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, MISSING_TOKENS);
}

// =============================================================================
// Handler extractors
// =============================================================================

#[tokio::test]
async fn test_internal_ping_for_service() {
    let app = create_test_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request(
            "/api/v1/internal/ping",
            &[("internal-service", "true"), ("x-auth-token", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["caller"], "internal_service");
}

#[tokio::test]
async fn test_service_cannot_reach_user_routes() {
    let app = create_test_app(&gate_config(ServiceStrategy::default()));

    let response = app
        .oneshot(get_request(
            "/api/v1/me",
            &[("internal-service", "true"), ("x-auth-token", SERVICE_SECRET)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_short_secret_still_compared_exactly() {
    let config = gate_config(ServiceStrategy::default());
    let config = GateConfig {
        secrets: Secrets {
            service_token: Secret::new("abc"),
            ..config.secrets
        },
        ..config
    };
    let (app, _) = create_counting_app(&config);

    let response = app
        .oneshot(get_request(
            "/guarded",
            &[("internal-service", "true"), ("x-auth-token", "abcd")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, INVALID_SERVICE_TOKEN);
}
