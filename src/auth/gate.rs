//! The gate: picks the authentication path for a request and either attaches
//! an identity and calls the next handler, or rejects with 401.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::credentials::CredentialPair;
use super::errors::{AuthErrorKind, AuthRejection};
use super::service::ServiceAuthenticator;
use super::session::authenticate_session;
use super::state::{GateConfig, HasGate};
use super::types::Identity;
use crate::jwt::{JwtVerifier, TokenVerifier};

/// Authentication path, chosen once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPath {
    Session,
    Service,
}

impl AuthPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPath::Session => "session",
            AuthPath::Service => "service",
        }
    }
}

/// Immutable after construction; share it behind an `Arc`.
pub struct Gate {
    verifier: Arc<dyn TokenVerifier>,
    service: ServiceAuthenticator,
}

impl Gate {
    pub fn new(config: &GateConfig) -> Self {
        Self::with_verifier(
            Arc::new(JwtVerifier::new(&config.secrets)),
            ServiceAuthenticator::new(
                config.service_strategy.clone(),
                config.secrets.service_token.clone(),
            ),
        )
    }

    pub fn with_verifier(verifier: Arc<dyn TokenVerifier>, service: ServiceAuthenticator) -> Self {
        Self { verifier, service }
    }

    /// The service signal overrides session auth entirely.
    pub fn select_path(&self, headers: &HeaderMap) -> AuthPath {
        if self.service.is_service_call(headers) {
            AuthPath::Service
        } else {
            AuthPath::Session
        }
    }

    /// Authenticate a request from its headers. Has no side effects besides
    /// logging, so repeating it on the same headers gives the same outcome.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        let path = self.select_path(headers);

        let outcome = match path {
            AuthPath::Session => {
                let credentials = CredentialPair::from_headers(headers);
                authenticate_session(self.verifier.as_ref(), &credentials).map(Identity::User)
            }
            AuthPath::Service => {
                let credential = self.service.strategy().credential(headers);
                self.service
                    .authenticate(credential)
                    .map(|()| Identity::InternalService)
            }
        };

        match outcome {
            Ok(identity) => {
                tracing::debug!(path = path.as_str(), "Request authenticated");
                Ok(identity)
            }
            Err(kind) => {
                log_rejection(path, kind);
                Err(AuthRejection::from(kind))
            }
        }
    }
}

fn log_rejection(path: AuthPath, kind: AuthErrorKind) {
    let reason = match kind {
        AuthErrorKind::InvalidAccessToken(reason) | AuthErrorKind::InvalidRefreshToken(reason) => {
            reason.as_str()
        }
        _ => "",
    };

    if kind.is_misconfiguration() {
        tracing::error!(
            path = path.as_str(),
            cause = kind.cause(),
            reason,
            "Rejected request: secret not configured"
        );
    } else {
        tracing::warn!(
            path = path.as_str(),
            cause = kind.cause(),
            reason,
            "Rejected request"
        );
    }
}

/// Middleware that runs the gate before the wrapped handlers.
///
/// On success the identity is inserted into the request extensions and the
/// next handler runs exactly once. On failure the next handler never runs.
pub async fn require_auth<S>(State(state): State<S>, mut request: Request, next: Next) -> Response
where
    S: HasGate + Clone + Send + Sync + 'static,
{
    match state.gate().authenticate(request.headers()) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
