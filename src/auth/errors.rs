//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::jwt::VerifyError;

/// Why the gate turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Access or refresh cookie missing
    MissingTokens,
    InvalidAccessToken(VerifyError),
    InvalidRefreshToken(VerifyError),
    /// Internal-service call without a shared secret
    MissingServiceToken,
    InvalidServiceToken,
    /// Internal-service call while no shared secret is configured
    ServiceSecretUnconfigured,
}

impl AuthErrorKind {
    /// Client-facing message. Part of the API contract; do not reword.
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingTokens => "Unauthorized. Please provide valid tokens.",
            AuthErrorKind::InvalidAccessToken(_) => {
                "Unauthorized. Please provide valid access token."
            }
            AuthErrorKind::InvalidRefreshToken(_) => {
                "Unauthorized. Please provide valid refresh token."
            }
            AuthErrorKind::MissingServiceToken => "Unauthorized. Service token is missing.",
            AuthErrorKind::InvalidServiceToken | AuthErrorKind::ServiceSecretUnconfigured => {
                "Unauthorized. Service token is not valid."
            }
        }
    }

    /// Failure category for logs and telemetry.
    pub fn cause(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingTokens | AuthErrorKind::MissingServiceToken => {
                "MissingCredential"
            }
            AuthErrorKind::InvalidAccessToken(reason)
            | AuthErrorKind::InvalidRefreshToken(reason) => match reason {
                VerifyError::Expired => "ExpiredToken",
                VerifyError::Malformed => "MalformedToken",
                VerifyError::SignatureMismatch => "SignatureMismatch",
                VerifyError::SecretUnconfigured => "SecretUnconfigured",
            },
            AuthErrorKind::InvalidServiceToken => "SharedSecretMismatch",
            AuthErrorKind::ServiceSecretUnconfigured => "SecretUnconfigured",
        }
    }

    /// True when the failure stems from server configuration, not the caller.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            AuthErrorKind::InvalidAccessToken(VerifyError::SecretUnconfigured)
                | AuthErrorKind::InvalidRefreshToken(VerifyError::SecretUnconfigured)
                | AuthErrorKind::ServiceSecretUnconfigured
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// Rejection produced by the gate. Renders as `401 {"error": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRejection {
    kind: AuthErrorKind,
}

impl AuthRejection {
    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl From<AuthErrorKind> for AuthRejection {
    fn from(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.message())
    }
}

impl std::error::Error for AuthRejection {}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            self.kind.status_code(),
            Json(ErrorResponse {
                error: self.kind.message(),
            }),
        )
            .into_response()
    }
}

/// Rejection for handler extractors that need a particular kind of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    /// No identity attached; the gate is not layered in front of the handler
    NotAuthenticated,
    /// Caller is a user but the handler is for internal services only
    ServiceOnly,
    /// Caller is an internal service but the handler needs a user session
    UserOnly,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            IdentityRejection::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                AuthErrorKind::MissingTokens.message(),
            ),
            IdentityRejection::ServiceOnly => {
                (StatusCode::FORBIDDEN, "Forbidden. Internal services only.")
            }
            IdentityRejection::UserOnly => {
                (StatusCode::FORBIDDEN, "Forbidden. User session required.")
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
